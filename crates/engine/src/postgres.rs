//! PostgreSQL driver

use async_trait::async_trait;
use rotator_core::{BoxError, Engine, RotateParams, SecretString};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection, Executor};
use zeroize::Zeroizing;

use crate::driver::Driver;
use crate::quote::{QuoteError, postgres_identifier, postgres_literal};

const APPLICATION_NAME: &str = "rotator";

/// [`Driver`] for PostgreSQL
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

impl PostgresDriver {
    /// Connection options for the managing user. Statement logging is off:
    /// the password change statement embeds the new password.
    pub fn connect_options(params: &RotateParams) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .database(&params.database)
            .username(&params.managing_user.username)
            .application_name(APPLICATION_NAME);

        params
            .managing_user
            .password
            .expose_secret(|password| options.password(password))
            .disable_statement_logging()
    }

    /// `ALTER USER "<user>" WITH PASSWORD '<password>'`
    ///
    /// Utility statements take no bind parameters, so the role name is a
    /// quoted identifier and the password a quoted literal.
    pub fn alter_user_statement(
        username: &str,
        new_password: &SecretString,
    ) -> Result<Zeroizing<String>, QuoteError> {
        let role = postgres_identifier(username)?;
        let password = Zeroizing::new(new_password.expose_secret(postgres_literal)?);

        let mut statement =
            Zeroizing::new(String::with_capacity(32 + role.len() + password.len()));
        statement.push_str("ALTER USER ");
        statement.push_str(&role);
        statement.push_str(" WITH PASSWORD ");
        statement.push_str(&password);
        Ok(statement)
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    type Connection = PgConnection;

    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    async fn connect(&self, params: &RotateParams) -> Result<PgConnection, BoxError> {
        Ok(Self::connect_options(params).connect().await?)
    }

    async fn ping(&self, conn: &mut PgConnection) -> Result<(), BoxError> {
        conn.ping().await?;
        Ok(())
    }

    async fn set_password(
        &self,
        conn: &mut PgConnection,
        username: &str,
        new_password: &SecretString,
    ) -> Result<(), BoxError> {
        let statement = Self::alter_user_statement(username, new_password)?;
        conn.execute(sqlx::raw_sql(statement.as_str())).await?;
        Ok(())
    }

    async fn close(&self, conn: PgConnection) -> Result<(), BoxError> {
        conn.close().await?;
        Ok(())
    }
}
