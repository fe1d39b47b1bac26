//! MySQL driver
//!
//! `ALTER USER` cannot be run as a prepared statement, so the account name and
//! password are escaped as string literals and the statement goes over the
//! text protocol. The escaping rule follows the session's `sql_mode`, read
//! during the liveness check.

use async_trait::async_trait;
use rotator_core::{BoxError, Engine, RotateParams, SecretString};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor};
use zeroize::Zeroizing;

use crate::driver::Driver;
use crate::quote::{MySqlEscaping, mysql_literal};

const SQL_MODE_PROBE: &str = "SELECT @@SESSION.sql_mode LIKE '%NO_BACKSLASH_ESCAPES%'";

/// Open MySQL connection plus the literal escaping rule of its session
#[derive(Debug)]
pub struct MySqlSession {
    conn: MySqlConnection,
    escaping: MySqlEscaping,
}

/// [`Driver`] for MySQL and wire-compatible servers
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDriver;

impl MySqlDriver {
    /// Connection options for the managing user. Statement logging is off:
    /// the password change statement embeds the new password.
    pub fn connect_options(params: &RotateParams) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .database(&params.database)
            .username(&params.managing_user.username);

        params
            .managing_user
            .password
            .expose_secret(|password| options.password(password))
            .disable_statement_logging()
    }

    /// `ALTER USER '<user>' IDENTIFIED BY '<password>'`
    pub fn alter_user_statement(
        username: &str,
        new_password: &SecretString,
        escaping: MySqlEscaping,
    ) -> Zeroizing<String> {
        let user = mysql_literal(username, escaping);
        let password = Zeroizing::new(new_password.expose_secret(|p| mysql_literal(p, escaping)));

        let mut statement =
            Zeroizing::new(String::with_capacity(32 + user.len() + password.len()));
        statement.push_str("ALTER USER ");
        statement.push_str(&user);
        statement.push_str(" IDENTIFIED BY ");
        statement.push_str(&password);
        statement
    }
}

#[async_trait]
impl Driver for MySqlDriver {
    type Connection = MySqlSession;

    fn engine(&self) -> Engine {
        Engine::MySql
    }

    async fn connect(&self, params: &RotateParams) -> Result<MySqlSession, BoxError> {
        let conn = Self::connect_options(params).connect().await?;
        Ok(MySqlSession {
            conn,
            escaping: MySqlEscaping::default(),
        })
    }

    async fn ping(&self, session: &mut MySqlSession) -> Result<(), BoxError> {
        session.conn.ping().await?;

        let no_backslash_escapes: i64 = sqlx::query_scalar(SQL_MODE_PROBE)
            .fetch_one(&mut session.conn)
            .await?;
        session.escaping = if no_backslash_escapes == 0 {
            MySqlEscaping::Backslash
        } else {
            MySqlEscaping::QuoteDoubling
        };
        tracing::trace!(escaping = ?session.escaping, "probed session sql_mode");
        Ok(())
    }

    async fn set_password(
        &self,
        session: &mut MySqlSession,
        username: &str,
        new_password: &SecretString,
    ) -> Result<(), BoxError> {
        let statement = Self::alter_user_statement(username, new_password, session.escaping);
        session
            .conn
            .execute(sqlx::raw_sql(statement.as_str()))
            .await?;
        Ok(())
    }

    async fn close(&self, session: MySqlSession) -> Result<(), BoxError> {
        session.conn.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_params;

    #[test]
    fn test_alter_user_statement() {
        let statement = MySqlDriver::alter_user_statement(
            "target_user",
            &SecretString::new("new_password"),
            MySqlEscaping::Backslash,
        );
        assert_eq!(
            statement.as_str(),
            "ALTER USER 'target_user' IDENTIFIED BY 'new_password'"
        );
    }

    #[test]
    fn test_alter_user_statement_neutralizes_injection() {
        let statement = MySqlDriver::alter_user_statement(
            "x' IDENTIFIED BY 'pwned'; --",
            &SecretString::new("a'b\\c"),
            MySqlEscaping::Backslash,
        );
        assert_eq!(
            statement.as_str(),
            r"ALTER USER 'x\' IDENTIFIED BY \'pwned\'; --' IDENTIFIED BY 'a\'b\\c'"
        );

        let statement = MySqlDriver::alter_user_statement(
            "target_user",
            &SecretString::new("a'b\\c"),
            MySqlEscaping::QuoteDoubling,
        );
        assert_eq!(
            statement.as_str(),
            r"ALTER USER 'target_user' IDENTIFIED BY 'a''b\c'"
        );
    }

    #[test]
    fn test_connect_options_use_managing_user() {
        let options = MySqlDriver::connect_options(&sample_params());
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 3306);
        assert_eq!(options.get_username(), "managing_user");
        assert_eq!(options.get_database(), Some("credential_rotation_test"));
    }
}
