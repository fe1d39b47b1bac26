//! Engine rotators
//!
//! [`EngineRotator`] runs the per-call state machine
//! `Init → Validated → Connected → Rotated → Done` for any [`Driver`]:
//!
//! 1. refuse a missing or empty new password before touching the network
//! 2. connect as the managing user
//! 3. ping, so an unreachable database is told apart from a rejected statement
//! 4. issue exactly one password change statement
//! 5. release the connection
//!
//! Nothing is retried. The connection is an owned local of [`EngineRotator::rotate`]:
//! every exit path drops it, including the caller dropping the rotation
//! future, and the normal paths additionally close it gracefully.

use async_trait::async_trait;
use rotator_core::{
    BoxError, Engine, PasswordProblem, RotateParams, RotateUser, RotationContext, RotationError,
    RotationResult, SecretString,
};
use std::future::Future;
use tracing::Instrument;

use crate::driver::Driver;
use crate::mysql::MySqlDriver;
use crate::postgres::PostgresDriver;

/// Rotates one engine's credentials. This is what the dispatcher routes to.
#[async_trait]
pub trait Rotate: Send + Sync {
    /// Engine handled by this rotator
    fn engine(&self) -> Engine;

    /// Set `params.rotate_user`'s password to its `new_password`
    async fn rotate(&self, ctx: &RotationContext, params: RotateParams) -> RotationResult<()>;
}

/// Rotator for MySQL accounts
pub type MySqlRotator = EngineRotator<MySqlDriver>;

/// Rotator for PostgreSQL roles
pub type PostgresRotator = EngineRotator<PostgresDriver>;

/// The shared rotation algorithm, parameterized by driver
#[derive(Debug, Clone, Default)]
pub struct EngineRotator<D> {
    driver: D,
}

impl<D: Driver> EngineRotator<D> {
    /// Wrap a driver
    pub const fn new(driver: D) -> Self {
        Self { driver }
    }

    /// The wrapped driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    async fn execute(&self, ctx: &RotationContext, params: &RotateParams) -> RotationResult<()> {
        let engine = self.driver.engine();
        let new_password = checked_new_password(engine, &params.rotate_user)?;

        let mut conn = guarded(ctx, self.driver.connect(params))
            .await
            .map_err(|source| connection_failed(engine, params, source))?;
        tracing::debug!("connected as managing user");

        let outcome = self.apply(ctx, &mut conn, params, new_password).await;

        self.release(ctx, conn).await;
        outcome
    }

    async fn apply(
        &self,
        ctx: &RotationContext,
        conn: &mut D::Connection,
        params: &RotateParams,
        new_password: &SecretString,
    ) -> RotationResult<()> {
        let engine = self.driver.engine();

        guarded(ctx, self.driver.ping(conn))
            .await
            .map_err(|source| connection_failed(engine, params, source))?;

        let username = params.rotate_user.username.as_str();
        guarded(ctx, self.driver.set_password(conn, username, new_password))
            .await
            .map_err(|source| RotationError::RotationFailed {
                engine,
                username: username.to_owned(),
                source,
            })
    }

    async fn release(&self, ctx: &RotationContext, conn: D::Connection) {
        // An interrupted close drops the connection, which still releases it.
        match ctx.run(self.driver.close(conn)).await {
            Ok(Ok(())) => tracing::debug!("connection closed"),
            Ok(Err(error)) => tracing::debug!(%error, "connection closed uncleanly"),
            Err(interrupted) => {
                tracing::debug!(%interrupted, "connection dropped without graceful close");
            }
        }
    }
}

#[async_trait]
impl<D: Driver> Rotate for EngineRotator<D> {
    fn engine(&self) -> Engine {
        self.driver.engine()
    }

    async fn rotate(&self, ctx: &RotationContext, params: RotateParams) -> RotationResult<()> {
        let span = tracing::info_span!(
            "rotate",
            engine = %self.driver.engine(),
            username = %params.rotate_user.username,
            trace_id = %ctx.trace_id,
            outcome = tracing::field::Empty,
        );

        async {
            let result = self.execute(ctx, &params).await;
            match &result {
                Ok(()) => {
                    tracing::Span::current().record("outcome", "rotated");
                    tracing::info!("password rotated");
                }
                Err(error) => {
                    tracing::Span::current().record("outcome", error.kind().as_str());
                    tracing::warn!(error = %error.report(), "rotation failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }
}

fn checked_new_password(engine: Engine, user: &RotateUser) -> RotationResult<&SecretString> {
    let problem = match &user.new_password {
        Some(password) if !password.is_empty() => return Ok(password),
        Some(_) => PasswordProblem::Empty,
        None => PasswordProblem::Absent,
    };

    Err(RotationError::MissingNewPassword {
        engine,
        username: user.username.clone(),
        problem,
    })
}

/// Bound a driver call by the context, folding interruption into the error
async fn guarded<T, F>(ctx: &RotationContext, future: F) -> Result<T, BoxError>
where
    F: Future<Output = Result<T, BoxError>>,
{
    match ctx.run(future).await {
        Ok(result) => result,
        Err(interrupted) => Err(Box::new(interrupted)),
    }
}

fn connection_failed(engine: Engine, params: &RotateParams, source: BoxError) -> RotationError {
    RotationError::ConnectionFailed {
        engine,
        host: params.host.clone(),
        port: params.port,
        source,
    }
}
