//! Database driver seam
//!
//! A [`Driver`] knows how to reach one engine and how to phrase that engine's
//! password change. The rotation algorithm itself lives once, in
//! [`EngineRotator`](crate::rotator::EngineRotator).

use async_trait::async_trait;
use rotator_core::{BoxError, Engine, RotateParams, SecretString};

/// Engine-specific connection and statement handling
///
/// Implementations must not put passwords into error values: callers forward
/// driver errors to logs and to the response message verbatim.
#[async_trait]
pub trait Driver: Send + Sync {
    /// One open connection. Dropping it must release the underlying socket.
    type Connection: Send;

    /// Engine this driver speaks to
    fn engine(&self) -> Engine;

    /// Open a connection as the managing user
    async fn connect(&self, params: &RotateParams) -> Result<Self::Connection, BoxError>;

    /// Verify the connection is usable before mutating anything
    async fn ping(&self, conn: &mut Self::Connection) -> Result<(), BoxError>;

    /// Issue the single statement that sets `username`'s password
    async fn set_password(
        &self,
        conn: &mut Self::Connection,
        username: &str,
        new_password: &SecretString,
    ) -> Result<(), BoxError>;

    /// Close the connection gracefully
    async fn close(&self, conn: Self::Connection) -> Result<(), BoxError>;
}
