//! Test doubles for rotation code
//!
//! [`MockDriver`] stands in for a database: it records every connection it
//! hands out in a [`ConnectionLedger`] so tests can assert that no connection
//! was attempted, or that every opened connection was released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rotator_core::{
    BoxError, Engine, ManagingUser, RotateParams, RotateUser, SecretString,
};

use crate::driver::Driver;

/// Counts connection lifecycle events
#[derive(Debug, Default)]
pub struct ConnectionLedger {
    attempts: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    statements: AtomicUsize,
}

impl ConnectionLedger {
    /// Number of `connect` calls
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Connections successfully opened
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections released, gracefully or by drop
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Opened and not yet released
    pub fn live(&self) -> usize {
        self.opened() - self.closed()
    }

    /// Password change statements started
    pub fn statements(&self) -> usize {
        self.statements.load(Ordering::SeqCst)
    }
}

/// How a [`MockDriver`] responds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    /// Every step succeeds
    #[default]
    Succeed,
    /// `connect` fails, as for a closed port or bad credentials
    RefuseConnection,
    /// `connect` never completes, as for a black-holed host
    HangOnConnect,
    /// Connects, then the liveness check fails
    FailPing,
    /// The password change statement is rejected
    RejectStatement,
    /// The password change statement never completes
    HangOnStatement,
}

/// Connection handed out by [`MockDriver`]; counts itself closed on drop
#[derive(Debug)]
pub struct MockConnection {
    ledger: Arc<ConnectionLedger>,
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.ledger.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory [`Driver`]
#[derive(Debug)]
pub struct MockDriver {
    engine: Engine,
    behavior: MockBehavior,
    ledger: Arc<ConnectionLedger>,
    passwords: Mutex<HashMap<String, String>>,
}

impl MockDriver {
    /// Mock posing as `engine`, succeeding at every step
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            behavior: MockBehavior::default(),
            ledger: Arc::new(ConnectionLedger::default()),
            passwords: Mutex::new(HashMap::new()),
        }
    }

    /// Set behavior (builder pattern)
    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Shared handle on this driver's ledger
    pub fn ledger(&self) -> Arc<ConnectionLedger> {
        Arc::clone(&self.ledger)
    }

    /// Last password set for `username`
    pub fn current_password(&self, username: &str) -> Option<String> {
        self.passwords
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Connection = MockConnection;

    fn engine(&self) -> Engine {
        self.engine
    }

    async fn connect(&self, params: &RotateParams) -> Result<MockConnection, BoxError> {
        self.ledger.attempts.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::RefuseConnection => {
                Err(format!("mock: connection refused by {}:{}", params.host, params.port).into())
            }
            MockBehavior::HangOnConnect => std::future::pending().await,
            _ => {
                self.ledger.opened.fetch_add(1, Ordering::SeqCst);
                Ok(MockConnection {
                    ledger: Arc::clone(&self.ledger),
                })
            }
        }
    }

    async fn ping(&self, _conn: &mut MockConnection) -> Result<(), BoxError> {
        if self.behavior == MockBehavior::FailPing {
            return Err("mock: server has gone away".into());
        }
        Ok(())
    }

    async fn set_password(
        &self,
        _conn: &mut MockConnection,
        username: &str,
        new_password: &SecretString,
    ) -> Result<(), BoxError> {
        self.ledger.statements.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::RejectStatement => {
                Err(format!("mock: operation ALTER USER failed for '{username}'").into())
            }
            MockBehavior::HangOnStatement => std::future::pending().await,
            _ => {
                let password = new_password.expose_secret(str::to_owned);
                self.passwords
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(username.to_owned(), password);
                Ok(())
            }
        }
    }

    async fn close(&self, conn: MockConnection) -> Result<(), BoxError> {
        drop(conn);
        Ok(())
    }
}

/// The canonical request used throughout the test suites
pub fn sample_params() -> RotateParams {
    RotateParams {
        host: "127.0.0.1".to_owned(),
        port: 3306,
        database: "credential_rotation_test".to_owned(),
        managing_user: ManagingUser {
            username: "managing_user".to_owned(),
            password: SecretString::new("manager_password"),
        },
        rotate_user: RotateUser {
            username: "target_user".to_owned(),
            password: Some(SecretString::new("initial_password")),
            new_password: Some(SecretString::new("new_password")),
        },
    }
}
