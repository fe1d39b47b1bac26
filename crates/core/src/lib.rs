//! # Rotator Core
//!
//! Types shared by every part of the credential rotator.
//!
//! ## Key Components
//!
//! - **Engines**: the closed set of database engines a rotation can target
//! - **Requests**: the tagged request envelope and its engine-specific payload
//! - **Secrets**: [`SecretString`], redacted in every rendering
//! - **Context**: per-invocation deadline, cancellation and trace id
//! - **Errors**: [`RotationError`] and the outward [`RotationResponse`]
//!
//! ## Usage
//!
//! ```rust
//! use rotator_core::{Engine, RotationRequest};
//!
//! let payload = serde_json::json!({
//!     "type": "postgres",
//!     "host": "db.internal",
//!     "port": 5432,
//!     "database": "app",
//!     "managingUser": { "username": "admin", "password": "admin-secret" },
//!     "rotateUser": { "username": "app", "password": "old", "newPassword": "new" }
//! });
//!
//! let request = RotationRequest::decode(Engine::Postgres, &payload).unwrap();
//! assert_eq!(request.engine(), Engine::Postgres);
//! assert_eq!(request.params().rotate_user.username, "app");
//! ```

#![forbid(unsafe_code)]

pub mod context;
pub mod engine;
pub mod error;
pub mod request;
pub mod response;
pub mod secret;

pub use context::{Interrupted, RotationContext};
pub use engine::Engine;
pub use error::{BoxError, ErrorKind, PasswordProblem, RotationError, RotationResult};
pub use request::{ManagingUser, RotateParams, RotateUser, RotationRequest};
pub use response::RotationResponse;
pub use secret::SecretString;
