//! # Rotator Engine
//!
//! Routes a tagged rotation request to the matching database engine and
//! changes the rotate user's password over a single, short-lived connection.
//!
//! ```text
//! payload ─► Dispatcher ─► read `type` ─► decode RotateParams ─► EngineRotator<Driver>
//!                                                                 validate → connect → ping → ALTER USER → release
//! ```
//!
//! The engine set is closed: [`Dispatcher`] matches on
//! [`rotator_core::Engine`], so an engine without a rotator does not compile.

#![forbid(unsafe_code)]

pub mod dispatch;
pub mod driver;
pub mod mysql;
pub mod postgres;
pub mod quote;
pub mod rotator;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use dispatch::{Dispatcher, read_engine_tag};
pub use driver::Driver;
pub use mysql::MySqlDriver;
pub use postgres::PostgresDriver;
pub use rotator::{EngineRotator, MySqlRotator, PostgresRotator, Rotate};

pub use rotator_core::{
    Engine, RotateParams, RotationContext, RotationError, RotationRequest, RotationResponse,
    RotationResult, SecretString,
};
