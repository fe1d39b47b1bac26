//! # Rotator Log
//!
//! Logging setup shared by the rotator binaries.
//!
//! Output always goes to stderr: stdout carries the rotation response.
//!
//! ```rust,no_run
//! use rotator_log::{Config, Format};
//!
//! fn main() -> rotator_log::LogResult<()> {
//!     let _guard = rotator_log::init_with(Config {
//!         format: Format::Json,
//!         ..Config::production()
//!     })?;
//!
//!     tracing::info!(engine = "postgres", "rotation requested");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, Format};
pub use error::{LogError, LogResult};

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "ROTATOR_LOG";

/// Environment variable holding the output format
pub const LOG_FORMAT_ENV: &str = "ROTATOR_LOG_FORMAT";

/// Pick a configuration from the environment and build type, then install it.
///
/// An explicit `ROTATOR_LOG` or `RUST_LOG` wins; otherwise debug builds get
/// [`Config::development`] and release builds [`Config::production`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var_os(LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with the default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
