//! Logger builder implementation

mod format;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Handle on the installed logger
///
/// Records the configuration that took effect. The subscriber is global and
/// outlives the guard; stderr output is unbuffered so nothing is lost on drop.
#[derive(Debug)]
#[must_use = "keep the guard for as long as the program logs"]
pub struct LoggerGuard {
    level: String,
    format: Format,
}

impl LoggerGuard {
    /// Filter directive in effect
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Output format in effect
    pub const fn format(&self) -> Format {
        self.format
    }
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse the filter. Runs before anything global is touched.
    fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// - [`LogError::Filter`] if the filter directive does not parse
    /// - [`LogError::AlreadyInitialized`] if a global subscriber exists
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let layer = format::fmt_layer(&self.config);

        Registry::default()
            .with(layer)
            .with(filter)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)?;

        Ok(LoggerGuard {
            level: self.config.level,
            format: self.config.format,
        })
    }
}
