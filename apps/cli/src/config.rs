//! Layered settings: defaults → TOML file → environment → flags

use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;

/// Read when `--config` is not given, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "rotator.toml";

const ENV_PREFIX: &str = "ROTATOR_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on one rotation, connection setup included
    pub timeout_secs: u64,
    pub log: rotator_log::Config,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            log: rotator_log::Config::default(),
        }
    }
}

impl Settings {
    /// Merge every layer and validate the result.
    ///
    /// Environment: `ROTATOR_TIMEOUT_SECS`, `ROTATOR_LOG__LEVEL`,
    /// `ROTATOR_LOG__FORMAT`, plus the logging shorthands `RUST_LOG`,
    /// `ROTATOR_LOG` and `ROTATOR_LOG_FORMAT`.
    pub fn load(args: &GlobalArgs, timeout_override: Option<u64>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        figment = match &args.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file {} not found", path.display());
                }
                figment.merge(Toml::file(path))
            }
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        figment = figment
            .merge(Env::raw().only(&["RUST_LOG"]).map(|_| "log.level".into()))
            .merge(Env::raw().only(&["ROTATOR_LOG"]).map(|_| "log.level".into()))
            .merge(
                Env::raw()
                    .only(&["ROTATOR_LOG_FORMAT"])
                    .map(|_| "log.format".into()),
            )
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["config", "log", "log_format"])
                    .split("__"),
            );

        if let Some(secs) = timeout_override {
            figment = figment.merge(Serialized::default("timeout_secs", secs));
        }
        if let Some(level) = &args.log_level {
            figment = figment.merge(Serialized::default("log.level", level));
        }
        if let Some(format) = args.log_format {
            figment = figment.merge(Serialized::default("log.format", format));
        }

        let settings: Self = figment.extract().context("invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
