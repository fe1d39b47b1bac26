mod engines;
mod rotate;

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Command;
use crate::config::Settings;

/// Exit status when a failure envelope was printed. Distinct from clap's
/// usage-error status 2.
pub const EXIT_ROTATION_FAILED: u8 = 3;

pub async fn run(command: Command, settings: &Settings) -> Result<ExitCode> {
    match command {
        Command::Rotate(args) => rotate::run(args, settings).await,
        Command::Engines => Ok(engines::run()),
    }
}
