//! `rotator`: rotate database user passwords from a JSON request envelope.
//!
//! Stdout carries only the response envelope; logs go to stderr.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::config::Settings;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.global, cli.command.timeout_override())?;

    let _log = rotator_log::init_with(settings.log.clone())
        .context("failed to initialize logging")?;
    tracing::debug!(timeout_secs = settings.timeout_secs, "settings loaded");

    commands::run(cli.command, &settings).await
}
