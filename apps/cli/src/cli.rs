use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rotator_log::Format;

#[derive(Debug, Parser)]
#[command(name = "rotator", version)]
#[command(about = "Rotate database user passwords on behalf of a secrets manager")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand; each overrides its config key
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: ./rotator.toml when present)
    #[arg(long, global = true, env = "ROTATOR_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "rotator_engine=trace"
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Log output format: pretty, compact or json
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<Format>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rotate one user's password and print the response envelope
    Rotate(RotateArgs),
    /// List supported engine tags
    Engines,
}

#[derive(Debug, Args)]
pub struct RotateArgs {
    /// Request envelope; `-` or omitted reads stdin
    #[arg(long, value_name = "FILE|-")]
    pub payload: Option<PathBuf>,

    /// Seconds before the rotation is abandoned
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Command {
    /// `--timeout`, for commands that take one
    pub const fn timeout_override(&self) -> Option<u64> {
        match self {
            Self::Rotate(args) => args.timeout,
            Self::Engines => None,
        }
    }
}
