//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::domain::execution::ExecutionMode;

/// Cross-venue prediction market arbitrage scanner
#[derive(Parser, Debug)]
#[command(name = "crossedge")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scan loop (or a single cycle with --once)
    Run(RunArgs),

    /// Print the status file written by a running instance
    Status(StatusArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Load and validate the configuration file.
    Config(ConfigPathArg),
}

/// Execution mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Sim,
    Live,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sim => Self::Sim,
            ModeArg::Live => Self::Live,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override the execution mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Override the capital ceiling (USD).
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Run a single scan cycle, print its outcomes, and exit.
    #[arg(long)]
    pub once: bool,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Path to the status file.
    #[arg(long, default_value = "crossedge-status.json")]
    pub status_file: PathBuf,
}
