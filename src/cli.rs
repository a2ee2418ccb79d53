// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `mesarun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mesarun",
    version,
    about = "Run MESA / GYRE simulations, tee their output to a log and track progress.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the run file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Mesarun.toml")]
    pub config: String,

    /// Echo simulator output instead of showing a progress line.
    ///
    /// Overrides `[run].silent`.
    #[arg(long)]
    pub verbose: bool,

    /// Maximum concurrent runs; overrides `[batch].jobs`.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MESARUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the run plan, but don't launch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
