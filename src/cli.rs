// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `transjob`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "transjob",
    version,
    about = "Run an encoder job with live progress.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a job file (TOML).
    ///
    /// Default: `Transjob.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Input file.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<String>,

    /// Output file.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Encoder executable.
    #[arg(long, value_name = "BIN")]
    pub binary: Option<String>,

    /// Input duration in seconds (probed when omitted).
    #[arg(long, value_name = "SECS")]
    pub duration: Option<f64>,

    /// Extra encoder arguments, e.g. "-c:v libx264 -preset fast".
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Video filter chain, e.g. "scale=1280:720,fps=30".
    #[arg(long, value_name = "FILTERS")]
    pub filters: Option<String>,

    /// Leave an option out of the command line (repeatable).
    #[arg(long = "disable", value_name = "KEY")]
    pub disabled: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TRANSJOB_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the encoder command line without running it.
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
