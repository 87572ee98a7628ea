// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::Strategy;

/// Command-line arguments for `revaldag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "revaldag",
    version,
    about = "Inspect prompt-graph re-execution: stale cached outputs and remaining work.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the prompt graph (JSON).
    #[arg(long, value_name = "PATH")]
    pub graph: String,

    /// Path to the config file (TOML).
    ///
    /// Default: `Revaldag.toml` in the current working directory; defaults
    /// are used if the file does not exist.
    #[arg(long, value_name = "PATH", default_value = "Revaldag.toml")]
    pub config: String,

    /// Path to the previous run snapshot (JSON: graph + fingerprints).
    ///
    /// Without one, every cached output is treated as changed.
    #[arg(long, value_name = "PATH")]
    pub previous: Option<String>,

    /// Path to the cached outputs table (JSON).
    #[arg(long, value_name = "PATH")]
    pub outputs: Option<String>,

    /// Node to estimate remaining work for. May be given multiple times;
    /// defaults to the graph's sinks.
    #[arg(long = "estimate", value_name = "NODE")]
    pub estimate: Vec<String>,

    /// Override the configured strategy.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REVALDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Strategy override as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum StrategyArg {
    Memoized,
    Baseline,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Memoized => Strategy::Memoized,
            StrategyArg::Baseline => Strategy::Baseline,
        }
    }
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
