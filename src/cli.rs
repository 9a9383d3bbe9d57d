//! CLI argument parsing for savings-predictor

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "savings-predictor")]
#[command(version)]
#[command(about = "Per-navigation bandwidth savings estimator", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON preference file holding the savings counters (overrides config)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Entity list to use instead of the packaged one (overrides config)
    #[arg(long, value_name = "FILE")]
    pub entities: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long)]
    pub debug: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the entity owning each origin or URL
    Resolve {
        #[arg(required = true, value_name = "ORIGIN_OR_URL")]
        inputs: Vec<String>,
    },

    /// Drive one tab from a JSON-lines navigation event log
    Replay {
        #[arg(value_name = "EVENTS")]
        events: PathBuf,

        /// Treat the tab as off the record
        #[arg(long)]
        off_the_record: bool,
    },

    /// Show cumulative and rolling savings from the state file
    Status,
}
