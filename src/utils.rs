//! Utils

use std::path::PathBuf;

use clap::Parser;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Arguments for the `tally` binary
#[derive(Debug, Parser)]
#[command(name = "tally", about = "Apply discounts to the bills in a fixture")]
pub struct TallyArgs {
    /// Fixture file defining users, discounts and bills
    #[arg(short, long, default_value = "fixtures/retail.yml")]
    pub fixture: PathBuf,

    /// Only process the bill with this name
    #[arg(short, long)]
    pub bill: Option<String>,

    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
