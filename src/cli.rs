use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// JSON or TOML file mapping hour timestamps to prices.
    #[clap(long = "prices", env = "PRICES_PATH")]
    pub prices_path: PathBuf,

    /// Only consider the hours starting at or after this instant. Defaults to now.
    #[clap(long, env = "SINCE")]
    pub since: Option<DateTime<FixedOffset>>,

    /// Largest number of hours to precompute.
    #[clap(long, default_value = "10", env = "MAX_COUNT")]
    pub max_count: usize,

    /// Show only the specified number of cheapest hours.
    #[clap(long, env = "COUNT")]
    pub count: Option<usize>,

    /// Number of cheapest hours to summarize the upcoming block for.
    #[clap(long, default_value = "3", env = "UPCOMING_COUNT")]
    pub upcoming_count: usize,

    #[clap(long, value_enum, default_value = "table", env = "OUTPUT_FORMAT")]
    pub format: Format,
}

impl Args {
    pub fn since(&self) -> DateTime<FixedOffset> {
        self.since.unwrap_or_else(|| Local::now().fixed_offset())
    }

    /// Counts to display.
    pub fn counts(&self) -> Vec<usize> {
        self.count.map_or_else(|| (1..=self.max_count).collect(), |count| vec![count])
    }
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}
