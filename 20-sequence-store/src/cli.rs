use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::driver::DriverConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of concurrent workers, each appending one item.
    #[arg(long, default_value_t = 10)]
    pub workers: usize,

    /// Prefix for worker items; worker `n` appends "<prefix> <n>".
    #[arg(long, default_value = "Item")]
    pub prefix: String,

    /// Item written by the bulk replace. Repeat the flag for several items.
    #[arg(
        long = "replacement",
        value_name = "ITEM",
        default_values_t = default_replacement()
    )]
    pub replacement: Vec<String>,

    /// How the workers are scheduled.
    #[arg(long, value_enum, default_value_t = Runtime::Threads)]
    pub runtime: Runtime,

    /// Upper bound for a random delay before each append, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub jitter_ms: u64,

    /// Output format for the final report.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

impl Cli {
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            workers: self.workers,
            prefix: self.prefix.clone(),
            replacement: self.replacement.clone(),
            runtime: self.runtime,
            jitter_ms: self.jitter_ms,
        }
    }
}

pub fn default_replacement() -> Vec<String> {
    (1..=3).map(|n| format!("NewItem {n}")).collect()
}

#[derive(ValueEnum, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    /// One OS thread per worker.
    #[default]
    Threads,
    /// Workers run inside a rayon scope on the global pool.
    Rayon,
    /// One tokio task per worker.
    Tokio,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}
