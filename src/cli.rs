//! CLI argument parsing for treereport

use crate::aggregator::{AggregatorConfig, MalformedPolicy, Metric, Order};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "treereport")]
#[command(version)]
#[command(about = "Rank decision-tree reports and average the options behind them", long_about = None)]
pub struct Cli {
    /// Directory holding the report files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Ranking metric: 0 = leaves, 1 = tree size, 2 = spread
    #[arg(value_name = "METRIC")]
    pub metric: Metric,

    /// Number of reports to select
    #[arg(value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,

    /// Selection order: 0 = worst (largest), 1 = best (smallest)
    #[arg(value_name = "ORDER")]
    pub order: Order,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fail instead of skipping reports without metric lines
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable debug tracing output
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Build the aggregator configuration from parsed arguments
    pub fn aggregator_config(&self) -> AggregatorConfig {
        let policy = if self.strict {
            MalformedPolicy::Fail
        } else {
            MalformedPolicy::Exclude
        };
        AggregatorConfig::new(
            self.directory.clone(),
            self.metric,
            self.count as usize,
            self.order,
        )
        .with_malformed_policy(policy)
    }
}
