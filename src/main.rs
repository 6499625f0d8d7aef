use anyhow::{Context, Result};
use clap::Parser;
use treereport::cli::{Cli, OutputFormat};
use treereport::render::{self, JsonReport};
use treereport::ReportAggregator;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings always, everything with --debug
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = args.aggregator_config();
    let mut aggregator = ReportAggregator::new(config)?;

    let specific = aggregator
        .specific_average()
        .context("Failed to aggregate selected reports")?;
    let full = aggregator
        .full_average()
        .context("Failed to aggregate all reports")?;
    let exclusions = aggregator.exclusions()?;
    tracing::debug!(?aggregator, "aggregation complete");

    let config = aggregator.config();
    match args.format {
        OutputFormat::Text => {
            eprint!("{}", render::exclusions_report(exclusions));
            print!(
                "{}",
                render::specific_report(config.metric, config.order, config.count, &specific)
            );
            println!("\n");
            print!("{}", render::full_report(&full));
        }
        OutputFormat::Json => {
            let report = JsonReport {
                metric: config.metric,
                order: config.order,
                count: config.count,
                specific: &specific,
                full: &full,
                excluded: exclusions,
            };
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}
