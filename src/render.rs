//! Text and JSON rendering of aggregation results

use crate::aggregator::{AggregationResult, Exclusion, Metric, Order};
use serde::Serialize;

/// Format the best/worst selection with its averages
pub fn specific_report(metric: Metric, order: Order, count: usize, result: &AggregationResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("Specific run: {metric}\n"));
    output.push_str(&format!("THOSE ARE ACTUALLY THE {count} {order} values!\n\n"));

    for entry in &result.selection {
        output.push_str(&format!("Filename: {}\n", entry.filename));
        output.push_str(&format!(
            "Number of LEAVES: {} and number of TREES: {}\n\n",
            entry.leaf_count, entry.tree_size
        ));
    }

    output.push_str(&format_averages(result));
    output
}

/// Format the averages over every report
pub fn full_report(result: &AggregationResult) -> String {
    let mut output = String::from("THIS IS THE FULL RUN FOR ALL VALUES:\n");
    output.push_str(&format_averages(result));
    output
}

/// Format the list of reports left out of the scan
pub fn exclusions_report(exclusions: &[Exclusion]) -> String {
    let mut output = String::new();
    if exclusions.is_empty() {
        return output;
    }

    output.push_str(&format!(
        "Excluded {} malformed report(s):\n",
        exclusions.len()
    ));
    for exclusion in exclusions {
        output.push_str(&format!("  {}: {}\n", exclusion.filename, exclusion.reason));
    }
    output
}

/// One `<field> <average>` line per field
fn format_averages(result: &AggregationResult) -> String {
    result
        .averages
        .iter()
        .map(|(name, value)| format!("{name} {value}\n"))
        .collect()
}

/// Root JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub metric: Metric,
    pub order: Order,
    pub count: usize,
    pub specific: &'a AggregationResult,
    pub full: &'a AggregationResult,
    pub excluded: &'a [Exclusion],
}

impl JsonReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
