//! treereport - ranking and averaging over decision-tree report files
//!
//! This library scans a directory of text reports written by a decision-tree
//! learner, reads the leaf count, tree size and training options of each one,
//! and averages the options of the simplest or most complex trees.

pub mod aggregator;
pub mod cli;
pub mod error;
pub mod options;
pub mod render;
pub mod report;
pub mod schema;

pub use aggregator::{AggregationResult, AggregatorConfig, Metric, Order, ReportAggregator};
pub use error::{ReportError, Result};
pub use options::ConfigRecord;
pub use report::ReportEntry;
