//! Tree metrics of a single report file
//!
//! A report describes its tree with two lines:
//!
//! ```text
//! Number of Leaves  : 	4
//! Size of the tree : 	7
//! ```
//!
//! The value is the last whitespace-separated token of the line.

use crate::error::{ReportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::LazyLock;

const LEAVES_LABEL: &str = "Number of Leaves";
const SIZE_LABEL: &str = "Size of the tree";

/// Metric label and the rest of the line after it
static METRIC_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Number of Leaves|Size of the tree)(.*)$").expect("invalid METRIC_LINE_RE pattern")
});

/// Leaf count and tree size read from one report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub leaf_count: u64,
    pub tree_size: u64,
}

/// One successfully scanned report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 1-based position in directory enumeration order
    pub id: usize,
    pub filename: String,
    pub leaf_count: u64,
    pub tree_size: u64,
}

impl ReportEntry {
    pub fn new(id: usize, filename: impl Into<String>, metrics: ReportMetrics) -> Self {
        Self {
            id,
            filename: filename.into(),
            leaf_count: metrics.leaf_count,
            tree_size: metrics.tree_size,
        }
    }

    /// Absolute difference between tree size and leaf count
    pub fn spread(&self) -> u64 {
        self.tree_size.abs_diff(self.leaf_count)
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> ReportError {
    ReportError::MalformedReport {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Scan every line of a report for its two metric lines
///
/// Each label must appear exactly once with an integer value.
pub fn extract_metrics<R: BufRead>(reader: R, path: &Path) -> Result<ReportMetrics> {
    let mut leaf_count = None;
    let mut tree_size = None;

    for line in reader.lines() {
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => malformed(path, "not a UTF-8 text file"),
            _ => ReportError::io(path, e),
        })?;
        let Some(caps) = METRIC_LINE_RE.captures(&line) else {
            continue;
        };

        let label = &caps[1];
        let Some(raw) = caps[2].split_whitespace().last() else {
            return Err(malformed(path, format!("{label} has no value")));
        };
        let value: u64 = raw
            .parse()
            .map_err(|_| malformed(path, format!("{label} has non-integer value {raw:?}")))?;

        let slot = if label == LEAVES_LABEL {
            &mut leaf_count
        } else {
            &mut tree_size
        };
        if slot.replace(value).is_some() {
            return Err(malformed(path, format!("{label} appears more than once")));
        }
    }

    match (leaf_count, tree_size) {
        (Some(leaf_count), Some(tree_size)) => Ok(ReportMetrics {
            leaf_count,
            tree_size,
        }),
        (None, None) => Err(malformed(
            path,
            format!("missing both \"{LEAVES_LABEL}\" and \"{SIZE_LABEL}\""),
        )),
        (None, Some(_)) => Err(malformed(path, format!("missing \"{LEAVES_LABEL}\""))),
        (Some(_), None) => Err(malformed(path, format!("missing \"{SIZE_LABEL}\""))),
    }
}

/// Open a report file and extract its metrics
pub fn extract_metrics_from_path(path: &Path) -> Result<ReportMetrics> {
    let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    extract_metrics(BufReader::new(file), path)
}
