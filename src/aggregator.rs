//! Ranking and averaging over a directory of report files
//!
//! The aggregator scans a directory once, keeps one [`ReportEntry`] per
//! well-formed report, ranks entries by a tree metric, and averages the
//! training options of the best or worst files.
//!
//! # Failure policy
//!
//! - Scanning: a report without both metric lines is excluded and logged
//!   (or fails the scan under [`MalformedPolicy::Fail`]). I/O errors are
//!   always fatal.
//! - Option gathering: every selected file is attempted. If any fail, all
//!   failures are returned together as [`ReportError::ConfigExtraction`].
//!
//! # Example
//!
//! ```no_run
//! use treereport::aggregator::{AggregatorConfig, Metric, Order, ReportAggregator};
//!
//! let config = AggregatorConfig::new("runs/", Metric::Leaves, 5, Order::Best);
//! let mut aggregator = ReportAggregator::new(config).unwrap();
//! let result = aggregator.specific_average().unwrap();
//! println!("{} files selected", result.selection.len());
//! ```

use crate::error::{FileFailure, ReportError, Result};
use crate::options::{self, ConfigRecord};
use crate::report::{self, ReportEntry};
use crate::schema::{FIELDS, FIELD_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Tree metric used for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of leaves
    Leaves,
    /// Size of the tree
    Trees,
    /// Absolute difference between tree size and leaf count
    Spread,
}

impl Metric {
    pub fn key(self, entry: &ReportEntry) -> u64 {
        match self {
            Metric::Leaves => entry.leaf_count,
            Metric::Trees => entry.tree_size,
            Metric::Spread => entry.spread(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Leaves => "LEAVES",
            Metric::Trees => "TREES",
            Metric::Spread => "SPREAD",
        })
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the numeric selector (`0`, `1`, `2`) or the name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "leaves" => Ok(Metric::Leaves),
            "1" | "trees" => Ok(Metric::Trees),
            "2" | "spread" => Ok(Metric::Spread),
            _ => Err(format!(
                "invalid metric {s:?}: expected 0 (leaves), 1 (trees) or 2 (spread)"
            )),
        }
    }
}

/// Which end of the ranking to select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Largest metric values
    Worst,
    /// Smallest metric values
    Best,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Worst => "WORST",
            Order::Best => "BEST",
        })
    }
}

impl FromStr for Order {
    type Err = String;

    /// Accepts the numeric selector (`0`, `1`) or the name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "worst" => Ok(Order::Worst),
            "1" | "best" => Ok(Order::Best),
            _ => Err(format!(
                "invalid order {s:?}: expected 0 (worst) or 1 (best)"
            )),
        }
    }
}

/// What to do with a report that lacks its metric lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Skip the file with a warning
    #[default]
    Exclude,
    /// Abort the scan
    Fail,
}

/// Configuration for a [`ReportAggregator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Directory holding the report files
    pub directory: PathBuf,
    pub metric: Metric,
    /// Number of entries to select
    pub count: usize,
    pub order: Order,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            metric: Metric::Leaves,
            count: 10,
            order: Order::Best,
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl AggregatorConfig {
    pub fn new(directory: impl Into<PathBuf>, metric: Metric, count: usize, order: Order) -> Self {
        Self {
            directory: directory.into(),
            metric,
            count,
            order,
            on_malformed: MalformedPolicy::default(),
        }
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(ReportError::InvalidCount);
        }
        Ok(())
    }
}

/// Per-field averages, in [`FIELDS`] order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldAverages([f64; FIELD_COUNT]);

impl FieldAverages {
    pub fn values(&self) -> &[f64; FIELD_COUNT] {
        &self.0
    }

    /// `(field name, average)` pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FIELDS.iter().zip(self.0.iter()).map(|(d, v)| (d.name, *v))
    }
}

impl Serialize for FieldAverages {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Selected entries together with the averages of their options
#[derive(Debug, Clone, Serialize)]
pub struct AggregationResult {
    pub selection: Vec<ReportEntry>,
    pub averages: FieldAverages,
}

/// A report left out of the scan
#[derive(Debug, Clone, Serialize)]
pub struct Exclusion {
    pub filename: String,
    pub reason: String,
}

/// A regular file seen during the scan
#[derive(Debug)]
struct ScannedFile {
    /// Display name, lossily decoded
    name: String,
    /// Path as returned by the directory listing
    path: PathBuf,
}

/// Scan state of the aggregator
#[derive(Debug)]
enum ScanState {
    Unpopulated,
    Populated {
        entries: Vec<ReportEntry>,
        files: HashMap<usize, ScannedFile>,
        exclusions: Vec<Exclusion>,
    },
}

/// Ranks report files and averages their options
///
/// Scanning happens at most once per instance. Not safe for concurrent use.
#[derive(Debug)]
pub struct ReportAggregator {
    config: AggregatorConfig,
    state: ScanState,
}

impl ReportAggregator {
    /// Create an aggregator from a validated configuration
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ScanState::Unpopulated,
        })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.state, ScanState::Populated { .. })
    }

    /// Scan the directory and extract metrics from every file
    ///
    /// Ids are assigned 1-based in directory enumeration order, counting
    /// excluded files too. Fails with [`ReportError::AlreadyPopulated`] on a
    /// second call.
    pub fn scan_and_extract(&mut self) -> Result<&[ReportEntry]> {
        if self.is_populated() {
            return Err(ReportError::AlreadyPopulated);
        }

        let dir = &self.config.directory;
        tracing::debug!(directory = %dir.display(), "scanning reports");

        let mut entries = Vec::new();
        let mut files = HashMap::new();
        let mut exclusions = Vec::new();

        let listing = fs::read_dir(dir).map_err(|e| ReportError::io(dir, e))?;
        let mut id = 0;
        for dir_entry in listing {
            let dir_entry = dir_entry.map_err(|e| ReportError::io(dir, e))?;
            let path = dir_entry.path();
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-file entry");
                continue;
            }

            id += 1;
            let filename = dir_entry.file_name().to_string_lossy().into_owned();
            let metrics = report::extract_metrics_from_path(&path);
            files.insert(
                id,
                ScannedFile {
                    name: filename.clone(),
                    path,
                },
            );

            match metrics {
                Ok(metrics) => {
                    tracing::trace!(id, %filename, ?metrics, "scanned report");
                    entries.push(ReportEntry::new(id, filename, metrics));
                }
                Err(ReportError::MalformedReport { reason, .. })
                    if self.config.on_malformed == MalformedPolicy::Exclude =>
                {
                    tracing::warn!(%filename, %reason, "excluding malformed report");
                    exclusions.push(Exclusion { filename, reason });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            entries = entries.len(),
            excluded = exclusions.len(),
            "scan complete"
        );

        self.state = ScanState::Populated {
            entries,
            files,
            exclusions,
        };
        self.entries()
    }

    /// Scan unless already scanned
    fn ensure_populated(&mut self) -> Result<()> {
        if !self.is_populated() {
            self.scan_and_extract()?;
        }
        Ok(())
    }

    /// Entries in enumeration order
    pub fn entries(&self) -> Result<&[ReportEntry]> {
        match &self.state {
            ScanState::Populated { entries, .. } => Ok(entries),
            ScanState::Unpopulated => Err(ReportError::NotPopulated),
        }
    }

    /// Reports left out of the scan
    pub fn exclusions(&self) -> Result<&[Exclusion]> {
        match &self.state {
            ScanState::Populated { exclusions, .. } => Ok(exclusions),
            ScanState::Unpopulated => Err(ReportError::NotPopulated),
        }
    }

    fn scanned_file(&self, id: usize) -> Result<&ScannedFile> {
        match &self.state {
            ScanState::Populated { files, .. } => {
                files.get(&id).ok_or(ReportError::UnknownId(id))
            }
            ScanState::Unpopulated => Err(ReportError::NotPopulated),
        }
    }

    /// Display name of a scanned file by id
    pub fn filename(&self, id: usize) -> Result<&str> {
        self.scanned_file(id).map(|f| f.name.as_str())
    }

    /// Path of a scanned file by id, as listed by the directory
    pub fn path(&self, id: usize) -> Result<&Path> {
        self.scanned_file(id).map(|f| f.path.as_path())
    }

    /// Read the options of each entry, aligned by position
    pub fn gather_configs(&self, entries: &[ReportEntry]) -> Result<Vec<ConfigRecord>> {
        let mut configs = Vec::with_capacity(entries.len());
        let mut failures = Vec::new();

        for entry in entries {
            let file = self.scanned_file(entry.id)?;
            match options::extract_from_path(&file.path) {
                Ok(record) => configs.push(record),
                Err(error) => failures.push(FileFailure {
                    filename: file.name.clone(),
                    error,
                }),
            }
        }

        if failures.is_empty() {
            Ok(configs)
        } else {
            Err(ReportError::ConfigExtraction { failures })
        }
    }

    /// Average the options of the configured best or worst entries
    pub fn specific_average(&mut self) -> Result<AggregationResult> {
        self.ensure_populated()?;
        let ranked = rank_by(self.entries()?, self.config.metric);
        let selection = select(&ranked, self.config.count, self.config.order).to_vec();
        let configs = self.gather_configs(&selection)?;
        Ok(AggregationResult {
            averages: average_fields(&configs),
            selection,
        })
    }

    /// Average the options of every entry
    pub fn full_average(&mut self) -> Result<AggregationResult> {
        self.ensure_populated()?;
        let ranked = rank_by(self.entries()?, self.config.metric);
        let configs = self.gather_configs(&ranked)?;
        Ok(AggregationResult {
            averages: average_fields(&configs),
            selection: ranked,
        })
    }
}

/// Stable ascending sort of entries by a metric
pub fn rank_by(entries: &[ReportEntry], metric: Metric) -> Vec<ReportEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by_key(|e| metric.key(e));
    ranked
}

/// Take `count` entries from the front (best) or back (worst) of a ranking
///
/// The worst tail keeps ascending order. `count` larger than the ranking
/// selects everything.
pub fn select(ranked: &[ReportEntry], count: usize, order: Order) -> &[ReportEntry] {
    let count = count.min(ranked.len());
    match order {
        Order::Best => &ranked[..count],
        Order::Worst => &ranked[ranked.len() - count..],
    }
}

/// Mean of each field across configs, absent values dropped
///
/// A field with no present values averages to 0.
pub fn average_fields(configs: &[ConfigRecord]) -> FieldAverages {
    let mut averages = [0.0; FIELD_COUNT];
    for (slot, desc) in averages.iter_mut().zip(FIELDS.iter()) {
        let values: Vec<f64> = configs.iter().filter_map(|c| c.numeric(desc.field)).collect();
        if !values.is_empty() {
            *slot = values.iter().sum::<f64>() / values.len() as f64;
        }
    }
    FieldAverages(averages)
}
