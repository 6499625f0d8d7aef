//! Error types for report parsing and aggregation

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the flags of an options line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("flag {flag} expects a value but is the last token")]
    MissingValue { flag: &'static str },

    #[error("flag {flag} expects a number, got {value:?}")]
    InvalidValue { flag: &'static str, value: String },
}

/// A single file that failed, kept for the aggregate error
#[derive(Debug)]
pub struct FileFailure {
    pub filename: String,
    pub error: ReportError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filename, self.error)
    }
}

/// Errors that can occur while scanning, extracting and aggregating reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no \"Options:\" line found in {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("malformed options line in {}: {source}", .path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: OptionsError,
    },

    #[error("malformed report {}: {reason}", .path.display())]
    MalformedReport { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reports have not been scanned yet")]
    NotPopulated,

    #[error("reports have already been scanned")]
    AlreadyPopulated,

    #[error("unknown report id {0}")]
    UnknownId(usize),

    #[error("count must be a positive integer")]
    InvalidCount,

    #[error(
        "options could not be extracted from {} file(s):\n{}",
        .failures.len(),
        .failures.iter().map(|f| format!("  {f}")).collect::<Vec<_>>().join("\n")
    )]
    ConfigExtraction { failures: Vec<FileFailure> },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_config_not_found(&self) -> bool {
        matches!(self, ReportError::ConfigNotFound { .. })
    }

    pub fn is_malformed_input(&self) -> bool {
        matches!(self, ReportError::MalformedInput { .. })
    }

    pub fn is_malformed_report(&self) -> bool {
        matches!(self, ReportError::MalformedReport { .. })
    }
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
