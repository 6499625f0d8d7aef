//! Options line extraction
//!
//! A report records the command line that trained its tree on a line like
//!
//! ```text
//! Options: -C 0.25 -M 2
//! ```
//!
//! Everything after the `Options:` marker is split on whitespace and read as
//! a flat token list. Switch flags are true when their exact token appears
//! anywhere in the list; value flags read the token after their first
//! occurrence. Unrecognized tokens are ignored.

use crate::error::{OptionsError, ReportError, Result};
use crate::schema::{Field, FieldKind, FieldValue, FIELDS};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Marker that introduces the options line
pub const OPTIONS_MARKER: &str = "Options:";

/// Training options parsed from one report file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub reduced_error_pruning: bool,
    pub unpruned: bool,
    pub binary_splits: bool,
    pub save_instance_data: bool,
    pub subtree_raising: bool,
    pub config_laplace: bool,
    pub confidence_factor: Option<f64>,
    pub min_num_obj: Option<i64>,
    pub num_folds: Option<i64>,
}

impl ConfigRecord {
    /// Value of a single field
    pub fn value(&self, field: Field) -> FieldValue {
        match field {
            Field::ReducedErrorPruning => FieldValue::Switch(self.reduced_error_pruning),
            Field::Unpruned => FieldValue::Switch(self.unpruned),
            Field::BinarySplits => FieldValue::Switch(self.binary_splits),
            Field::SaveInstanceData => FieldValue::Switch(self.save_instance_data),
            Field::SubtreeRaising => FieldValue::Switch(self.subtree_raising),
            Field::ConfigLaplace => FieldValue::Switch(self.config_laplace),
            Field::ConfidenceFactor => FieldValue::Float(self.confidence_factor),
            Field::MinNumObj => FieldValue::Integer(self.min_num_obj),
            Field::NumFolds => FieldValue::Integer(self.num_folds),
        }
    }

    /// Numeric value of a field for averaging
    ///
    /// Switches map to `1.0`/`0.0`. Absent value flags yield `None`.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        self.value(field).as_f64()
    }

    fn set_switch(&mut self, field: Field) {
        match field {
            Field::ReducedErrorPruning => self.reduced_error_pruning = true,
            Field::Unpruned => self.unpruned = true,
            Field::BinarySplits => self.binary_splits = true,
            Field::SaveInstanceData => self.save_instance_data = true,
            Field::SubtreeRaising => self.subtree_raising = true,
            Field::ConfigLaplace => self.config_laplace = true,
            Field::ConfidenceFactor | Field::MinNumObj | Field::NumFolds => {}
        }
    }
}

/// Value read for a single flag
#[derive(Debug, Clone, Copy, PartialEq)]
enum FlagValue {
    Present,
    Float(f64),
    Integer(i64),
}

/// Split the text after the marker into tokens
pub fn tokenize(line: &str) -> Option<Vec<&str>> {
    let start = line.find(OPTIONS_MARKER)? + OPTIONS_MARKER.len();
    Some(line[start..].split_whitespace().collect())
}

/// Read one flag from the token list, `None` if it does not appear
fn read_flag(tokens: &[&str], field: Field) -> std::result::Result<Option<FlagValue>, OptionsError> {
    let flag = field.flag();
    let Some(pos) = tokens.iter().position(|t| *t == flag) else {
        return Ok(None);
    };

    let kind = field.kind();
    if !kind.takes_value() {
        return Ok(Some(FlagValue::Present));
    }

    let raw = tokens
        .get(pos + 1)
        .ok_or(OptionsError::MissingValue { flag })?;
    let invalid = || OptionsError::InvalidValue {
        flag,
        value: raw.to_string(),
    };

    let value = match kind {
        FieldKind::Float => FlagValue::Float(raw.parse().map_err(|_| invalid())?),
        FieldKind::Integer => FlagValue::Integer(raw.parse().map_err(|_| invalid())?),
        FieldKind::Switch => FlagValue::Present,
    };
    Ok(Some(value))
}

/// Build a [`ConfigRecord`] from an options token list
pub fn parse_tokens(tokens: &[&str]) -> std::result::Result<ConfigRecord, OptionsError> {
    let mut record = ConfigRecord::default();

    for desc in &FIELDS {
        match read_flag(tokens, desc.field)? {
            None => {}
            Some(FlagValue::Present) => record.set_switch(desc.field),
            Some(FlagValue::Float(v)) => record.confidence_factor = Some(v),
            Some(FlagValue::Integer(v)) => match desc.field {
                Field::MinNumObj => record.min_num_obj = Some(v),
                Field::NumFolds => record.num_folds = Some(v),
                _ => {}
            },
        }
    }

    Ok(record)
}

/// Locate the options line in a report and parse it
///
/// Lines are read until the first one containing [`OPTIONS_MARKER`].
pub fn extract<R: BufRead>(reader: R, path: &Path) -> Result<ConfigRecord> {
    for line in reader.lines() {
        let line = line.map_err(|e| ReportError::io(path, e))?;
        if let Some(tokens) = tokenize(&line) {
            return parse_tokens(&tokens).map_err(|source| ReportError::MalformedInput {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    Err(ReportError::ConfigNotFound {
        path: path.to_path_buf(),
    })
}

/// Open a report file and extract its options
pub fn extract_from_path(path: &Path) -> Result<ConfigRecord> {
    let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    let record = extract(BufReader::new(file), path)?;
    tracing::trace!(path = %path.display(), ?record, "extracted options");
    Ok(record)
}
