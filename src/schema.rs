//! Schema of the training options recorded in a report file
//!
//! The nine recognized options are described once here. Extraction uses the
//! flag and kind of each field to decide how to read the options line, and
//! averaging walks the same list to produce one value per field in a fixed
//! order.

use serde::{Deserialize, Serialize};

/// Number of fields in a [`ConfigRecord`](crate::options::ConfigRecord)
pub const FIELD_COUNT: usize = 9;

/// How a field is read from the options line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Presence of the flag means `true`, absence `false`
    Switch,
    /// The token after the flag, parsed as a float
    Float,
    /// The token after the flag, parsed as an integer
    Integer,
}

impl FieldKind {
    /// Whether the flag consumes the following token
    pub fn takes_value(self) -> bool {
        !matches!(self, FieldKind::Switch)
    }
}

/// Value of a single field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Switch(bool),
    Float(Option<f64>),
    Integer(Option<i64>),
}

impl FieldValue {
    /// Numeric view for averaging: switches as `1.0`/`0.0`, absent as `None`
    pub fn as_f64(self) -> Option<f64> {
        match self {
            FieldValue::Switch(b) => Some(if b { 1.0 } else { 0.0 }),
            FieldValue::Float(v) => v,
            FieldValue::Integer(v) => v.map(|v| v as f64),
        }
    }
}

/// One of the nine recognized options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ReducedErrorPruning,
    Unpruned,
    BinarySplits,
    SaveInstanceData,
    SubtreeRaising,
    ConfigLaplace,
    ConfidenceFactor,
    MinNumObj,
    NumFolds,
}

/// Static description of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub field: Field,
    /// Name used in reports (`reduced_error_pruning`, ...)
    pub name: &'static str,
    /// Command-line flag that sets it (`-R`, ...)
    pub flag: &'static str,
    pub kind: FieldKind,
    /// Value when the flag is missing from the options line
    pub default: FieldValue,
}

/// All fields, in report order
pub const FIELDS: [FieldDescriptor; FIELD_COUNT] = [
    FieldDescriptor {
        field: Field::ReducedErrorPruning,
        name: "reduced_error_pruning",
        flag: "-R",
        kind: FieldKind::Switch,
        default: FieldValue::Switch(false),
    },
    FieldDescriptor {
        field: Field::Unpruned,
        name: "unpruned",
        flag: "-U",
        kind: FieldKind::Switch,
        default: FieldValue::Switch(false),
    },
    FieldDescriptor {
        field: Field::BinarySplits,
        name: "binary_splits",
        flag: "-B",
        kind: FieldKind::Switch,
        default: FieldValue::Switch(false),
    },
    FieldDescriptor {
        field: Field::SaveInstanceData,
        name: "save_instance_data",
        flag: "-L",
        kind: FieldKind::Switch,
        default: FieldValue::Switch(false),
    },
    FieldDescriptor {
        field: Field::SubtreeRaising,
        name: "subtree_raising",
        flag: "-S",
        kind: FieldKind::Switch,
        default: FieldValue::Switch(false),
    },
    FieldDescriptor {
        field: Field::ConfigLaplace,
        name: "config_laplace",
        flag: "-A",
        kind: FieldKind::Switch,
        default: FieldValue::Switch(false),
    },
    FieldDescriptor {
        field: Field::ConfidenceFactor,
        name: "confidence_factor",
        flag: "-C",
        kind: FieldKind::Float,
        default: FieldValue::Float(None),
    },
    FieldDescriptor {
        field: Field::MinNumObj,
        name: "min_num_obj",
        flag: "-M",
        kind: FieldKind::Integer,
        default: FieldValue::Integer(None),
    },
    FieldDescriptor {
        field: Field::NumFolds,
        name: "num_folds",
        flag: "-N",
        kind: FieldKind::Integer,
        default: FieldValue::Integer(None),
    },
];

impl Field {
    /// Position of this field in [`FIELDS`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELDS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn flag(self) -> &'static str {
        self.descriptor().flag
    }

    pub fn kind(self) -> FieldKind {
        self.descriptor().kind
    }

    pub fn default_value(self) -> FieldValue {
        self.descriptor().default
    }

    /// Look up a field by its command-line flag
    pub fn from_flag(flag: &str) -> Option<Field> {
        FIELDS.iter().find(|d| d.flag == flag).map(|d| d.field)
    }
}
