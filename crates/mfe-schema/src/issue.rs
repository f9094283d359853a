//! Validation issues.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// One problem found while validating a value against a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path to the offending value (empty for the root)
    pub path: String,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for ValidationIssue {}

/// What went wrong at an issue's path.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("required field is missing")]
    MissingRequired,

    #[error("unknown field")]
    UnknownField,

    #[error("{value} is outside {bounds}")]
    OutOfRange { value: f64, bounds: String },

    #[error("'{value}' is not one of [{}]", allowed.join(", "))]
    NotAllowed { value: String, allowed: Vec<String> },

    #[error("'{value}' does not match pattern {pattern}")]
    PatternMismatch { value: String, pattern: String },

    #[error("invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("length {length} is below minimum {min}")]
    TooShort { length: usize, min: usize },

    /// Passed the schema but cannot be held by the app's typed model.
    #[error("value does not fit the typed model: {reason}")]
    ModelMismatch { reason: String },
}

/// JSON type name of a value, as reported in type mismatches.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn format_bounds(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("[{}, {}]", lo, hi),
        (Some(lo), None) => format!("[{}, ∞)", lo),
        (None, Some(hi)) => format!("(-∞, {}]", hi),
        (None, None) => "(-∞, ∞)".to_string(),
    }
}
