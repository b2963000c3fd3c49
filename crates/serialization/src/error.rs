//! The single error kind of the normalization layer.

use crate::path::Path;
use serde_json::Value;
use thiserror::Error;

/// Raised when a raw wire value does not have the shape its schema declares.
///
/// Carries the path of the offending field and an expected-vs-actual
/// description. Normalization never recovers from one of these; the first
/// failure aborts the whole call and no partial object escapes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value at {path}: expected {expected}, got {actual}")]
pub struct ValidationError {
    pub path: Path,
    pub expected: String,
    pub actual: String,
}

impl ValidationError {
    /// Type mismatch against a present value.
    pub fn mismatch(path: &Path, expected: &str, actual: &Value) -> Self {
        Self {
            path: path.clone(),
            expected: expected.to_owned(),
            actual: describe(actual),
        }
    }

    /// A required field was absent from the payload.
    pub fn missing(path: &Path, expected: &str) -> Self {
        Self {
            path: path.clone(),
            expected: expected.to_owned(),
            actual: "absent".to_owned(),
        }
    }

    /// A normalized payload that still cannot be read as the target model.
    pub fn decode(path: &Path, expected: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            path: path.clone(),
            expected: expected.to_owned(),
            actual: detail.to_string(),
        }
    }
}

/// Short description of a JSON value for error messages. Scalars include the
/// value itself, containers only their kind.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_owned(),
        Value::Object(_) => "object".to_owned(),
    }
}
