//! Canonical text form of an evaluated program
//!
//! The output is a value dump in conventional JSON. It is not Konf source
//! and cannot be fed back into the parser.

use crate::evaluator::Value;
use serde_json::Value as JsonValue;

/// Top-level sequence as a JSON array
pub fn to_json(values: &[Value]) -> JsonValue {
    JsonValue::Array(values.iter().map(Value::to_json).collect())
}

/// Compact JSON text
pub fn to_string(values: &[Value]) -> String {
    to_json(values).to_string()
}

/// Indented JSON text
pub fn to_string_pretty(values: &[Value]) -> String {
    format!("{:#}", to_json(values))
}
