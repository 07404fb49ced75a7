//! Shape checks over raw JSON payloads.
//!
//! The store hands out payloads exactly as the engine wrote them. These
//! helpers walk into them and turn the requested part into numbers, failing
//! with [`InflError::MalformedPayload`] as soon as a level has the wrong
//! structure.

use serde_json::Value;

use crate::errors::{InflError, InflResult};

/// Borrow a payload level as a sequence.
pub fn as_sequence<'a>(value: &'a Value, artifact: &str, at: &str) -> InflResult<&'a [Value]> {
    value.as_array().map(Vec::as_slice).ok_or_else(|| {
        InflError::malformed(
            artifact,
            format!("a sequence at {}", at),
            format!("found {}", kind_of(value)),
        )
    })
}

/// Convert a payload level into a numeric series.
pub fn as_series(value: &Value, artifact: &str, at: &str) -> InflResult<Vec<f64>> {
    as_sequence(value, artifact, at)?
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            sample.as_f64().ok_or_else(|| {
                InflError::malformed(
                    artifact,
                    format!("numbers at {}", at),
                    format!("sample {} is {}", i, kind_of(sample)),
                )
            })
        })
        .collect()
}

/// Convert a whole payload into a sequence of series.
pub fn as_series_list(value: &Value, artifact: &str) -> InflResult<Vec<Vec<f64>>> {
    as_sequence(value, artifact, "top level")?
        .iter()
        .enumerate()
        .map(|(i, item)| as_series(item, artifact, &format!("[{}]", i)))
        .collect()
}

/// Convert a whole payload into `[outer][inner][sample]` numbers.
pub fn as_nested_series(value: &Value, artifact: &str) -> InflResult<Vec<Vec<Vec<f64>>>> {
    as_sequence(value, artifact, "top level")?
        .iter()
        .enumerate()
        .map(|(i, outer)| {
            as_sequence(outer, artifact, &format!("[{}]", i))?
                .iter()
                .enumerate()
                .map(|(j, inner)| as_series(inner, artifact, &format!("[{}][{}]", i, j)))
                .collect()
        })
        .collect()
}

/// Short description of a JSON value's kind, for error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
