//! Conversions from loosely typed values into the shapes primitives take.
//!
//! Every failure is an [`ActionError::TypeCoercion`] naming the offending key.

use domdriver_core_types::{QuerySelector, Value};

use crate::errors::ActionError;

fn mismatch(what: &str, expected: &str, got: &Value) -> ActionError {
    ActionError::TypeCoercion(format!("{what}: expected {expected}, got {}", kind_of(got)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Non-negative whole number, from a JSON number or a numeric string.
pub fn to_u64(what: &str, value: &Value) -> Result<u64, ActionError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(what, "a non-negative integer", value))
}

pub fn to_f64(what: &str, value: &Value) -> Result<f64, ActionError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| mismatch(what, "a number", value))
}

pub fn to_str<'a>(what: &str, value: &'a Value) -> Result<&'a str, ActionError> {
    value.as_str().ok_or_else(|| mismatch(what, "a string", value))
}

/// A bare string is a CSS selector; an object spells out `{kind, value}`.
pub fn to_selector(what: &str, value: &Value) -> Result<QuerySelector, ActionError> {
    match value {
        Value::String(s) => Ok(QuerySelector::css(s.clone())),
        Value::Object(_) => serde_json::from_value(value.clone())
            .map_err(|err| ActionError::TypeCoercion(format!("{what}: {err}"))),
        other => Err(mismatch(what, "a string or {kind, value} object", other)),
    }
}

/// Text payload for input: scalars are stringified, `null` is empty.
pub fn to_text(value: &Value) -> Result<String, ActionError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(mismatch("args", "text", other)),
    }
}

/// Key or option list: an array of scalars, or a single scalar.
pub fn to_string_list(value: &Value) -> Result<Vec<String>, ActionError> {
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| scalar(item).ok_or_else(|| mismatch("args[]", "a string", item)))
            .collect(),
        other => scalar(other)
            .map(|s| vec![s])
            .ok_or_else(|| mismatch("args", "a string or an array of strings", other)),
    }
}
