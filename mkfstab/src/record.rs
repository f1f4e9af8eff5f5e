// SPDX-License-Identifier: GPL-3.0-only

//! Helpers for decoding loosely-typed records into typed entries

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ValidationError;

/// Decode `value` into `T`, reporting any shape mismatch as [`ValidationError::Malformed`].
pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, ValidationError> {
    T::deserialize(value).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Short human-readable name of a value's kind for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

/// Treat empty strings the same as a missing value.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Decode a boolean flag, also accepting the spellings older YAML 1.1 files
/// use (`yes`/`no`, `on`/`off`, `y`/`n`, `t`/`f`) and the numbers 0 and 1.
pub(crate) fn lax_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };

    parsed.ok_or_else(|| {
        de::Error::custom(format!(
            "invalid boolean {value}, expected true/false, yes/no, on/off or 0/1"
        ))
    })
}

/// Log keys a record carried that no field consumed.
pub(crate) fn warn_unknown_keys(kind: &str, extra: &BTreeMap<String, Value>) {
    for key in extra.keys() {
        tracing::warn!(key = %key, "ignoring unknown {kind} field");
    }
}
