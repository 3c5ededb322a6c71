//! JSON <-> exprql Value conversion utilities

use super::CliError;
use crate::{Parameters, Value};

/// Convert serde_json::Value to an exprql Value
///
/// Objects have no counterpart and are rejected; `name` is the parameter the
/// value is bound to, for the error message.
pub fn json_to_value(name: &str, v: serde_json::Value) -> Result<Value, CliError> {
    Ok(match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => Value::Float(f),
            None => return Err(CliError::UnsupportedParameter(name.to_string())),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(
            arr.into_iter()
                .map(|item| json_to_value(name, item))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(_) => {
            return Err(CliError::UnsupportedParameter(name.to_string()));
        }
    })
}

/// Convert an exprql Value to serde_json::Value
pub fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Time(t) => serde_json::Value::String(t.to_rfc3339()),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
    }
}

/// Parse a JSON object of parameter bindings
pub fn parameters_from_json(json: &str) -> Result<Parameters, CliError> {
    let serde_json::Value::Object(map) = serde_json::from_str::<serde_json::Value>(json)? else {
        return Err(CliError::ParametersNotObject);
    };

    map.into_iter()
        .map(|(name, value)| -> Result<(String, Value), CliError> {
            let value = json_to_value(&name, value)?;
            Ok((name, value))
        })
        .collect()
}
