//! Parameter typing and parameter file loading

use crate::error::{GenerationError, ParseError};
use serde_yaml::Value;
use std::{fmt, fs, path::Path};

/// A ROS 2 parameter value as the component container would declare it.
///
/// Values rendered from substitutions are strings; the runtime types them
/// by reading each string as a YAML scalar or flow sequence. Its loader
/// follows YAML 1.1, so `yes`/`no`/`on`/`off` are booleans there as well.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    BoolArray(Vec<bool>),
    IntegerArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl ParameterValue {
    /// Infer the typed value of a rendered parameter string
    pub fn infer(raw: &str) -> Self {
        if let Some(b) = yaml11_bool(raw) {
            return ParameterValue::Bool(b);
        }
        match serde_yaml::from_str::<Value>(raw) {
            Ok(Value::Bool(b)) => ParameterValue::Bool(b),
            Ok(Value::Number(n)) => number_value(&n).unwrap_or_else(|| Self::text(raw)),
            Ok(Value::String(s)) => ParameterValue::String(s),
            Ok(Value::Sequence(items)) => sequence_value(&items).unwrap_or_else(|| Self::text(raw)),
            // Empty strings, mappings and anything unparsable stay text
            _ => Self::text(raw),
        }
    }

    fn text(raw: &str) -> Self {
        ParameterValue::String(raw.to_string())
    }

    /// ROS type name, as printed by `ros2 param describe`
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Double(_) => "double",
            ParameterValue::String(_) => "string",
            ParameterValue::BoolArray(_) => "bool array",
            ParameterValue::IntegerArray(_) => "integer array",
            ParameterValue::DoubleArray(_) => "double array",
            ParameterValue::StringArray(_) => "string array",
        }
    }
}

/// Booleans that YAML 1.1 accepts beyond `true`/`false`
fn yaml11_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Some(true),
        "no" | "No" | "NO" | "off" | "Off" | "OFF" => Some(false),
        _ => None,
    }
}

fn number_value(n: &serde_yaml::Number) -> Option<ParameterValue> {
    if let Some(i) = n.as_i64() {
        Some(ParameterValue::Integer(i))
    } else {
        n.as_f64().map(ParameterValue::Double)
    }
}

/// Homogeneous sequences only; integers widen to doubles when mixed
fn sequence_value(items: &[Value]) -> Option<ParameterValue> {
    if items.iter().all(Value::is_bool) {
        return Some(ParameterValue::BoolArray(
            items.iter().filter_map(Value::as_bool).collect(),
        ));
    }
    if items.iter().all(Value::is_i64) {
        return Some(ParameterValue::IntegerArray(
            items.iter().filter_map(Value::as_i64).collect(),
        ));
    }
    if items.iter().all(Value::is_number) {
        return Some(ParameterValue::DoubleArray(
            items.iter().filter_map(Value::as_f64).collect(),
        ));
    }
    if items.iter().all(Value::is_string) {
        return Some(ParameterValue::StringArray(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ));
    }
    None
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn double(value: f64) -> String {
    // Keep a decimal point so the value is not retyped as an integer
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(b) => write!(f, "{}", b),
            ParameterValue::Integer(i) => write!(f, "{}", i),
            ParameterValue::Double(d) => write!(f, "{}", double(*d)),
            ParameterValue::String(s) => write!(f, "{}", s),
            ParameterValue::BoolArray(items) => write!(f, "[{}]", join(items)),
            ParameterValue::IntegerArray(items) => write!(f, "[{}]", join(items)),
            ParameterValue::DoubleArray(items) => {
                let items: Vec<String> = items.iter().map(|d| double(*d)).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ParameterValue::StringArray(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Type every parameter of a rendered node, keeping declaration order
pub fn typed_params(params: &[(String, String)]) -> Vec<(String, ParameterValue)> {
    params
        .iter()
        .map(|(name, value)| (name.clone(), ParameterValue::infer(value)))
        .collect()
}

/// Read a YAML parameter file, checking that it parses.
///
/// Returns the raw contents so they can be stored alongside the record.
pub fn load_param_file(path: &Path) -> Result<String, ParseError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str::<Value>(&content).map_err(|e| GenerationError::InvalidParamFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(content)
}
