//! Lenient typed lookups on a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key
//! or a value of the wrong type yields the default; these never fail.

use serde_json::Value;

/// Extracts an `f32` from `params[name]`, returning `default` if missing or wrong type.
///
/// Integers are accepted and converted.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a four-component color from `params[name]`.
///
/// The value must be an array of exactly four numbers; anything else
/// yields `default`.
pub fn param_rgba(params: &Value, name: &str, default: [f32; 4]) -> [f32; 4] {
    let Some(items) = params.get(name).and_then(Value::as_array) else {
        return default;
    };
    let channels: Vec<f32> = items
        .iter()
        .filter_map(Value::as_f64)
        .map(|v| v as f32)
        .collect();
    match channels.as_slice() {
        &[r, g, b, a] if items.len() == 4 => [r, g, b, a],
        _ => default,
    }
}
