//! Coercion of loosely-typed gateway values.
//!
//! The gateway is not consistent about encodings: win flags arrive as
//! booleans, `0`/`1` or strings, numbers sometimes arrive as strings, and
//! list endpoints occasionally return an error object instead of an array.

use serde_json::Value;

/// Strict boolean for a match outcome.
///
/// Recognizes `true`, the number `1` and the strings `"true"`/`"1"`
/// (trimmed, case-insensitive). Every other value, including `null` and
/// unrecognized strings, is a loss.
pub fn normalize_win(value: &Value) -> bool {
    match value {
        Value::Bool(won) => *won,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        _ => false,
    }
}

/// A finite number, from a JSON number or a numeric string.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Field lookup followed by [`coerce_f64`]; missing fields are `None`.
pub fn field_f64(row: &Value, key: &str) -> Option<f64> {
    row.get(key).and_then(coerce_f64)
}

/// A non-negative count. Fractions are truncated; anything unusable is 0.
pub fn coerce_count(value: &Value) -> u64 {
    match coerce_f64(value) {
        Some(n) if n > 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

pub fn field_count(row: &Value, key: &str) -> u64 {
    row.get(key).map(coerce_count).unwrap_or(0)
}

/// A non-empty, trimmed name.
pub fn coerce_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn field_name(row: &Value, key: &str) -> Option<String> {
    row.get(key).and_then(coerce_name)
}

/// The rows of a list response, or nothing when the body is not an array.
pub fn as_rows(body: &Value) -> &[Value] {
    match body {
        Value::Array(rows) => rows.as_slice(),
        _ => &[],
    }
}

pub fn clamp_fraction(rate: f64) -> f64 {
    rate.clamp(0.0, 1.0)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
