//! Monetary rounding and lenient numeric coercion.

use serde_json::Value as JsonValue;

/// Round a monetary amount to 2 decimal places (half away from zero).
///
/// Non-finite input rounds to `0.0`, and negative zero is normalised to `0.0`
/// so rounded reports compare and serialize identically.
pub fn round_money(value: f64) -> f64 {
    let value = sanitize_amount(value);
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Replace NaN and infinities with `0.0`.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Read a number out of an arbitrary JSON value, if it holds one.
///
/// JSON numbers and numeric strings qualify; non-finite results do not.
pub fn parse_amount(value: &JsonValue) -> Option<f64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Like [`parse_amount`], but anything that is not a number counts as `0.0`.
pub fn coerce_amount(value: &JsonValue) -> f64 {
    parse_amount(value).unwrap_or(0.0)
}

/// Read a record key out of an arbitrary JSON value.
///
/// Strings and numbers are accepted; blank strings and other shapes yield `None`.
pub fn coerce_key(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
