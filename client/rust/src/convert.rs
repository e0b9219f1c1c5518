//! Conversion helpers for ledger-native values.
//!
//! Move integers wider than 53 bits arrive from the fullnode as base-10
//! strings. Everything here parses losslessly into `u64` or fails closed;
//! nothing truncates.

use crate::error::{ClientError, Result};
use serde_json::Value;

/// Length in bytes of a Sui address or object id.
pub const SUI_ADDRESS_LENGTH: usize = 32;

/// Parse a canonical base-10 string into a `u64`.
///
/// Canonical means ASCII digits only, no sign, no whitespace and no leading
/// zeros (except `"0"` itself), so `parse_u64_str(x)?.to_string() == x`
/// holds for every accepted input.
///
/// # Examples
/// ```
/// use sui_sync_client::convert::parse_u64_str;
/// assert_eq!(parse_u64_str("18446744073709551615").unwrap(), u64::MAX);
/// assert!(parse_u64_str("18446744073709551616").is_err());
/// ```
pub fn parse_u64_str(s: &str) -> Result<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::MalformedResponse(format!(
            "{:?} is not an unsigned integer",
            s
        )));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(ClientError::MalformedResponse(format!(
            "{:?} has leading zeros",
            s
        )));
    }
    s.parse::<u64>()
        .map_err(|_| ClientError::MalformedResponse(format!("{} exceeds the u64 range", s)))
}

/// Convert a JSON field value into a `u64`.
///
/// Accepts canonical decimal strings and non-negative JSON integers.
/// Floats, negatives, and integers past `u64::MAX` are rejected.
pub fn value_to_u64(value: &Value) -> Result<u64> {
    match value {
        Value::String(s) => parse_u64_str(s),
        Value::Number(n) => n.as_u64().ok_or_else(|| {
            ClientError::MalformedResponse(format!("{} is not representable as u64", n))
        }),
        other => Err(ClientError::MalformedResponse(format!(
            "expected an integer, got {}",
            json_kind(other)
        ))),
    }
}

/// Check whether `s` is a valid Move identifier (module or function name).
pub fn is_move_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        // A lone underscore is reserved.
        Some('_') if s.len() > 1 => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Short human-readable name of a JSON value's type, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
