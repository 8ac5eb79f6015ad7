//! Lenient readers for untyped upstream JSON.
//!
//! Responses that feed the dashboard are read field by field so that one
//! missing or malformed value degrades to a default instead of failing the
//! whole record.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads a non-negative decimal from a number or numeric string.
///
/// Missing, null, negative, or unparseable values yield `None`.
pub(crate) fn decimal(raw: &Value, key: &str) -> Option<Decimal> {
    let parsed = match raw.get(key)? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }?;
    (!parsed.is_sign_negative()).then_some(parsed)
}

/// Reads a non-negative whole count, truncating fractional input.
pub(crate) fn count(raw: &Value, key: &str) -> Option<u64> {
    decimal(raw, key).and_then(|d| d.trunc().to_u64())
}

/// Reads a non-empty string.
pub(crate) fn string<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Reads a boolean.
pub(crate) fn boolean(raw: &Value, key: &str) -> Option<bool> {
    raw.get(key).and_then(Value::as_bool)
}

/// Deserializes a field into a typed value, such as an enum.
pub(crate) fn typed<T: DeserializeOwned>(raw: &Value, key: &str) -> Option<T> {
    raw.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        let raw = json!({ "a": 9842.5, "b": "12.25", "c": 3 });
        assert_eq!(decimal(&raw, "a"), Some(dec!(9842.5)));
        assert_eq!(decimal(&raw, "b"), Some(dec!(12.25)));
        assert_eq!(decimal(&raw, "c"), Some(dec!(3)));
    }

    #[test]
    fn test_decimal_rejects_bad_input() {
        let raw = json!({ "neg": -1, "text": "lots", "null": null, "arr": [1] });
        assert_eq!(decimal(&raw, "neg"), None);
        assert_eq!(decimal(&raw, "text"), None);
        assert_eq!(decimal(&raw, "null"), None);
        assert_eq!(decimal(&raw, "arr"), None);
        assert_eq!(decimal(&raw, "missing"), None);
    }

    #[test]
    fn test_count_truncates() {
        let raw = json!({ "n": 500.9, "big": 1e3 });
        assert_eq!(count(&raw, "n"), Some(500));
        assert_eq!(count(&raw, "big"), Some(1000));
    }

    #[test]
    fn test_string_skips_empty() {
        let raw = json!({ "name": "", "email": "a@b.c" });
        assert_eq!(string(&raw, "name"), None);
        assert_eq!(string(&raw, "email"), Some("a@b.c"));
    }
}
