//! Structural comparison of captured requests against expectations.
//!
//! These are pure functions over JSON values and [`Headers`]; they know
//! nothing about how the request was captured.

use serde_json::{Number, Value};

use crate::capture::{Body, Headers};

/// Returns true if the captured body deep-equals `expected`.
///
/// A parsed body is compared structurally, a raw body only equals a JSON
/// string with the same text. An absent body matches nothing.
#[must_use]
pub fn body_matches(body: Option<&Body>, expected: &Value) -> bool {
    match body {
        Some(Body::Parsed(value)) => values_equal(value, expected),
        Some(Body::Raw(text)) => expected.as_str() == Some(text.as_str()),
        None => false,
    }
}

/// Deep structural equality with a single numeric type.
///
/// Numbers are equal when they denote the same value, so `123`, `123.0`
/// and `1.23e2` are all equal. Object key order is ignored.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

/// Renders a number the way assertion messages and header values show it.
///
/// Integral floats drop their fraction: `123.0` renders as `123`.
#[must_use]
pub fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
            format!("{float:.0}")
        }
        _ => number.to_string(),
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    false
}

/// Returns true if `headers` holds exactly the pairs in `expected`.
///
/// `expected` must be a JSON object with the same names (compared
/// case-sensitively) and equal values; no extra or missing names.
#[must_use]
pub fn headers_match_exactly(headers: Option<&Headers>, expected: &Value) -> bool {
    let (Some(headers), Some(expected)) = (headers, expected.as_object()) else {
        return false;
    };
    headers.len() == expected.len() && contains_all(headers, expected)
}

/// Returns true if every pair in `expected` is present in `headers`.
///
/// Extra captured headers are ignored. Non-object expectations never match.
#[must_use]
pub fn headers_include(headers: Option<&Headers>, expected: &Value) -> bool {
    let (Some(headers), Some(expected)) = (headers, expected.as_object()) else {
        return false;
    };
    contains_all(headers, expected)
}

/// Compares a captured header value against an expected JSON scalar.
///
/// Numbers and booleans are compared by their textual form, so an expected
/// `123` equals the header value `"123"`.
#[must_use]
pub fn header_value_eq(actual: &str, expected: &Value) -> bool {
    match expected {
        Value::String(text) => text == actual,
        Value::Number(number) => number_text(number) == actual,
        Value::Bool(flag) => flag.to_string() == actual,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn contains_all(headers: &Headers, expected: &serde_json::Map<String, Value>) -> bool {
    expected.iter().all(|(name, value)| {
        headers
            .get(name)
            .is_some_and(|actual| header_value_eq(actual, value))
    })
}
