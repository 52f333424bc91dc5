//! Request assertions and their results.
//!
//! This module holds the assertion vocabulary (names and message templates),
//! the record primitive that turns a boolean verdict into a pass or an
//! [`AssertionFailure`], and the value rendering used in messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::matching::number_text;

/// Placeholder replaced by the rendered expected value.
pub const EXPECTED_PLACEHOLDER: &str = "#{exp}";

/// Placeholder replaced by the rendered actual value.
pub const ACTUAL_PLACEHOLDER: &str = "#{act}";

/// Failure message used when a value assertion could not compare anything
/// because the interceptor never completed a request.
pub const NEVER_CALLED_MESSAGE: &str =
    "expected interceptor to have been requested, but it was never called";

/// The four request assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertionKind {
    /// The interceptor was requested at all.
    Requested,
    /// The request body deep-equals the expectation.
    RequestedWith,
    /// The request headers equal the expectation exactly.
    RequestedWithExactHeaders,
    /// The request headers include every expected pair.
    RequestedWithHeaders,
}

impl AssertionKind {
    /// Name of the assertion in the chainable vocabulary.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::RequestedWith => "requestedWith",
            Self::RequestedWithExactHeaders => "requestedWithExactHeaders",
            Self::RequestedWithHeaders => "requestedWithHeaders",
        }
    }

    /// Message template used when the positive form fails.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Requested => "expected interceptor to have been requested",
            Self::RequestedWith => {
                "expected interceptor to have been requested with #{exp}, but was requested with #{act}"
            }
            Self::RequestedWithExactHeaders => {
                "expected interceptor to have been requested with exact headers #{exp}, but was requested with headers #{act}"
            }
            Self::RequestedWithHeaders => {
                "expected interceptor to have been requested with headers #{exp}, but was requested with headers #{act}"
            }
        }
    }

    /// Message template used when the negated form fails.
    #[must_use]
    pub const fn negated_message(self) -> &'static str {
        match self {
            Self::Requested => "expected interceptor to have not been requested",
            Self::RequestedWith => "expected interceptor to have not been requested with #{exp}",
            Self::RequestedWithExactHeaders => {
                "expected interceptor to have not been requested with exact headers #{exp}"
            }
            Self::RequestedWithHeaders => {
                "expected interceptor to have not been requested with headers #{exp}"
            }
        }
    }
}

/// A failed assertion, with the values involved for diff rendering.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    /// Rendered failure message.
    pub message: String,
    /// Expected value, if the assertion had one.
    pub expected: Option<Value>,
    /// Actual value, if one was captured.
    pub actual: Option<Value>,
}

/// Whether an assertion is evaluated in positive or negated (`not`) form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssertionContext {
    negated: bool,
}

impl AssertionContext {
    /// A positive context.
    #[must_use]
    pub const fn new() -> Self {
        Self { negated: false }
    }

    /// Returns the context with negation flipped.
    #[must_use]
    pub const fn not(self) -> Self {
        Self {
            negated: !self.negated,
        }
    }

    /// Returns true if this context is negated.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        self.negated
    }

    /// Records a verdict.
    ///
    /// Succeeds when `passed` holds in a positive context or fails in a
    /// negated one. Otherwise the matching template is rendered with
    /// `expected` and `actual` and returned as an [`AssertionFailure`].
    ///
    /// # Errors
    /// Returns the failure described above.
    pub fn assert(
        self,
        passed: bool,
        message: &str,
        negated_message: &str,
        expected: Option<&Value>,
        actual: Option<&Value>,
    ) -> Result<(), AssertionFailure> {
        if passed != self.negated {
            return Ok(());
        }
        let template = if self.negated {
            negated_message
        } else {
            message
        };
        Err(AssertionFailure {
            message: render_template(template, expected, actual),
            expected: expected.cloned(),
            actual: actual.cloned(),
        })
    }
}

/// Substitutes the expected and actual placeholders in `template`.
#[must_use]
pub fn render_template(template: &str, expected: Option<&Value>, actual: Option<&Value>) -> String {
    template
        .replace(EXPECTED_PLACEHOLDER, &render_optional(expected))
        .replace(ACTUAL_PLACEHOLDER, &render_optional(actual))
}

/// Renders a value the way it appears in assertion messages.
///
/// `{"test": 123}` renders as `{ test: 123 }`, strings are single-quoted.
#[must_use]
pub fn render_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn render_optional(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), render_value)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(&flag.to_string()),
        Value::Number(number) => out.push_str(&number_text(number)),
        Value::String(text) => write_quoted(out, text),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push_str(" ]");
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{ ");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if is_identifier(key) {
                    out.push_str(key);
                } else {
                    write_quoted(out, key);
                }
                out.push_str(": ");
                write_value(out, item);
            }
            out.push_str(" }");
        }
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_object() {
        assert_eq!(render_value(&json!({"test": 123})), "{ test: 123 }");
        assert_eq!(
            render_value(&json!({"wrongKey": 789, "test": 123})),
            "{ wrongKey: 789, test: 123 }"
        );
        assert_eq!(render_value(&json!({})), "{}");
    }

    #[test]
    fn test_render_nested_and_quoted() {
        assert_eq!(
            render_value(&json!({"content-type": "text/plain", "list": [1, true, null]})),
            "{ 'content-type': 'text/plain', list: [ 1, true, null ] }"
        );
        assert_eq!(render_value(&json!("it's")), r"'it\'s'");
        assert_eq!(render_value(&json!([])), "[]");
    }

    #[test]
    fn test_render_integral_floats_as_integers() {
        let parsed: Value = serde_json::from_str(r#"{"test":123.0,"scaled":1e2,"half":0.5}"#).unwrap();
        assert_eq!(render_value(&parsed), "{ test: 123, scaled: 100, half: 0.5 }");
    }

    #[test]
    fn test_positive_pass_and_fail() {
        let ctx = AssertionContext::new();
        assert!(ctx.assert(true, "pos", "neg", None, None).is_ok());

        let failure = ctx
            .assert(
                false,
                AssertionKind::RequestedWith.message(),
                AssertionKind::RequestedWith.negated_message(),
                Some(&json!({"test": 124})),
                Some(&json!({"test": 123})),
            )
            .unwrap_err();
        assert_eq!(
            failure.message,
            "expected interceptor to have been requested with { test: 124 }, but was requested with { test: 123 }"
        );
        assert_eq!(failure.expected, Some(json!({"test": 124})));
        assert_eq!(failure.actual, Some(json!({"test": 123})));
    }

    #[test]
    fn test_negated_flips_verdict() {
        let ctx = AssertionContext::new().not();
        assert!(ctx.is_negated());
        assert!(ctx.assert(false, "pos", "neg", None, None).is_ok());

        let failure = ctx
            .assert(
                true,
                AssertionKind::RequestedWithHeaders.message(),
                AssertionKind::RequestedWithHeaders.negated_message(),
                Some(&json!({"test": 123})),
                None,
            )
            .unwrap_err();
        assert_eq!(
            failure.message,
            "expected interceptor to have not been requested with headers { test: 123 }"
        );
    }

    #[test]
    fn test_missing_values_render_undefined() {
        let rendered = render_template("#{exp} vs #{act}", Some(&json!(1)), None);
        assert_eq!(rendered, "1 vs undefined");
    }

    #[test]
    fn test_assertion_names() {
        assert_eq!(AssertionKind::Requested.name(), "requested");
        assert_eq!(AssertionKind::RequestedWithHeaders.name(), "requestedWithHeaders");
        assert_eq!(
            AssertionKind::RequestedWithExactHeaders.name(),
            "requestedWithExactHeaders"
        );
    }
}
