//! Request data captured from an interceptor.
//!
//! A [`CapturedRequest`] is built from the first request an interceptor
//! reports and never changes afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// A request body as seen by the interceptor.
///
/// Payloads that parse as JSON are kept as structured values, anything else
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Body {
    /// The payload was a JSON document.
    Parsed(Value),
    /// The payload was not JSON (lossy UTF-8).
    Raw(String),
}

impl Body {
    /// Parses a raw payload, falling back to the payload text on failure.
    #[must_use]
    pub fn parse(payload: &[u8]) -> Self {
        serde_json::from_slice(payload).map_or_else(
            |_| Self::Raw(String::from_utf8_lossy(payload).into_owned()),
            Self::Parsed,
        )
    }

    /// Returns the body as a JSON value, raw payloads becoming strings.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Parsed(value) => value.clone(),
            Self::Raw(text) => Value::String(text.clone()),
        }
    }
}

/// Ordered request headers, name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(IndexMap<String, String>);

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Inserts a header, replacing any previous value for the same name.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidHeaderName`] for empty names or names
    /// containing whitespace.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomainResult<Option<String>> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidHeaderName(name));
        }
        Ok(self.0.insert(name, value.into()))
    }

    /// Returns the value for `name`, matching the name exactly.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if a header with exactly this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy with every header name lowercased.
    ///
    /// When two names collide after lowercasing, the later one wins.
    #[must_use]
    pub fn to_lowercase_names(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
                .collect(),
        )
    }

    /// Returns the headers as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Body and headers of the first request an interceptor reported.
///
/// Both fields are `None` when the interceptor completed without ever
/// reporting a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedRequest {
    /// Captured body.
    pub body: Option<Body>,
    /// Captured headers.
    pub headers: Option<Headers>,
}

impl CapturedRequest {
    /// Captures a request from its headers and raw payload.
    #[must_use]
    pub fn new(headers: Headers, payload: &[u8]) -> Self {
        Self {
            body: Some(Body::parse(payload)),
            headers: Some(headers),
        }
    }

    /// A capture for an interceptor that completed without a request.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Body as a JSON value, if any.
    #[must_use]
    pub fn body_value(&self) -> Option<Value> {
        self.body.as_ref().map(Body::to_value)
    }

    /// Headers as a JSON object, if any.
    #[must_use]
    pub fn headers_value(&self) -> Option<Value> {
        self.headers.as_ref().map(Headers::to_value)
    }
}
