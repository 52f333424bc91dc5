//! Interceptions registered on a mock endpoint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::id::generate_interception_id;
use crate::method::HttpMethod;

/// A single request pattern registered with a mock interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interception {
    /// Unique identifier of this interception.
    pub id: Uuid,
    /// Method the interception answers to.
    pub method: HttpMethod,
    /// Host the interception was registered on (e.g. `someurl.com`).
    pub host: String,
    /// Request path, always starting with `/`.
    pub path: String,
}

impl Interception {
    /// Creates a new interception for `method host path`.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPath`] if `path` does not start with `/`.
    pub fn new(
        method: HttpMethod,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> DomainResult<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(DomainError::InvalidPath(path));
        }
        Ok(Self {
            id: generate_interception_id(),
            method,
            host: host.into(),
            path,
        })
    }

    /// Returns true if a request with this method and path hits the interception.
    ///
    /// The query string, if any, is ignored.
    #[must_use]
    pub fn matches(&self, method: HttpMethod, path: &str) -> bool {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        self.method == method && self.path == path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_method_and_path() {
        let interception = Interception::new(HttpMethod::Get, "someurl.com", "/users").unwrap();
        assert!(interception.matches(HttpMethod::Get, "/users"));
        assert!(interception.matches(HttpMethod::Get, "/users?page=2"));
        assert!(!interception.matches(HttpMethod::Post, "/users"));
        assert!(!interception.matches(HttpMethod::Get, "/users/1"));
    }

    #[test]
    fn test_rejects_relative_path() {
        let result = Interception::new(HttpMethod::Get, "someurl.com", "users");
        assert_eq!(result, Err(DomainError::InvalidPath("users".to_string())));
    }
}
