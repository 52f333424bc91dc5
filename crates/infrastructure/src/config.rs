//! Assertion settings loaded from the environment.

use intercept_domain::AssertionSettings;
use thiserror::Error;

/// Environment variable overriding the wait timeout, in milliseconds.
pub const TIMEOUT_ENV: &str = "INTERCEPT_ASSERT_TIMEOUT_MS";

/// Errors raised while loading settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The timeout variable is not a positive integer.
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Loads settings from the process environment.
///
/// Assertion chains use the built-in defaults unless given these settings:
///
/// ```
/// use intercept_application::expect;
/// use intercept_domain::HttpMethod;
/// use intercept_infrastructure::{MockScope, load_settings};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scope = MockScope::new("someurl.com").intercept(HttpMethod::Get, "/")?;
/// let settings = load_settings()?;
/// let _chain = expect(&scope).with_settings(settings);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns [`ConfigError::InvalidTimeout`] if the timeout variable is set
/// to something other than a positive integer.
pub fn load_settings() -> Result<AssertionSettings, ConfigError> {
    settings_from_lookup(|key| std::env::var(key).ok())
}

/// Loads settings through `lookup`, falling back to defaults for unset keys.
///
/// # Errors
/// Same as [`load_settings`].
pub fn settings_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AssertionSettings, ConfigError> {
    let mut settings = AssertionSettings::default();
    if let Some(raw) = lookup(TIMEOUT_ENV) {
        settings.timeout_ms = match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => ms,
            _ => {
                return Err(ConfigError::InvalidTimeout {
                    var: TIMEOUT_ENV,
                    value: raw,
                });
            }
        };
    }
    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use intercept_domain::DEFAULT_TIMEOUT_MS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_unset() {
        let settings = settings_from_lookup(|_| None).unwrap();
        assert_eq!(settings.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_reads_timeout() {
        let settings = settings_from_lookup(|key| (key == TIMEOUT_ENV).then(|| " 750 ".to_string()))
            .unwrap();
        assert_eq!(settings.timeout_ms, 750);
    }

    #[test]
    fn test_rejects_invalid_timeout() {
        for raw in ["0", "-5", "soon", ""] {
            let result = settings_from_lookup(|_| Some(raw.to_string()));
            assert_eq!(
                result,
                Err(ConfigError::InvalidTimeout {
                    var: TIMEOUT_ENV,
                    value: raw.to_string(),
                })
            );
        }
    }
}
