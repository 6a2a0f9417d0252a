//! Environment-based configuration for the demo binary.

use crate::types::OwnerId;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the collection base URL
pub const BASE_URL_VAR: &str = "TODOSYNC_BASE_URL";
/// Environment variable naming the collection owner id
pub const USER_ID_VAR: &str = "TODOSYNC_USER_ID";
/// Environment variable overriding the error banner lifetime, in
/// milliseconds
pub const ERROR_TTL_VAR: &str = "TODOSYNC_ERROR_TTL_MS";

/// Errors that can occur while reading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    /// An environment variable is set to an unparseable value
    #[error("invalid value {value:?} for {name}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Runtime configuration for the demo binary.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote collection
    pub base_url: String,
    /// Owner of the collection
    pub owner: OwnerId,
    /// Error banner lifetime
    pub error_ttl: Duration,
}

impl Config {
    /// Default error banner lifetime when the variable is unset
    pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(3);

    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a required variable is unset
    /// and [`ConfigError::Invalid`] when a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR).ok_or(ConfigError::Missing(BASE_URL_VAR))?;

        let owner_raw = lookup(USER_ID_VAR).ok_or(ConfigError::Missing(USER_ID_VAR))?;
        let owner = owner_raw
            .parse::<i64>()
            .map(OwnerId::new)
            .map_err(|_| ConfigError::Invalid {
                name: USER_ID_VAR,
                value: owner_raw,
            })?;

        let error_ttl = match lookup(ERROR_TTL_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    name: ERROR_TTL_VAR,
                    value: raw,
                })?,
            None => Self::DEFAULT_ERROR_TTL,
        };

        Ok(Self {
            base_url,
            owner,
            error_ttl,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| {
            owned
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn reads_required_variables() {
        let config = Config::from_lookup(vars(&[
            (BASE_URL_VAR, "https://example.test/api"),
            (USER_ID_VAR, "42"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://example.test/api");
        assert_eq!(config.owner.get(), 42);
        assert_eq!(config.error_ttl, Config::DEFAULT_ERROR_TTL);
    }

    #[test]
    fn missing_base_url_is_reported() {
        let error = Config::from_lookup(vars(&[(USER_ID_VAR, "42")])).unwrap_err();
        assert_eq!(error, ConfigError::Missing(BASE_URL_VAR));
    }

    #[test]
    fn invalid_owner_is_reported() {
        let error = Config::from_lookup(vars(&[
            (BASE_URL_VAR, "https://example.test/api"),
            (USER_ID_VAR, "not-a-number"),
        ]))
        .unwrap_err();

        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: USER_ID_VAR,
                ..
            }
        ));
    }

    #[test]
    fn error_ttl_override_is_parsed() {
        let config = Config::from_lookup(vars(&[
            (BASE_URL_VAR, "https://example.test/api"),
            (USER_ID_VAR, "42"),
            (ERROR_TTL_VAR, "1500"),
        ]))
        .unwrap();

        assert_eq!(config.error_ttl, Duration::from_millis(1500));
    }
}
