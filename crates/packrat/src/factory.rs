//! Environment-driven construction of remote backends.
//!
//! Explicit construction goes through [`RemoteCas::new`] /
//! [`RemoteCas::with_client`]; this module covers the second path, where
//! the service URL comes from `PACKRAT_REMOTE_URL`.

use std::env;

use thiserror::Error;

use crate::remote::{RemoteCas, RemoteOptions};

/// Environment variable naming the remote CAS service URL.
pub const REMOTE_URL_VAR: &str = "PACKRAT_REMOTE_URL";

/// Errors from environment-driven construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is unset or empty.
    #[error("environment variable PACKRAT_REMOTE_URL is not set")]
    MissingRemoteUrl,

    /// The variable is set but not an absolute HTTP(S) URL.
    #[error("environment variable PACKRAT_REMOTE_URL does not contain a valid HTTP URL: {0}")]
    InvalidRemoteUrl(String),
}

/// Build a remote backend from `PACKRAT_REMOTE_URL`.
pub fn remote_from_env() -> Result<RemoteCas, ConfigError> {
    remote_from_value(env::var(REMOTE_URL_VAR).ok().as_deref())
}

/// Build a remote backend from an explicit variable value.
///
/// Split out from [`remote_from_env`] so callers and tests can inject a
/// value without mutating the process environment.
pub fn remote_from_value(value: Option<&str>) -> Result<RemoteCas, ConfigError> {
    let value = match value {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ConfigError::MissingRemoteUrl),
    };

    let url = reqwest::Url::parse(value)
        .map_err(|_| ConfigError::InvalidRemoteUrl(value.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidRemoteUrl(value.to_string()));
    }

    Ok(RemoteCas::new(RemoteOptions::new(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_url_succeeds() {
        let cas = remote_from_value(Some("https://example.com/api")).unwrap();
        assert_eq!(cas.base_url(), "https://example.com/api");
    }

    #[test]
    fn test_plain_http_succeeds() {
        let cas = remote_from_value(Some("http://localhost:8080")).unwrap();
        assert_eq!(cas.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_unset_is_missing() {
        let result = remote_from_value(None);
        assert!(matches!(result, Err(ConfigError::MissingRemoteUrl)));
    }

    #[test]
    fn test_empty_is_missing() {
        let result = remote_from_value(Some(""));
        assert!(matches!(result, Err(ConfigError::MissingRemoteUrl)));
    }

    #[test]
    fn test_relative_value_is_invalid() {
        let result = remote_from_value(Some("not-a-url"));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRemoteUrl(value)) if value == "not-a-url"
        ));
    }

    #[test]
    fn test_non_http_scheme_is_invalid() {
        let result = remote_from_value(Some("ftp://example.com"));
        assert!(matches!(result, Err(ConfigError::InvalidRemoteUrl(_))));
    }
}
