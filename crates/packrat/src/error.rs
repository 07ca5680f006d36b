//! Error taxonomy shared by all backends.

use thiserror::Error;

/// Errors surfaced by CAS and action-cache operations.
///
/// "Not found" is never an error: `load` and `lookup` return `Ok(None)`
/// and `contains` returns `Ok(false)` for absent entries. No operation
/// retries or suppresses a failure, with the documented exception of
/// best-effort paths (constructor directory creation, `delete`, `clear`).
#[derive(Debug, Error)]
pub enum CasError {
    /// Filesystem failure from a local backend, propagated as-is.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize an outgoing payload or sidecar.
    #[error("failed to encode payload: {0}")]
    Encoding(#[source] serde_json::Error),

    /// Malformed sidecar JSON, response JSON, or base64 payload.
    #[error("failed to decode {0}")]
    Decoding(String),

    /// The network call itself failed (DNS, connection reset, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A response was received but could not be read as an HTTP response.
    #[error("invalid response from remote CAS: {0}")]
    InvalidResponse(String),

    /// The remote answered with a status outside the expected set for the
    /// operation. Carries the body text when the body was non-empty.
    #[error("remote CAS responded with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The request URL could not be constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result alias for CAS operations.
pub type CasResult<T> = Result<T, CasError>;
