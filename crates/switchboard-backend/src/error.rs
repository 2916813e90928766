use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the workflow backend.
///
/// The variants keep application failures (the backend answered with an
/// error status) distinguishable from transport failures (the backend was
/// unreachable), so callers and tests can tell the two apart.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with a non-OK status.
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status the backend returned.
        status: StatusCode,
        /// Response body, relayed for diagnostics.
        body: String,
    },

    /// The backend could not be reached or the request failed in transit.
    #[error("failed to connect to backend: {0}")]
    Connect(#[from] reqwest::Error),

    /// The backend answered OK but the body was not the expected shape.
    #[error("invalid backend response: {0}")]
    Decode(#[from] serde_json::Error),
}
