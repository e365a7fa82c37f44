use reqwest::StatusCode;
use thiserror::Error;

/// Failures raised by provider calls during a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The token endpoint rejected the refresh or authorization code.
    /// Fatal for the current pass.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// The provider answered 429 twice in a row.
    #[error("rate limited, provider asked to retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Network failure or undecodable response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any other non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Failures while reading settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
}
