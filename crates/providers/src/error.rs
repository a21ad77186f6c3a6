//! Error types for provider clients.

use thiserror::Error;

/// Provider client error type.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP status {0}")]
    HttpStatus(u16),

    /// The provider answered 200 but signalled failure in its envelope.
    #[error("provider returned non-success response: {0}")]
    NonSuccess(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// Result type alias for ProviderError.
pub type Result<T> = std::result::Result<T, ProviderError>;
