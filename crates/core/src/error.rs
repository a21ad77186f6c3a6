//! Error types for the core crate.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid wallet address format.
    #[error("Invalid wallet address format: {0}")]
    InvalidAddress(String),

    /// Invalid trust score value.
    #[error("Invalid trust score: {0} (must be between 0 and 100)")]
    InvalidScore(u32),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;
