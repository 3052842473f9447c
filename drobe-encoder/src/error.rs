//! Encoder error types.

use thiserror::Error;

/// Errors that can occur while talking to an embedding backend.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// HTTP request failed.
    #[error("embedding request failed: {0}")]
    RequestFailed(String),

    /// Response body was not in the expected shape.
    #[error("failed to parse embedding response: {0}")]
    ParseError(String),

    /// Backend returned vectors of the wrong width.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured vector width.
        expected: usize,
        /// Width the backend actually returned.
        actual: usize,
    },

    /// Request timed out.
    #[error("embedding request timed out after {0}ms")]
    Timeout(u64),

    /// No backend is configured or reachable.
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    /// All retry attempts exhausted.
    #[error("all embedding retry attempts exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        last_error: String,
    },

    /// Configuration error.
    #[error("encoder configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for EncoderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EncoderError::Timeout(0)
        } else if err.is_connect() {
            EncoderError::Unavailable(err.to_string())
        } else {
            EncoderError::RequestFailed(err.to_string())
        }
    }
}
