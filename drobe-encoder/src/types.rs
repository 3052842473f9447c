//! Core types for embedding requests and responses.

use serde::{Deserialize, Serialize};

/// A batch embedding request.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Texts to encode, one vector per entry.
    pub texts: Vec<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl EmbedRequest {
    /// Create a batch request with the default timeout.
    #[must_use]
    pub fn batch<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            timeout_ms: 5000,
        }
    }

    /// Create a single-text request.
    #[must_use]
    pub fn single(text: impl Into<String>) -> Self {
        Self::batch([text.into()])
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A batch embedding response.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    /// One vector per input text, in request order.
    pub vectors: Vec<Vec<f32>>,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model produced the vectors.
    pub model: String,
}
