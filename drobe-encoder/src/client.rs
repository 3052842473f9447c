//! Embedding client — unified interface for a FashionCLIP service or an
//! OpenAI-compatible embeddings API.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::EncoderError;
use crate::types::{EmbedRequest, EmbedResponse};

/// Backend for text embedding.
#[derive(Debug, Clone)]
pub enum EncoderProvider {
    /// Self-hosted FashionCLIP embedding service (recommended).
    Service {
        /// Base URL of the service, e.g. `http://localhost:8300`.
        base_url: String,
    },
    /// OpenAI-compatible embeddings API.
    OpenAiCompatible {
        /// Base URL of the API.
        base_url: String,
        /// Bearer token.
        api_key: String,
    },
    /// No encoder available — all calls return an error, triggering the
    /// rule-based planning fallback.
    None,
}

/// The embedding client that routes requests to the configured backend.
pub struct ClipClient {
    provider: EncoderProvider,
    http: Client,
    model: String,
    dimensions: usize,
    max_retries: u32,
}

impl ClipClient {
    /// Create a new embedding client.
    #[must_use]
    pub fn new(
        provider: EncoderProvider,
        model: impl Into<String>,
        dimensions: usize,
        max_retries: u32,
    ) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            dimensions,
            max_retries,
        }
    }

    /// Create a client with no backend (all calls fail → rule-based fallback).
    #[must_use]
    pub fn none() -> Self {
        Self {
            provider: EncoderProvider::None,
            http: Client::new(),
            model: String::new(),
            dimensions: 0,
            max_retries: 0,
        }
    }

    /// The configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The expected vector width.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Whether a backend is configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, EncoderProvider::None)
    }

    /// Encode a batch of texts.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no backend is configured, all retries fail, or the
    /// backend returns vectors of the wrong width. The caller should fall
    /// back to rule-based planning on error.
    pub async fn embed(&self, request: &EmbedRequest) -> Result<EmbedResponse, EncoderError> {
        match &self.provider {
            EncoderProvider::None => {
                Err(EncoderError::Unavailable("no encoder backend configured".into()))
            }
            EncoderProvider::Service { base_url } => self.embed_service(base_url, request).await,
            EncoderProvider::OpenAiCompatible { base_url, api_key } => {
                self.embed_openai(base_url, api_key, request).await
            }
        }
    }

    /// Encode via the dedicated embedding service.
    async fn embed_service(
        &self,
        base_url: &str,
        request: &EmbedRequest,
    ) -> Result<EmbedResponse, EncoderError> {
        let url = format!("{base_url}/embed");
        let body = json!({
            "model": self.model,
            "texts": request.texts,
        });

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    "retrying embedding call (attempt {}/{})",
                    attempt + 1,
                    self.max_retries + 1
                );
            }

            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;

            let latency_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let json: serde_json::Value = resp
                            .json()
                            .await
                            .map_err(|e| EncoderError::ParseError(e.to_string()))?;

                        let vectors = Self::parse_vector_array(&json["embeddings"])?;
                        self.check_dimensions(&vectors)?;

                        return Ok(EmbedResponse {
                            vectors,
                            latency_ms,
                            model: self.model.clone(),
                        });
                    }
                    last_error = format!(
                        "HTTP {}: {}",
                        resp.status(),
                        resp.text().await.unwrap_or_default()
                    );
                    warn!("embedding service returned error: {}", last_error);
                }
                Err(e) => {
                    // A refused connection will not heal within the retry
                    // window; surface it so the caller can fall back now.
                    if e.is_connect() {
                        warn!("embedding service unreachable: {e}");
                        return Err(e.into());
                    }
                    last_error = e.to_string();
                    if e.is_timeout() {
                        warn!("embedding request timed out after {}ms", request.timeout_ms);
                    } else {
                        warn!("embedding request failed: {}", last_error);
                    }
                }
            }
        }

        Err(EncoderError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }

    /// Encode via an OpenAI-compatible `/v1/embeddings` endpoint.
    async fn embed_openai(
        &self,
        base_url: &str,
        api_key: &str,
        request: &EmbedRequest,
    ) -> Result<EmbedResponse, EncoderError> {
        let url = format!("{base_url}/v1/embeddings");
        let body = json!({
            "model": self.model,
            "input": request.texts,
        });

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    "retrying embeddings API call (attempt {}/{})",
                    attempt + 1,
                    self.max_retries + 1
                );
            }

            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .header("Authorization", format!("Bearer {api_key}"))
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;

            let latency_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let json: serde_json::Value = resp
                            .json()
                            .await
                            .map_err(|e| EncoderError::ParseError(e.to_string()))?;

                        let data = json["data"].as_array().ok_or_else(|| {
                            EncoderError::ParseError("missing 'data' array".into())
                        })?;
                        let mut vectors = Vec::with_capacity(data.len());
                        for entry in data {
                            vectors.push(Self::parse_vector(&entry["embedding"])?);
                        }
                        self.check_dimensions(&vectors)?;

                        return Ok(EmbedResponse {
                            vectors,
                            latency_ms,
                            model: self.model.clone(),
                        });
                    }
                    last_error = format!("HTTP {}", resp.status());
                    warn!("embeddings API returned error: {}", last_error);
                }
                Err(e) => {
                    if e.is_connect() {
                        warn!("embeddings API unreachable: {e}");
                        return Err(e.into());
                    }
                    last_error = e.to_string();
                    warn!("embeddings API request failed: {}", last_error);
                }
            }
        }

        Err(EncoderError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }

    fn parse_vector_array(value: &serde_json::Value) -> Result<Vec<Vec<f32>>, EncoderError> {
        let outer = value
            .as_array()
            .ok_or_else(|| EncoderError::ParseError("missing 'embeddings' array".into()))?;
        outer.iter().map(Self::parse_vector).collect()
    }

    fn parse_vector(value: &serde_json::Value) -> Result<Vec<f32>, EncoderError> {
        value
            .as_array()
            .ok_or_else(|| EncoderError::ParseError("embedding entry is not an array".into()))?
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| EncoderError::ParseError("non-numeric embedding value".into()))
            })
            .collect()
    }

    fn check_dimensions(&self, vectors: &[Vec<f32>]) -> Result<(), EncoderError> {
        for vector in vectors {
            if vector.len() != self.dimensions {
                return Err(EncoderError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: vector.len(),
                });
            }
        }
        Ok(())
    }
}
