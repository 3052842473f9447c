//! Blocking bridge into the planner.
//!
//! `drobe-core` is synchronous by design; the HTTP client is async. This
//! adapter owns a small current-thread runtime and exposes the client
//! through the planner's [`TextEncoder`] seam. Any backend error surfaces
//! as [`DrobeError::Encoder`], which the planner treats as a soft failure.

use drobe_core::encoder::TextEncoder;
use drobe_core::types::Embedding;
use drobe_core::{DrobeError, Result};
use tokio::runtime::Runtime;

use crate::client::ClipClient;
use crate::error::EncoderError;
use crate::types::EmbedRequest;

/// Synchronous [`TextEncoder`] backed by a [`ClipClient`].
pub struct BlockingClipEncoder {
    client: ClipClient,
    runtime: Runtime,
    timeout_ms: u64,
}

impl BlockingClipEncoder {
    /// Wrap a client in a blocking adapter.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::ConfigError`] if the runtime cannot be built.
    pub fn new(client: ClipClient, timeout_ms: u64) -> std::result::Result<Self, EncoderError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EncoderError::ConfigError(e.to_string()))?;
        Ok(Self { client, runtime, timeout_ms })
    }
}

impl TextEncoder for BlockingClipEncoder {
    fn encode_text(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let request = EmbedRequest::batch(texts.iter().copied()).with_timeout(self.timeout_ms);
        let response = self
            .runtime
            .block_on(self.client.embed(&request))
            .map_err(|e| DrobeError::Encoder(e.to_string()))?;
        if response.vectors.len() != texts.len() {
            return Err(DrobeError::Encoder(format!(
                "backend returned {} vectors for {} texts",
                response.vectors.len(),
                texts.len()
            )));
        }
        Ok(response.vectors.into_iter().map(Embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.client.dimensions()
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}
