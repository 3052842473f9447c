//! Text encoder abstraction.
//!
//! The planner converts free-text queries ("casual office meeting") into
//! vectors comparable against item embeddings. The production encoder is a
//! FashionCLIP-family service reached over HTTP (see the `drobe-encoder`
//! crate); this trait captures it as an injectable seam so tests run with a
//! deterministic stand-in and the planner never reaches into ambient globals.

use crate::error::{DrobeError, Result};
use crate::types::Embedding;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Convert text into embeddings from the same space as stored item vectors.
///
/// Implementations must be `Send + Sync`. A failing encoder is a soft
/// failure: callers fall back to the rule-based planner.
pub trait TextEncoder: Send + Sync {
    /// Encode a batch of strings into one vector each.
    ///
    /// # Errors
    ///
    /// Returns [`DrobeError::Encoder`] when the underlying model call fails.
    fn encode_text(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Encode a single string.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch call fails or yields no vector.
    fn encode_one(&self, text: &str) -> Result<Embedding> {
        self.encode_text(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| DrobeError::Encoder("encoder returned no vectors".into()))
    }

    /// Dimensionality of produced embeddings — must match the store's.
    fn dimensions(&self) -> usize;

    /// Human-readable model name.
    fn model_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Stub provider (wiring tests)
// ---------------------------------------------------------------------------

/// Returns zero-vectors. Useful for tests that only exercise wiring, and for
/// forcing the rule-based fallback path (zero vectors score 0 everywhere).
pub struct StubTextEncoder {
    dims: usize,
}

impl StubTextEncoder {
    /// Create a stub with the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self { dims: dimensions }
    }
}

impl Default for StubTextEncoder {
    fn default() -> Self {
        Self::new(512)
    }
}

impl TextEncoder for StubTextEncoder {
    fn encode_text(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|_| Embedding(vec![0.0; self.dims])).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "stub-zero-vector"
    }
}

// ---------------------------------------------------------------------------
// Hashed token encoder (deterministic test provider)
// ---------------------------------------------------------------------------

/// Deterministic bag-of-tokens encoder: each lowercase token hashes to a
/// bucket, the bucket histogram is L2-normalized.
///
/// Identical strings always produce identical vectors, and strings sharing
/// tokens land close in cosine space — enough structure for integration
/// tests to exercise real retrieval behavior without a model.
pub struct HashedTextEncoder {
    dims: usize,
}

impl HashedTextEncoder {
    /// Create a hashed encoder with the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self { dims: dimensions }
    }

    fn bucket(&self, token: &str) -> usize {
        // FNV-1a, stable across platforms and runs.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in token.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        (hash % self.dims as u64) as usize
    }
}

impl Default for HashedTextEncoder {
    fn default() -> Self {
        Self::new(512)
    }
}

impl TextEncoder for HashedTextEncoder {
    fn encode_text(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let mut raw = vec![0.0_f32; self.dims];
            for token in text.to_lowercase().split_whitespace() {
                let token = token.trim_matches(|c: char| !c.is_alphanumeric());
                if token.is_empty() {
                    continue;
                }
                raw[self.bucket(token)] += 1.0;
            }
            let mag: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
            if mag > f32::EPSILON {
                for x in &mut raw {
                    *x /= mag;
                }
            }
            out.push(Embedding(raw));
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "hashed-bag-of-tokens"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_returns_zeros() {
        let enc = StubTextEncoder::new(4);
        let emb = enc.encode_one("hello").expect("encode");
        assert_eq!(emb.0.len(), 4);
        assert!(emb.0.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn hashed_encoder_is_deterministic() {
        let enc = HashedTextEncoder::new(64);
        let a = enc.encode_one("smart casual dinner").expect("encode");
        let b = enc.encode_one("smart casual dinner").expect("encode");
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn hashed_encoder_returns_unit_vectors() {
        let enc = HashedTextEncoder::new(64);
        let emb = enc.encode_one("navy oxford shirt").expect("encode");
        let mag: f32 = emb.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((mag - 1.0).abs() < 0.01, "expected unit vector, got magnitude {mag}");
    }

    #[test]
    fn shared_tokens_raise_similarity() {
        let enc = HashedTextEncoder::new(128);
        let query = enc.encode_one("casual summer outfit").expect("encode");
        let near = enc.encode_one("casual summer dress").expect("encode");
        let far = enc.encode_one("formal winter tuxedo").expect("encode");
        assert!(query.cosine_similarity(&near) > query.cosine_similarity(&far));
    }

    #[test]
    fn batch_preserves_order() {
        let enc = HashedTextEncoder::new(32);
        let batch = enc.encode_text(&["one", "two"]).expect("encode");
        let single = enc.encode_one("two").expect("encode");
        assert_eq!(batch[1].0, single.0);
    }
}
