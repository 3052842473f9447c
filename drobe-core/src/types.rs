//! Core type definitions shared across the planner.
//!
//! Identity newtypes, the embedding vector, and the transient retrieval
//! candidate. The clothing ontology itself lives in [`crate::ontology`].

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Stable identifier for a wardrobe (or catalog) item.
///
/// Ids are minted by the external tagging pipeline and treated as opaque
/// strings here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Wrap a raw id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier for a user whose wardrobe and feedback we are planning against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Embedding Vector
// ---------------------------------------------------------------------------

/// A dense vector embedding for semantic similarity search.
///
/// Produced by an external joint image/text encoder (FashionCLIP family,
/// typically 512 dimensions). Comparable via cosine similarity to query
/// vectors from the same encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    /// Cosine similarity between two embeddings.
    ///
    /// Returns 0.0 if the vectors have mismatched dimensions or either has
    /// zero magnitude — degenerate inputs never panic.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.0.len() != other.0.len() || self.0.is_empty() {
            return 0.0;
        }
        let (mut dot, mut norm_a, mut norm_b) = (0.0_f32, 0.0_f32, 0.0_f32);
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }
        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom < f32::EPSILON {
            0.0
        } else {
            dot / denom
        }
    }

    /// Dimensionality of the embedding.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Element-wise mean of a set of embeddings (the outfit centroid).
    ///
    /// Returns `None` when the input is empty or dimensions disagree.
    #[must_use]
    pub fn centroid(embeddings: &[&Embedding]) -> Option<Embedding> {
        let first = embeddings.first()?;
        let dims = first.dimensions();
        if embeddings.iter().any(|e| e.dimensions() != dims) {
            return None;
        }
        let mut sum = vec![0.0_f32; dims];
        for emb in embeddings {
            for (acc, x) in sum.iter_mut().zip(emb.0.iter()) {
                *acc += x;
            }
        }
        let n = embeddings.len() as f32;
        for acc in &mut sum {
            *acc /= n;
        }
        Some(Embedding(sum))
    }
}

// ---------------------------------------------------------------------------
// Retrieval Candidate
// ---------------------------------------------------------------------------

/// A transient (item, score) pair produced by retrieval.
///
/// The raw score is cosine similarity in \[-1, 1\]; hybrid re-ranking then
/// rescales it with multiplicative biases, so re-ranked scores can exceed
/// 1.0. Scores are relative, not probabilistic.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The matched item.
    pub item_id: ItemId,
    /// Similarity (raw) or re-ranked retrieval score.
    pub score: f32,
}

/// Total-order sort key over f32 scores. Wrap in [`std::cmp::Reverse`] for
/// descending sorts; stable sorts then break ties by insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScoreKey(pub OrderedFloat<f32>);

impl ScoreKey {
    /// Create a score key from a raw f32.
    #[must_use]
    pub fn new(score: f32) -> Self {
        Self(OrderedFloat(score))
    }
}
