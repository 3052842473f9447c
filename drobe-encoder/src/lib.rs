//! # drobe-encoder — Embedding Client for Drobe
//!
//! Provides a unified interface for text embedding across backends:
//!   - **FashionCLIP service** (self-hosted, recommended default)
//!   - **OpenAI-compatible embeddings API**
//!
//! All encoder calls in Drobe go through this crate, ensuring:
//!   - Timeout management
//!   - Retry with bounded attempts
//!   - Vector-width validation against the wardrobe store
//!   - Graceful degradation — an unreachable backend is an `Err`, and the
//!     planner falls back to rule-based assembly instead of failing
//!
//! The [`BlockingClipEncoder`] bridge adapts the async client to the
//! synchronous [`TextEncoder`](drobe_core::encoder::TextEncoder) seam that
//! `drobe-core` plans against.

pub mod bridge;
pub mod client;
pub mod error;
pub mod types;

pub use bridge::BlockingClipEncoder;
pub use client::{ClipClient, EncoderProvider};
pub use error::EncoderError;
pub use types::{EmbedRequest, EmbedResponse};
