//! # Drobe Core
//!
//! Neuro-symbolic outfit planning over a digitized wardrobe.
//!
//! Given a free-text query ("casual office meeting") and a weather snapshot,
//! the planner assembles one item per clothing slot by blending a learned
//! embedding space with hand-written style rules:
//!
//! - **Store** — in-memory wardrobe index with cosine similarity search
//! - **Scoring engines** — weather safety, formality/color bias, pairwise
//!   compatibility, outfit-level consistency
//! - **Personalization** — like/dislike history as pair nudges and hard
//!   blocks
//! - **Beam search** — bounded slot-by-slot assembly over an outfit template
//! - **Confidence** — independent seven-axis post-hoc scoring with notes
//! - **Shopping advisor** — at most one upgrade suggestion from a catalog
//!
//! The external encoder (FashionCLIP family, see `drobe-encoder`) is a soft
//! dependency: when it is unavailable, planning degrades to a rule-based
//! fallback rather than failing.
//!
//! ## Concurrency Contract
//!
//! A store snapshot is immutable; concurrent planning requests over it need
//! no locking. Refreshing the wardrobe means building a new store and
//! swapping it in. The per-user feedback cache is compute-once and safe to
//! share.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod confidence;
pub mod config;
pub mod encoder;
pub mod error;
pub mod feedback;
pub mod ontology;
pub mod planner;
pub mod scoring;
pub mod shopping;
pub mod store;
pub mod types;
pub mod weather;

pub use config::PlannerConfig;
pub use error::{DrobeError, Result};
pub use ontology::{Category, Outfit, OutfitTemplate, StyleIntent, WardrobeItem};
pub use planner::{OutfitPlanner, PlanOutcome, PlanRequest, PlannerRng};
pub use store::{SharedStore, WardrobeStore};
pub use types::*;
