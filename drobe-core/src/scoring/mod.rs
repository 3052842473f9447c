//! Symbolic scoring engines.
//!
//! Each engine is an independent, composable rule set over item attributes:
//!
//! - [`safety`] — the hard weather/material gate applied during retrieval.
//! - [`bias`] — intent-driven formality/color multipliers and scenario
//!   keyword rules for hybrid re-ranking.
//! - [`pairwise`] — item-to-item compatibility, evaluated per beam edge.
//! - [`consistency`] — outfit-level season/material/redundancy/intent/
//!   environment aggregate.
//! - [`color`] — shared color grouping predicates.
//!
//! All predicates operate on lowercased strings; the tagging vocabulary is
//! open-ended, so matching is substring-based rather than enum-exhaustive.

pub mod bias;
pub mod color;
pub mod consistency;
pub mod pairwise;
pub mod safety;
