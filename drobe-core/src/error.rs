//! Error types for the drobe core library.
//!
//! Infeasibility (no valid outfit for a required slot) is deliberately NOT an
//! error — it is an expected business outcome surfaced as
//! [`PlanOutcome::Infeasible`](crate::planner::PlanOutcome). The variants here
//! cover actual faults: a failing encoder, unreadable configuration, broken
//! item records.

use thiserror::Error;

/// Top-level error type for all drobe operations.
#[derive(Error, Debug)]
pub enum DrobeError {
    /// The text/image encoder call failed.
    ///
    /// The embedding dependency is soft: callers should fall back to the
    /// rule-based planner rather than hard-fail the whole request.
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// An item record is missing required fields or failed to parse.
    ///
    /// During store loads this is logged and the item skipped; it only
    /// propagates from strict single-item operations.
    #[error("Malformed item record {id}: {reason}")]
    MalformedItem {
        /// Identifier (or file name) of the offending record.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, DrobeError>;
