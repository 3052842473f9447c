//! Configuration for the outfit planner.
//!
//! Every threshold the source history shows being actively tuned (bias
//! multipliers, temperature cutoffs, beam blend weights, the visual-harmony
//! sigmoid, shopping bias) is a named field here with the current best-known
//! value as its serde default, loadable from `drobe.toml`.

use serde::{Deserialize, Serialize};

use crate::ontology::{Category, StyleIntent};

/// Top-level planner configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    /// Candidate retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Re-ranking bias multipliers.
    #[serde(default)]
    pub bias: BiasConfig,
    /// Hard weather-safety gate cutoffs.
    #[serde(default)]
    pub safety: SafetyConfig,
    /// Outfit-level consistency engine settings.
    #[serde(default)]
    pub consistency: ConsistencyConfig,
    /// Beam search settings.
    #[serde(default)]
    pub beam: BeamConfig,
    /// Confidence scoring settings.
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    /// Shopping advisor settings.
    #[serde(default)]
    pub shopping: ShoppingConfig,
}

impl PlannerConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `DrobeError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::DrobeError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Candidate retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Top-K for formal intents — tighter, to concentrate on few
    /// high-confidence options.
    #[serde(default = "default_8")]
    pub top_k_formal: usize,
    /// Top-K default for everything in between.
    #[serde(default = "default_12")]
    pub top_k_default: usize,
    /// Top-K for casual/street intents — looser, to preserve diversity.
    #[serde(default = "default_20")]
    pub top_k_relaxed: usize,
    /// Jitter amplitude (±fraction) applied to re-ranked scores. An
    /// anti-monotony device, not search noise; set to 0.0 for fully
    /// deterministic planning.
    #[serde(default = "default_0_15")]
    pub jitter_amplitude: f32,
    /// Flat additive boost when a candidate's sub-category literally appears
    /// in the query — explicit user request wins over scenario penalties.
    #[serde(default = "default_0_3")]
    pub keyword_boost: f32,
    /// Multiplier for items favored by a near-exclusionary scenario
    /// (athletic).
    #[serde(default = "default_1_5")]
    pub scenario_strong_boost: f32,
    /// Multiplier for items penalized by a near-exclusionary scenario.
    #[serde(default = "default_0_2")]
    pub scenario_strong_penalty: f32,
    /// Multiplier for items favored by a soft scenario (office, date).
    #[serde(default = "default_1_2")]
    pub scenario_soft_boost: f32,
    /// Multiplier for items penalized by a soft scenario.
    #[serde(default = "default_0_7")]
    pub scenario_soft_penalty: f32,
}

impl RetrievalConfig {
    /// Per-intent candidate count.
    #[must_use]
    pub fn top_k_for(&self, intent: StyleIntent) -> usize {
        match intent {
            StyleIntent::FormalEvent => self.top_k_formal,
            StyleIntent::CasualDay | StyleIntent::Street => self.top_k_relaxed,
            _ => self.top_k_default,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k_formal: 8,
            top_k_default: 12,
            top_k_relaxed: 20,
            jitter_amplitude: 0.15,
            keyword_boost: 0.3,
            scenario_strong_boost: 1.5,
            scenario_strong_penalty: 0.2,
            scenario_soft_boost: 1.2,
            scenario_soft_penalty: 0.7,
        }
    }
}

/// Re-ranking bias multipliers (gentle nudges, applied multiplicatively to
/// the raw similarity score).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasConfig {
    /// Item formality in the intent's preferred set.
    #[serde(default = "default_1_08")]
    pub formality_preferred: f32,
    /// Item formality outside the preferred set.
    #[serde(default = "default_0_96")]
    pub formality_other: f32,
    /// Primary color in the intent's preferred palette.
    #[serde(default = "default_1_05")]
    pub color_preferred: f32,
    /// Primary color outside the palette — weaker than the formality nudge.
    #[serde(default = "default_0_98")]
    pub color_other: f32,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            formality_preferred: 1.08,
            formality_other: 0.96,
            color_preferred: 1.05,
            color_other: 0.98,
        }
    }
}

/// Hard weather-safety gate cutoffs (retrieval-time filter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Above this temperature, heavy winter items are rejected (overheating).
    #[serde(default = "default_15_0")]
    pub hot_cutoff_c: f32,
    /// Below this temperature, exposed-skin summer items are rejected.
    #[serde(default = "default_10_0")]
    pub cold_cutoff_c: f32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self { hot_cutoff_c: 15.0, cold_cutoff_c: 10.0 }
    }
}

/// Outfit-level consistency engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    /// Hard-fail temperature for banned hot-weather items (engine-level,
    /// intentionally looser than the retrieval gate).
    #[serde(default = "default_18_0")]
    pub hot_ban_temp_c: f32,
    /// Hard-fail temperature for banned cold-weather items.
    #[serde(default = "default_10_0")]
    pub cold_ban_temp_c: f32,
    /// Under rain, beam paths below this consistency are pruned outright.
    #[serde(default = "default_0_75")]
    pub rain_prune_threshold: f32,
    /// Weight of the season/weather axis.
    #[serde(default = "default_0_25")]
    pub weight_season: f32,
    /// Weight of the material harmony axis.
    #[serde(default = "default_0_20")]
    pub weight_material: f32,
    /// Weight of the redundancy axis.
    #[serde(default = "default_0_20")]
    pub weight_redundancy: f32,
    /// Weight of the intent alignment axis.
    #[serde(default = "default_0_20")]
    pub weight_intent: f32,
    /// Weight of the environment safety axis.
    #[serde(default = "default_0_15")]
    pub weight_environment: f32,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            hot_ban_temp_c: 18.0,
            cold_ban_temp_c: 10.0,
            rain_prune_threshold: 0.75,
            weight_season: 0.25,
            weight_material: 0.20,
            weight_redundancy: 0.20,
            weight_intent: 0.20,
            weight_environment: 0.15,
        }
    }
}

/// Beam search settings — the edge-score blend and pruning bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Max partial-outfit hypotheses retained between slots.
    #[serde(default = "default_5")]
    pub beam_width: usize,
    /// Weight of the path's running score in the edge blend.
    #[serde(default = "default_0_38")]
    pub weight_path: f32,
    /// Weight of the slot-weighted retrieval score.
    #[serde(default = "default_0_25")]
    pub weight_retrieval: f32,
    /// Weight of the pairwise compatibility score.
    #[serde(default = "default_0_25")]
    pub weight_pairwise: f32,
    /// Soft penalty subtracted from compatibility when the candidate repeats
    /// a sub-category already in the path.
    #[serde(default = "default_0_20")]
    pub duplicate_sub_penalty: f32,
    /// Constant part of the consistency damping factor.
    #[serde(default = "default_0_6")]
    pub damping_base: f32,
    /// Consistency-proportional part of the damping factor.
    #[serde(default = "default_0_4")]
    pub damping_span: f32,
    /// Weight of the search score when selecting among beam finalists.
    #[serde(default = "default_0_7")]
    pub final_search_weight: f32,
    /// Weight of the full confidence score when selecting among finalists.
    #[serde(default = "default_0_3")]
    pub final_confidence_weight: f32,
    /// Retrieval-score weight for accessory slots (structural slots count
    /// full weight).
    #[serde(default = "default_0_6")]
    pub accessory_slot_weight: f32,
}

impl BeamConfig {
    /// Slot importance weight: Top/Footwear/Outerwear matter more than an
    /// accessory pick.
    #[must_use]
    pub fn slot_weight(&self, category: Category) -> f32 {
        match category {
            Category::Accessory => self.accessory_slot_weight,
            _ => 1.0,
        }
    }
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam_width: 5,
            weight_path: 0.38,
            weight_retrieval: 0.25,
            weight_pairwise: 0.25,
            duplicate_sub_penalty: 0.20,
            damping_base: 0.6,
            damping_span: 0.4,
            final_search_weight: 0.7,
            final_confidence_weight: 0.3,
            accessory_slot_weight: 0.6,
        }
    }
}

/// Confidence axis weights and scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Silhouette proportion axis weight.
    #[serde(default = "default_0_25")]
    pub weight_silhouette: f32,
    /// Layering presence axis weight.
    #[serde(default = "default_0_15")]
    pub weight_layering: f32,
    /// Visual harmony axis weight.
    #[serde(default = "default_0_20")]
    pub weight_visual: f32,
    /// Color harmony axis weight.
    #[serde(default = "default_0_15")]
    pub weight_color: f32,
    /// Formality uniformity axis weight.
    #[serde(default = "default_0_10")]
    pub weight_formality: f32,
    /// Weather safety axis weight.
    #[serde(default = "default_0_05")]
    pub weight_weather: f32,
    /// Versatility axis weight.
    #[serde(default = "default_0_10")]
    pub weight_versatility: f32,
    /// Sigmoid-rescale visual harmony so the typically narrow raw cosine
    /// band spreads into a legible 0.5–0.99 range.
    #[serde(default = "default_true")]
    pub sigmoid_rescale: bool,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            weight_silhouette: 0.25,
            weight_layering: 0.15,
            weight_visual: 0.20,
            weight_color: 0.15,
            weight_formality: 0.10,
            weight_weather: 0.05,
            weight_versatility: 0.10,
            sigmoid_rescale: true,
        }
    }
}

/// Shopping advisor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingConfig {
    /// Flat bias subtracted from catalog similarity — owned items win by
    /// default.
    #[serde(default = "default_0_10")]
    pub ownership_bias: f32,
    /// Minimum biased similarity before a purchase is suggested.
    #[serde(default = "default_0_4")]
    pub improvement_threshold: f32,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self { ownership_bias: 0.10, improvement_threshold: 0.4 }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_0_05() -> f32 { 0.05 }
fn default_0_10() -> f32 { 0.10 }
fn default_0_15() -> f32 { 0.15 }
fn default_0_2() -> f32 { 0.2 }
fn default_0_20() -> f32 { 0.20 }
fn default_0_25() -> f32 { 0.25 }
fn default_0_3() -> f32 { 0.3 }
fn default_0_38() -> f32 { 0.38 }
fn default_0_4() -> f32 { 0.4 }
fn default_0_6() -> f32 { 0.6 }
fn default_0_7() -> f32 { 0.7 }
fn default_0_75() -> f32 { 0.75 }
fn default_0_96() -> f32 { 0.96 }
fn default_0_98() -> f32 { 0.98 }
fn default_1_05() -> f32 { 1.05 }
fn default_1_08() -> f32 { 1.08 }
fn default_1_2() -> f32 { 1.2 }
fn default_1_5() -> f32 { 1.5 }
fn default_10_0() -> f32 { 10.0 }
fn default_15_0() -> f32 { 15.0 }
fn default_18_0() -> f32 { 18.0 }
fn default_5() -> usize { 5 }
fn default_8() -> usize { 8 }
fn default_12() -> usize { 12 }
fn default_20() -> usize { 20 }
