//! Outfit-level consistency aggregate.
//!
//! Five weighted axes computed over the whole tentative outfit at every beam
//! extension, not just consecutive slots:
//!
//! - season/weather fit — thermal hard-fails plus outerwear water resistance
//! - material harmony — winter fabric mixed with summer fabric
//! - redundancy — repeated danger patterns and duplicate sub-categories
//! - intent alignment — fraction of items in the intent's formality set
//! - environment safety — sandals in rain zero the axis
//!
//! The aggregate damps beam-edge scores and, under rain, gates paths
//! outright below the prune threshold.

use serde::Serialize;

use crate::config::ConsistencyConfig;
use crate::ontology::{Category, Outfit, StyleIntent};
use crate::scoring::bias::preferred_formalities;
use crate::weather::WeatherSnapshot;

/// Items that overheat the wearer above the engine's hot ban temperature.
const HOT_BANS: [&str; 7] =
    ["puffer", "shearling", "heavy wool", "thermal", "glove", "scarf", "beanie"];
/// Items that freeze the wearer below the cold ban temperature.
const COLD_BANS: [&str; 6] = ["linen", "shorts", "sandal", "tank", "flip flop", "slide"];
/// Sub-category keywords never wanted twice in one outfit (double denim,
/// flannel on flannel).
const DANGER_PATTERNS: [&str; 7] =
    ["flannel", "denim", "leather", "corduroy", "linen", "plaid", "stripe"];

/// Water resistance of outerwear sub-categories, keyed by keyword.
/// Unlisted outerwear defaults to 0.5 under rain.
const WATER_RESISTANCE: [(&str, f32); 17] = [
    ("rain jacket", 1.0),
    ("trench", 1.0),
    ("parka", 1.0),
    ("shell", 1.0),
    ("waxed", 0.9),
    ("puffer", 0.9),
    ("field jacket", 0.9),
    ("leather jacket", 0.6),
    ("pea coat", 0.5),
    ("peacoat", 0.5),
    ("overcoat", 0.5),
    ("bomber", 0.5),
    ("blazer", 0.2),
    ("hoodie", 0.2),
    ("denim jacket", 0.1),
    ("fleece", 0.1),
    ("cardigan", 0.0),
];

/// Per-axis scores behind the aggregate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsistencyBreakdown {
    /// Season/weather fit axis.
    pub season: f32,
    /// Material harmony axis.
    pub material: f32,
    /// Redundancy axis.
    pub redundancy: f32,
    /// Intent alignment axis.
    pub intent: f32,
    /// Environment safety axis.
    pub environment: f32,
}

/// Consistency aggregate for one outfit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsistencyReport {
    /// Weighted blend of the five axes, in [0, 1].
    pub score: f32,
    /// Individual axis values.
    pub breakdown: ConsistencyBreakdown,
}

/// Score a tentative outfit against intent and weather.
#[must_use]
pub fn compute_outfit_consistency(
    outfit: &Outfit,
    intent: StyleIntent,
    weather: &WeatherSnapshot,
    config: &ConsistencyConfig,
) -> ConsistencyReport {
    let breakdown = ConsistencyBreakdown {
        season: season_consistency(outfit, weather, config),
        material: material_harmony(outfit),
        redundancy: redundancy(outfit),
        intent: intent_alignment(outfit, intent),
        environment: environment_safety(outfit, weather),
    };
    let score = breakdown.season * config.weight_season
        + breakdown.material * config.weight_material
        + breakdown.redundancy * config.weight_redundancy
        + breakdown.intent * config.weight_intent
        + breakdown.environment * config.weight_environment;
    ConsistencyReport { score, breakdown }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

fn season_consistency(outfit: &Outfit, weather: &WeatherSnapshot, config: &ConsistencyConfig) -> f32 {
    let raining = weather.condition.is_precipitating();
    let mut scores: Vec<f32> = Vec::new();

    for item in outfit.items() {
        let sub = item.sub_lower();

        // Thermal hard fails zero the whole axis.
        if weather.temperature_c > config.hot_ban_temp_c
            && HOT_BANS.iter().any(|b| sub.contains(b))
        {
            return 0.0;
        }
        if weather.temperature_c < config.cold_ban_temp_c
            && COLD_BANS.iter().any(|b| sub.contains(b))
        {
            return 0.0;
        }

        if raining {
            if sub.contains("sandal") || sub.contains("slide") || sub.contains("flip flop") {
                return 0.2;
            }
            if item.category == Category::Outerwear {
                scores.push(water_resistance(&sub));
            }
        }

        scores.push(1.0);
    }

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f32>() / scores.len() as f32
    }
}

fn water_resistance(sub: &str) -> f32 {
    WATER_RESISTANCE
        .iter()
        .find(|(key, _)| sub.contains(key))
        .map_or(0.5, |&(_, score)| score)
}

fn material_harmony(outfit: &Outfit) -> f32 {
    const WINTER: [&str; 3] = ["wool", "leather", "fleece"];
    const SUMMER: [&str; 2] = ["linen", "cotton"];

    let materials: Vec<String> = outfit.items().map(|i| i.attributes.material_lower()).collect();
    let has_winter = materials.iter().any(|m| WINTER.iter().any(|w| m.contains(w)));
    let has_summer = materials.iter().any(|m| SUMMER.iter().any(|s| m.contains(s)));
    if has_winter && has_summer { 0.4 } else { 1.0 }
}

fn redundancy(outfit: &Outfit) -> f32 {
    let mut penalty = 0.0_f32;
    let mut seen_patterns: Vec<&str> = Vec::new();

    for item in outfit.items() {
        let sub = item.sub_lower();
        for pattern in DANGER_PATTERNS {
            if sub.contains(pattern) {
                if seen_patterns.contains(&pattern) {
                    penalty += 0.4;
                }
                seen_patterns.push(pattern);
            }
        }
    }

    let subs: Vec<String> = outfit.items().map(|i| i.sub_lower()).collect();
    let mut unique = subs.clone();
    unique.sort();
    unique.dedup();
    if unique.len() != subs.len() {
        penalty += 0.2;
    }

    (1.0 - penalty).max(0.0)
}

fn intent_alignment(outfit: &Outfit, intent: StyleIntent) -> f32 {
    if outfit.is_empty() {
        return 0.0;
    }
    let allowed = preferred_formalities(intent);
    let matches = outfit
        .items()
        .filter(|i| i.attributes.formality.is_some_and(|f| allowed.contains(&f)))
        .count();
    matches as f32 / outfit.len() as f32
}

fn environment_safety(outfit: &Outfit, weather: &WeatherSnapshot) -> f32 {
    if weather.condition == crate::weather::WeatherCondition::Rainy
        && outfit.items().any(|i| i.sub_lower().contains("sandal"))
    {
        return 0.0;
    }
    1.0
}
