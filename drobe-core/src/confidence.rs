//! Post-hoc confidence scoring and explanation.
//!
//! Computed once on the finally-chosen outfit, independent of the search
//! score: seven weighted axes aggregated into one user-facing number, plus
//! short natural-language notes for the axes that scored well (at most
//! four shown). The aggregate is clamped to [0, 1] at the boundary since the
//! sigmoid/penalty formulation is not strictly bounded.

use serde::Serialize;

use crate::config::{ConfidenceConfig, SafetyConfig};
use crate::ontology::{Category, LayerRole, Outfit, SilhouetteVolume, StyleIntent};
use crate::scoring::color::{is_cool, is_neutral, is_warm};
use crate::scoring::safety::is_weather_safe;
use crate::types::Embedding;
use crate::weather::WeatherSnapshot;

/// Per-axis confidence values.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfidenceBreakdown {
    /// Top-vs-bottom silhouette proportion.
    pub silhouette: f32,
    /// Layering presence (meaningful for cold-layering intents only).
    pub layering: f32,
    /// Mean embedding similarity to the outfit centroid.
    pub visual: f32,
    /// Neutral-dominance and warm/cool clash rules.
    pub color: f32,
    /// Formality uniformity across items.
    pub formality: f32,
    /// Whether every item passes the weather gate.
    pub weather: f32,
    /// Mean intrinsic pairing bias.
    pub versatility: f32,
}

/// Aggregated confidence plus explanation notes.
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceReport {
    /// Weighted aggregate, clamped to [0, 1].
    pub score: f32,
    /// Per-axis values.
    pub breakdown: ConfidenceBreakdown,
    /// Short justifications for high-scoring axes, at most four.
    pub notes: Vec<String>,
}

/// Maximum number of explanation notes surfaced to the user.
const MAX_NOTES: usize = 4;

/// Score a finished outfit across all seven axes.
#[must_use]
pub fn compute_confidence(
    outfit: &Outfit,
    intent: StyleIntent,
    weather: &WeatherSnapshot,
    config: &ConfidenceConfig,
    safety: &SafetyConfig,
) -> ConfidenceReport {
    let breakdown = ConfidenceBreakdown {
        silhouette: silhouette_proportion(outfit),
        layering: layering_presence(outfit, intent),
        visual: visual_harmony(outfit, config),
        color: color_harmony(outfit),
        formality: formality_uniformity(outfit),
        weather: weather_safety(outfit, weather, safety),
        versatility: versatility(outfit),
    };

    let raw = breakdown.silhouette * config.weight_silhouette
        + breakdown.layering * config.weight_layering
        + breakdown.visual * config.weight_visual
        + breakdown.color * config.weight_color
        + breakdown.formality * config.weight_formality
        + breakdown.weather * config.weight_weather
        + breakdown.versatility * config.weight_versatility;

    ConfidenceReport {
        score: raw.clamp(0.0, 1.0),
        notes: notes_for(&breakdown, intent),
        breakdown,
    }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Top-vs-bottom volume balance. Wide over wide drowns the frame; volume
/// contrast reads intentional.
fn silhouette_proportion(outfit: &Outfit) -> f32 {
    let top = outfit.get(Category::Top).or_else(|| outfit.get(Category::OnePiece));
    let bottom = outfit.get(Category::Bottom);
    let (Some(top), Some(bottom)) = (top, bottom) else {
        return 0.7;
    };
    match (top.attributes.silhouette_volume, bottom.attributes.silhouette_volume) {
        (SilhouetteVolume::Wide, SilhouetteVolume::Wide) => 0.3,
        (SilhouetteVolume::Wide, SilhouetteVolume::Narrow)
        | (SilhouetteVolume::Narrow, SilhouetteVolume::Wide) => 1.0,
        (SilhouetteVolume::Narrow, SilhouetteVolume::Narrow) => 0.6,
        _ => 0.85,
    }
}

/// Cold-layering outfits want exactly one outer layer. Other intents score
/// neutral — the axis is not meaningful for them.
fn layering_presence(outfit: &Outfit, intent: StyleIntent) -> f32 {
    if intent != StyleIntent::LayeredCold {
        return 1.0;
    }
    let outer_count =
        outfit.items().filter(|i| i.attributes.layer_role == LayerRole::Outer).count();
    match outer_count {
        1 => 1.0,
        0 => 0.4,
        _ => 0.6,
    }
}

/// Mean cosine of each item's embedding to the outfit centroid, optionally
/// sigmoid-rescaled so the typically narrow raw band spreads into a legible
/// 0.5–0.99 range.
fn visual_harmony(outfit: &Outfit, config: &ConfidenceConfig) -> f32 {
    let embeddings: Vec<&Embedding> = outfit.items().filter_map(|i| i.embedding.as_ref()).collect();
    if embeddings.len() < 2 {
        return 0.6;
    }
    let Some(centroid) = Embedding::centroid(&embeddings) else {
        return 0.6;
    };
    let mean: f32 = embeddings.iter().map(|e| centroid.cosine_similarity(e)).sum::<f32>()
        / embeddings.len() as f32;

    if config.sigmoid_rescale {
        0.5 + 0.49 / (1.0 + (-8.0 * (mean - 0.6)).exp())
    } else {
        mean
    }
}

/// Neutral-dominance and warm/cool clash rules.
fn color_harmony(outfit: &Outfit) -> f32 {
    let colors: Vec<&str> =
        outfit.items().map(|i| i.attributes.primary_color.as_str()).filter(|c| !c.is_empty()).collect();
    if colors.is_empty() {
        return 0.6;
    }
    let statements: Vec<&&str> = colors.iter().filter(|c| !is_neutral(c)).collect();
    if statements.is_empty() {
        return 0.9;
    }
    let has_warm = statements.iter().any(|c| is_warm(c));
    let has_cool = statements.iter().any(|c| is_cool(c));
    if has_warm && has_cool {
        return 0.4;
    }
    // Neutrals carrying most of the outfit keep one statement color safe.
    if statements.len() * 2 <= colors.len() {
        0.8
    } else {
        0.6
    }
}

/// 1.0 when every tagged item shares one formality level, else 0.5.
fn formality_uniformity(outfit: &Outfit) -> f32 {
    let mut levels = outfit.items().filter_map(|i| i.attributes.formality);
    let Some(first) = levels.next() else {
        return 0.5;
    };
    if levels.all(|f| f == first) { 1.0 } else { 0.5 }
}

fn weather_safety(outfit: &Outfit, weather: &WeatherSnapshot, safety: &SafetyConfig) -> f32 {
    if outfit.items().all(|i| is_weather_safe(i, weather, safety)) {
        1.0
    } else {
        0.5
    }
}

/// Mean intrinsic pairing bias, raw (roughly \[-0.2, 0.4\]); the output
/// clamp absorbs the odd negative mean.
fn versatility(outfit: &Outfit) -> f32 {
    if outfit.is_empty() {
        return 0.0;
    }
    outfit.items().map(|i| i.attributes.pairing_bias).sum::<f32>() / outfit.len() as f32
}

// ---------------------------------------------------------------------------
// Explanation notes
// ---------------------------------------------------------------------------

fn notes_for(breakdown: &ConfidenceBreakdown, intent: StyleIntent) -> Vec<String> {
    let mut notes = Vec::new();
    if breakdown.silhouette >= 0.8 {
        notes.push("fit feels balanced".to_string());
    }
    if intent == StyleIntent::LayeredCold && breakdown.layering >= 0.99 {
        notes.push("layers stack cleanly".to_string());
    }
    if breakdown.visual >= 0.75 {
        notes.push("pieces share a visual language".to_string());
    }
    if breakdown.color >= 0.75 {
        notes.push("colors sit comfortably together".to_string());
    }
    if breakdown.formality >= 0.99 {
        notes.push("formality is consistent head to toe".to_string());
    }
    if breakdown.weather >= 0.99 {
        notes.push("weather-appropriate throughout".to_string());
    }
    if breakdown.versatility >= 0.2 {
        notes.push("built from versatile staples".to_string());
    }
    notes.truncate(MAX_NOTES);
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Formality, ItemAttributes, WardrobeItem};
    use crate::types::ItemId;
    use crate::weather::WeatherCondition;

    fn item(category: Category, attrs: ItemAttributes) -> WardrobeItem {
        WardrobeItem {
            id: ItemId::from(attrs.sub_category.as_str()),
            category,
            attributes: attrs,
            embedding: None,
            assets: None,
        }
    }

    fn basic_attrs(sub: &str, color: &str) -> ItemAttributes {
        ItemAttributes {
            sub_category: sub.to_string(),
            primary_color: color.to_string(),
            formality: Some(Formality::SmartCasual),
            ..ItemAttributes::default()
        }
    }

    fn clear_weather() -> WeatherSnapshot {
        WeatherSnapshot {
            condition: WeatherCondition::Clear,
            temperature_c: 18.0,
            location: "test".into(),
        }
    }

    fn outfit(items: Vec<WardrobeItem>) -> Outfit {
        items.into_iter().collect()
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let mut bad = basic_attrs("Sandals", "Red");
        bad.pairing_bias = -0.2;
        let o = outfit(vec![item(Category::Footwear, bad)]);
        let report = compute_confidence(
            &o,
            StyleIntent::CasualDay,
            &WeatherSnapshot {
                condition: WeatherCondition::Rainy,
                temperature_c: 5.0,
                location: "test".into(),
            },
            &ConfidenceConfig::default(),
            &SafetyConfig::default(),
        );
        assert!(report.score >= 0.0 && report.score <= 1.0);
    }

    #[test]
    fn wide_over_wide_tanks_silhouette() {
        let mut top = basic_attrs("Oversized Tee", "White");
        top.silhouette_volume = SilhouetteVolume::Wide;
        let mut bottom = basic_attrs("Wide Trousers", "Black");
        bottom.silhouette_volume = SilhouetteVolume::Wide;
        let o = outfit(vec![item(Category::Top, top), item(Category::Bottom, bottom)]);
        assert!((silhouette_proportion(&o) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn volume_contrast_scores_full() {
        let mut top = basic_attrs("Oversized Tee", "White");
        top.silhouette_volume = SilhouetteVolume::Wide;
        let mut bottom = basic_attrs("Slim Jeans", "Black");
        bottom.silhouette_volume = SilhouetteVolume::Narrow;
        let o = outfit(vec![item(Category::Top, top), item(Category::Bottom, bottom)]);
        assert!((silhouette_proportion(&o) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn layering_axis_only_bites_for_cold_intent() {
        let o = outfit(vec![item(Category::Top, basic_attrs("Tee", "White"))]);
        assert!((layering_presence(&o, StyleIntent::CasualDay) - 1.0).abs() < f32::EPSILON);
        assert!((layering_presence(&o, StyleIntent::LayeredCold) - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn exactly_one_outer_layer_satisfies_layering() {
        let mut coat = basic_attrs("Overcoat", "Navy");
        coat.layer_role = LayerRole::Outer;
        let o = outfit(vec![
            item(Category::Top, basic_attrs("Sweater", "Grey")),
            item(Category::Outerwear, coat),
        ]);
        assert!((layering_presence(&o, StyleIntent::LayeredCold) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn all_neutral_colors_score_high() {
        let o = outfit(vec![
            item(Category::Top, basic_attrs("Shirt", "White")),
            item(Category::Bottom, basic_attrs("Chinos", "Navy")),
        ]);
        assert!((color_harmony(&o) - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn warm_cool_clash_scores_low() {
        let o = outfit(vec![
            item(Category::Top, basic_attrs("Shirt", "Red")),
            item(Category::Bottom, basic_attrs("Trousers", "Green")),
        ]);
        assert!((color_harmony(&o) - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn uniform_formality_scores_full() {
        let o = outfit(vec![
            item(Category::Top, basic_attrs("Shirt", "White")),
            item(Category::Bottom, basic_attrs("Chinos", "Navy")),
        ]);
        assert!((formality_uniformity(&o) - 1.0).abs() < f32::EPSILON);
        let mut casual = basic_attrs("Jeans", "Blue");
        casual.formality = Some(Formality::Casual);
        let mixed = outfit(vec![
            item(Category::Top, basic_attrs("Shirt", "White")),
            item(Category::Bottom, casual),
        ]);
        assert!((formality_uniformity(&mixed) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn sigmoid_rescale_spreads_into_upper_band() {
        let mut top = item(Category::Top, basic_attrs("Shirt", "White"));
        top.embedding = Some(Embedding(vec![1.0, 0.1]));
        let mut bottom = item(Category::Bottom, basic_attrs("Chinos", "Navy"));
        bottom.embedding = Some(Embedding(vec![0.9, 0.2]));
        let o = outfit(vec![top, bottom]);
        let rescaled = visual_harmony(&o, &ConfidenceConfig::default());
        let raw = visual_harmony(
            &o,
            &ConfidenceConfig { sigmoid_rescale: false, ..ConfidenceConfig::default() },
        );
        assert!(rescaled > 0.5 && rescaled < 0.99);
        assert!(raw > 0.9, "near-identical vectors should have high raw harmony");
    }

    #[test]
    fn notes_capped_at_four() {
        let breakdown = ConfidenceBreakdown {
            silhouette: 1.0,
            layering: 1.0,
            visual: 0.9,
            color: 0.9,
            formality: 1.0,
            weather: 1.0,
            versatility: 0.3,
        };
        let notes = notes_for(&breakdown, StyleIntent::LayeredCold);
        assert_eq!(notes.len(), MAX_NOTES);
    }

    #[test]
    fn balanced_fit_note_is_threshold_gated() {
        let breakdown = ConfidenceBreakdown {
            silhouette: 0.85,
            layering: 0.0,
            visual: 0.0,
            color: 0.0,
            formality: 0.0,
            weather: 0.0,
            versatility: 0.0,
        };
        let notes = notes_for(&breakdown, StyleIntent::CasualDay);
        assert_eq!(notes, vec!["fit feels balanced".to_string()]);
    }
}
