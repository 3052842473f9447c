//! Intent-driven bias multipliers and scenario keyword rules.
//!
//! These are the "hybrid" half of hybrid re-ranking: the raw cosine score is
//! shifted into \[0, 1\] and then multiplied by gentle formality/color nudges
//! keyed off the active intent, then scenario keywords in the query apply
//! much stronger boosts or penalties. An explicit sub-category mention in the
//! query always adds a flat boost on top, so the user asking for "the leather
//! jacket" beats any scenario penalty.

use crate::config::{BiasConfig, RetrievalConfig};
use crate::ontology::{Formality, StyleIntent, WardrobeItem};

// ---------------------------------------------------------------------------
// Intent preference tables
// ---------------------------------------------------------------------------

/// Formality levels each intent prefers.
#[must_use]
pub fn preferred_formalities(intent: StyleIntent) -> &'static [Formality] {
    match intent {
        StyleIntent::CasualDay | StyleIntent::SmartCasual | StyleIntent::LayeredCold => {
            &[Formality::Casual, Formality::SmartCasual]
        }
        StyleIntent::FormalEvent => &[Formality::Formal, Formality::SmartCasual],
        StyleIntent::Street => &[Formality::Casual],
        StyleIntent::Lounge => &[Formality::Lounge, Formality::Casual],
    }
}

/// Color palette each intent prefers.
#[must_use]
pub fn preferred_palette(intent: StyleIntent) -> &'static [&'static str] {
    match intent {
        StyleIntent::FormalEvent => &["Black", "Navy", "Charcoal", "Grey", "White", "Burgundy"],
        StyleIntent::SmartCasual => &["Navy", "Olive", "Beige", "Brown", "White", "Grey"],
        StyleIntent::CasualDay => &["White", "Blue", "Grey", "Black", "Olive", "Tan"],
        StyleIntent::Street => &["Black", "White", "Red", "Green", "Blue"],
        StyleIntent::Lounge => &["Grey", "Beige", "Cream", "Brown"],
        StyleIntent::LayeredCold => &["Black", "Grey", "Navy", "Brown", "Olive"],
    }
}

/// Formality nudge: preferred set → up, anything else → down, untagged
/// items stay neutral.
#[must_use]
pub fn formality_bias(item: &WardrobeItem, intent: StyleIntent, config: &BiasConfig) -> f32 {
    match item.attributes.formality {
        Some(f) if preferred_formalities(intent).contains(&f) => config.formality_preferred,
        Some(_) => config.formality_other,
        None => 1.0,
    }
}

/// Color-mood nudge, weaker than the formality one.
#[must_use]
pub fn color_mood_bias(item: &WardrobeItem, intent: StyleIntent, config: &BiasConfig) -> f32 {
    let color = &item.attributes.primary_color;
    if color.is_empty() {
        return 1.0;
    }
    if preferred_palette(intent).iter().any(|p| p.eq_ignore_ascii_case(color)) {
        config.color_preferred
    } else {
        config.color_other
    }
}

// ---------------------------------------------------------------------------
// Scenario keyword rules
// ---------------------------------------------------------------------------

/// Query-level scenario detected from keyword cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Gym / run / workout: near-exclusionary toward activewear.
    Athletic,
    /// Office / meeting / interview: soft push toward workwear.
    Office,
    /// Date / dinner out: soft push away from loungewear.
    Date,
}

const ATHLETIC_CUES: [&str; 6] = ["gym", "run", "workout", "jog", "athletic", "exercise"];
const OFFICE_CUES: [&str; 4] = ["office", "meeting", "interview", "work"];
const DATE_CUES: [&str; 2] = ["date", "dinner"];

const ATHLETIC_FAVORED: [&str; 8] =
    ["jogger", "sweat", "hoodie", "sneaker", "trainer", "track", "tee", "legging"];
const OFFICE_FAVORED: [&str; 7] =
    ["shirt", "trouser", "blazer", "loafer", "chino", "oxford", "derby"];
const OFFICE_PENALIZED: [&str; 4] = ["sandal", "short", "graphic", "hoodie"];
const DATE_FAVORED: [&str; 4] = ["shirt", "chino", "boot", "jacket"];
const DATE_PENALIZED: [&str; 2] = ["jogger", "sweat"];

impl Scenario {
    /// Detect a scenario from the (lowercased) query. Athletic cues win over
    /// office cues win over date cues when several appear.
    #[must_use]
    pub fn detect(query: &str) -> Option<Self> {
        let lower = query.to_lowercase();
        if ATHLETIC_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Athletic)
        } else if OFFICE_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Office)
        } else if DATE_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Date)
        } else {
            None
        }
    }

    /// Multiplier this scenario applies to one item.
    ///
    /// Athletic is near-exclusionary: favored sub-categories get the strong
    /// boost, everything else the strong penalty. Office and date only touch
    /// items on their explicit lists.
    #[must_use]
    pub fn multiplier(self, item: &WardrobeItem, config: &RetrievalConfig) -> f32 {
        let sub = item.sub_lower();
        let favored: &[&str] = match self {
            Self::Athletic => &ATHLETIC_FAVORED,
            Self::Office => &OFFICE_FAVORED,
            Self::Date => &DATE_FAVORED,
        };
        if favored.iter().any(|f| sub.contains(f)) {
            return match self {
                Self::Athletic => config.scenario_strong_boost,
                Self::Office | Self::Date => config.scenario_soft_boost,
            };
        }
        match self {
            Self::Athletic => config.scenario_strong_penalty,
            Self::Office if OFFICE_PENALIZED.iter().any(|p| sub.contains(p)) => {
                config.scenario_soft_penalty
            }
            Self::Date if DATE_PENALIZED.iter().any(|p| sub.contains(p)) => {
                config.scenario_soft_penalty
            }
            _ => 1.0,
        }
    }
}

/// Whether the query literally mentions the item's sub-category.
///
/// Tolerates a trailing plural "s" on either side, so "loafers" in the query
/// matches a "Loafer" tag and vice versa.
#[must_use]
pub fn query_mentions(item: &WardrobeItem, query: &str) -> bool {
    let sub = item.sub_lower();
    if sub.is_empty() {
        return false;
    }
    let lower = query.to_lowercase();
    let singular = sub.strip_suffix('s').unwrap_or(&sub);
    lower.contains(&sub) || lower.contains(singular)
}

/// Full re-rank multiplier/boost for one candidate: intent nudges times the
/// scenario multiplier, plus the flat explicit-mention boost.
#[must_use]
pub fn rerank_score(
    raw_score: f32,
    item: &WardrobeItem,
    intent: StyleIntent,
    query: &str,
    bias: &BiasConfig,
    retrieval: &RetrievalConfig,
) -> f32 {
    // Cosine lives in [-1, 1]; shift it to [0, 1] so the multiplicative
    // nudges still separate candidates when similarity is zero or negative.
    let base = (1.0 + raw_score) / 2.0;
    let mut score = base
        * formality_bias(item, intent, bias)
        * color_mood_bias(item, intent, bias);
    if let Some(scenario) = Scenario::detect(query) {
        score *= scenario.multiplier(item, retrieval);
    }
    if query_mentions(item, query) {
        // Explicit user request wins over any scenario penalty.
        score += retrieval.keyword_boost;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Category, ItemAttributes};
    use crate::types::ItemId;

    fn item(sub: &str, color: &str, formality: Option<Formality>) -> WardrobeItem {
        WardrobeItem {
            id: ItemId::from(sub),
            category: Category::Top,
            attributes: ItemAttributes {
                sub_category: sub.to_string(),
                primary_color: color.to_string(),
                formality,
                ..ItemAttributes::default()
            },
            embedding: None,
            assets: None,
        }
    }

    #[test]
    fn formality_bias_nudges_both_ways() {
        let config = BiasConfig::default();
        let formal = item("Dress Shirt", "White", Some(Formality::Formal));
        let lounge = item("Sweatpants", "Grey", Some(Formality::Lounge));
        let untagged = item("Mystery", "Blue", None);
        assert!(formality_bias(&formal, StyleIntent::FormalEvent, &config) > 1.0);
        assert!(formality_bias(&lounge, StyleIntent::FormalEvent, &config) < 1.0);
        assert!((formality_bias(&untagged, StyleIntent::FormalEvent, &config) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn color_bias_is_weaker_than_formality_bias() {
        let config = BiasConfig::default();
        assert!(config.color_preferred < config.formality_preferred);
        let navy = item("Shirt", "Navy", None);
        let pink = item("Shirt", "Pink", None);
        assert!(
            color_mood_bias(&navy, StyleIntent::SmartCasual, &config)
                > color_mood_bias(&pink, StyleIntent::SmartCasual, &config)
        );
    }

    #[test]
    fn athletic_scenario_is_near_exclusionary() {
        let config = RetrievalConfig::default();
        let scenario = Scenario::detect("quick gym session").expect("scenario");
        assert_eq!(scenario, Scenario::Athletic);
        let joggers = item("Joggers", "Black", None);
        let blazer = item("Blazer", "Navy", None);
        assert!(scenario.multiplier(&joggers, &config) > 1.0);
        assert!(scenario.multiplier(&blazer, &config) < 0.5);
    }

    #[test]
    fn office_scenario_only_touches_listed_items() {
        let config = RetrievalConfig::default();
        let scenario = Scenario::detect("office meeting").expect("scenario");
        let shirt = item("Oxford Shirt", "White", None);
        let hoodie = item("Hoodie", "Grey", None);
        let jeans = item("Jeans", "Blue", None);
        assert!(scenario.multiplier(&shirt, &config) > 1.0);
        assert!(scenario.multiplier(&hoodie, &config) < 1.0);
        assert!((scenario.multiplier(&jeans, &config) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn explicit_mention_overrides_scenario_penalty() {
        let bias = BiasConfig::default();
        let retrieval = RetrievalConfig::default();
        let hoodie = item("Hoodie", "Grey", None);
        let penalized = rerank_score(0.5, &hoodie, StyleIntent::CasualDay, "office day", &bias, &retrieval);
        let requested =
            rerank_score(0.5, &hoodie, StyleIntent::CasualDay, "office day in my hoodie", &bias, &retrieval);
        assert!(requested > penalized + 0.2);
    }

    #[test]
    fn nudges_separate_candidates_at_zero_similarity() {
        let bias = BiasConfig::default();
        let retrieval = RetrievalConfig::default();
        let loafers = item("Loafers", "Brown", Some(Formality::SmartCasual));
        let sandals = item("Sandals", "Black", Some(Formality::Casual));
        let a = rerank_score(0.0, &loafers, StyleIntent::SmartCasual, "evening out", &bias, &retrieval);
        let b = rerank_score(0.0, &sandals, StyleIntent::SmartCasual, "evening out", &bias, &retrieval);
        // Brown sits in the smart-casual palette, black does not.
        assert!(a > b);
        assert!(b > 0.0);
    }

    #[test]
    fn plural_mention_matches_singular_tag() {
        let loafer = item("Loafer", "Brown", None);
        assert!(query_mentions(&loafer, "brown loafers for dinner"));
        let boots = item("Chelsea Boots", "Black", None);
        assert!(query_mentions(&boots, "chelsea boot weather"));
    }
}
