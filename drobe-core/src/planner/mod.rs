//! The outfit planner.
//!
//! Orchestrates one planning request end to end: weather resolution,
//! template selection, per-slot candidate retrieval, beam search, finalist
//! selection, confidence scoring, and the optional shopping suggestion.
//! Encoder failure degrades to the rule-based fallback planner instead of
//! failing the request.

pub mod beam;
pub mod candidates;
pub mod fallback;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::confidence::{ConfidenceReport, compute_confidence};
use crate::encoder::TextEncoder;
use crate::feedback::{FeedbackBias, FeedbackCache, FeedbackSource};
use crate::ontology::{Category, Outfit, OutfitTemplate, StyleIntent, TemplateTable};
use crate::scoring::consistency::{ConsistencyReport, compute_outfit_consistency};
use crate::scoring::pairwise::evaluate_pair;
use crate::shopping::{Catalog, ShoppingSuggestion, suggest_upgrade};
use crate::store::WardrobeStore;
use crate::types::{Embedding, UserId};
use crate::weather::{WeatherProvider, WeatherSnapshot};

/// Below this temperature the planner routes straight to the layered
/// template, before any embedding comparison.
const LAYERED_TEMP_CUTOFF_C: f32 = 15.0;

/// Anchor phrases for the embedding-based template tiebreak.
const COLD_ANCHOR: &str = "cold winter layered outfit";
const WARM_ANCHOR: &str = "warm summer outfit";

/// Query tokens routing to the formal template.
const FORMAL_CUES: [&str; 6] = ["wedding", "formal", "gala", "interview", "tuxedo", "black-tie"];
/// Query tokens routing to the one-piece template.
const ONE_PIECE_CUES: [&str; 3] = ["dress", "gown", "jumpsuit"];
/// Query tokens routing to the smart-casual template.
const SMART_CASUAL_CUES: [&str; 6] = ["office", "meeting", "dinner", "date", "business", "brunch"];

// ---------------------------------------------------------------------------
// RNG seam
// ---------------------------------------------------------------------------

/// Jitter source for re-ranking.
///
/// An explicit seam rather than ambient `rand` state: tests run seeded (or
/// with amplitude 0 for full determinism), production runs from entropy.
pub struct PlannerRng(StdRng);

impl PlannerRng {
    /// Deterministic RNG for tests and reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Entropy-seeded RNG for production.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Multiplicative jitter factor in `[1 - amplitude, 1 + amplitude]`.
    /// Amplitude 0 always yields exactly 1.0.
    pub fn jitter(&mut self, amplitude: f32) -> f32 {
        if amplitude <= 0.0 {
            return 1.0;
        }
        1.0 + self.0.gen_range(-amplitude..=amplitude)
    }
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// One planning request.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Free-text intent, e.g. "casual office meeting".
    pub query: String,
    /// Explicit weather override text, wins over provider and query cues.
    pub weather_override: Option<String>,
    /// Whose feedback history to apply.
    pub user_id: Option<UserId>,
}

impl PlanRequest {
    /// Request with just a query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), weather_override: None, user_id: None }
    }
}

/// How the outfit was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMethod {
    /// Full embedding retrieval plus beam search.
    Beam,
    /// Rule-based fallback (encoder unavailable).
    RuleBased,
}

/// A successfully planned outfit with its reporting payload.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// One item per filled slot.
    pub outfit: Outfit,
    /// Name of the template that was planned against.
    pub template: String,
    /// The template's style intent.
    pub intent: StyleIntent,
    /// Weather the plan was made for, after overrides.
    pub weather: WeatherSnapshot,
    /// User-facing confidence score and notes.
    pub confidence: ConfidenceReport,
    /// Outfit-level consistency of the final pick.
    pub consistency: ConsistencyReport,
    /// At most one purchase suggestion.
    pub shopping_tip: Option<ShoppingSuggestion>,
    /// Internal search score of the winning path (0 for rule-based plans).
    pub search_score: f32,
    /// Which pipeline produced the outfit.
    pub method: PlanMethod,
}

/// Outcome of a planning request. Infeasibility is an expected business
/// result, not an error.
#[derive(Debug)]
pub enum PlanOutcome {
    /// A complete outfit was found.
    Planned(Box<PlanResult>),
    /// No feasible outfit under the current wardrobe and constraints.
    Infeasible {
        /// What could not be satisfied.
        reason: String,
    },
}

impl PlanOutcome {
    /// The plan, if one was produced.
    #[must_use]
    pub fn planned(&self) -> Option<&PlanResult> {
        match self {
            Self::Planned(result) => Some(result),
            Self::Infeasible { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// The planning facade. Holds immutable collaborators; safe to share across
/// concurrent requests over the same store snapshot.
pub struct OutfitPlanner {
    store: Arc<WardrobeStore>,
    encoder: Arc<dyn TextEncoder>,
    weather: Box<dyn WeatherProvider>,
    feedback: FeedbackCache,
    templates: TemplateTable,
    catalog: Option<Catalog>,
    config: PlannerConfig,
}

impl OutfitPlanner {
    /// Assemble a planner from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<WardrobeStore>,
        encoder: Arc<dyn TextEncoder>,
        weather: Box<dyn WeatherProvider>,
        feedback: Box<dyn FeedbackSource>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            store,
            encoder,
            weather,
            feedback: FeedbackCache::new(feedback),
            templates: TemplateTable::builtin(),
            catalog: None,
            config,
        }
    }

    /// Replace the built-in template table.
    #[must_use]
    pub fn with_templates(mut self, templates: TemplateTable) -> Self {
        self.templates = templates;
        self
    }

    /// Attach an essentials catalog for shopping suggestions. Entries should
    /// already be encoded.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Drop any cached feedback bias for a user (call after new feedback).
    pub fn invalidate_feedback(&self, user_id: &UserId) {
        self.feedback.invalidate_user(user_id);
    }

    /// Plan one outfit.
    pub fn plan(&self, request: &PlanRequest, rng: &mut PlannerRng) -> PlanOutcome {
        let weather = self
            .weather
            .current()
            .with_overrides(request.weather_override.as_deref(), &request.query);
        debug!(query = %request.query, condition = %weather.condition, temp = weather.temperature_c, "planning");

        let bias = match &request.user_id {
            Some(user) => self.feedback.bias_for(user),
            None => Arc::new(FeedbackBias::default()),
        };

        // One encoder call covers the query and both template anchors.
        let vectors = self.encoder.encode_text(&[&request.query, COLD_ANCHOR, WARM_ANCHOR]);
        let (query_vec, anchors) = match vectors {
            Ok(mut v) if v.len() == 3 => {
                let warm = v.pop();
                let cold = v.pop();
                (v.pop(), cold.zip(warm))
            }
            Ok(_) => (None, None),
            Err(e) => {
                warn!(error = %e, "encoder unavailable, degrading to rule-based planning");
                (None, None)
            }
        };

        let Some(template) = self.detect_template(&request.query, &weather, query_vec.as_ref(), anchors.as_ref())
        else {
            return PlanOutcome::Infeasible { reason: "no templates configured".to_string() };
        };
        info!(template = %template.name, "template selected");

        let Some(query_vec) = query_vec else {
            return self.plan_fallback(template, &weather);
        };

        let slots = match candidates::collect(
            &self.store,
            template,
            &request.query,
            &query_vec,
            &weather,
            &self.config,
            rng,
        ) {
            Ok(slots) => slots,
            Err(empty) => {
                return PlanOutcome::Infeasible {
                    reason: format!("no weather-safe candidates for required slot {}", empty.category),
                };
            }
        };

        let paths =
            beam::run(&slots, template.intent, &weather, &request.query, &bias, &self.config);
        if paths.is_empty() {
            return PlanOutcome::Infeasible {
                reason: "no outfit combination survived the constraint gates".to_string(),
            };
        }

        // Blend the search score with an independent confidence pass to pick
        // among finalists.
        let mut best: Option<(Outfit, f32, f32, ConfidenceReport)> = None;
        for path in paths {
            let (outfit, search_score) = path.into_outfit();
            let confidence = compute_confidence(
                &outfit,
                template.intent,
                &weather,
                &self.config.confidence,
                &self.config.safety,
            );
            let blended = search_score * self.config.beam.final_search_weight
                + confidence.score * self.config.beam.final_confidence_weight;
            if best.as_ref().is_none_or(|(_, _, b, _)| blended > *b) {
                best = Some((outfit, search_score, blended, confidence));
            }
        }
        let Some((outfit, search_score, _, confidence)) = best else {
            return PlanOutcome::Infeasible { reason: "empty beam".to_string() };
        };

        let consistency =
            compute_outfit_consistency(&outfit, template.intent, &weather, &self.config.consistency);
        let shopping_tip = self
            .catalog
            .as_ref()
            .and_then(|c| suggest_upgrade(&outfit, &query_vec, c, &self.config.shopping));

        PlanOutcome::Planned(Box::new(PlanResult {
            outfit,
            template: template.name.clone(),
            intent: template.intent,
            weather,
            confidence,
            consistency,
            shopping_tip,
            search_score,
            method: PlanMethod::Beam,
        }))
    }

    fn plan_fallback(&self, template: &OutfitTemplate, weather: &WeatherSnapshot) -> PlanOutcome {
        let Some(outfit) = fallback::plan_rule_based(&self.store, template, weather, &self.config)
        else {
            return PlanOutcome::Infeasible {
                reason: "rule-based fallback could not fill a required slot".to_string(),
            };
        };
        let confidence = compute_confidence(
            &outfit,
            template.intent,
            weather,
            &self.config.confidence,
            &self.config.safety,
        );
        let consistency =
            compute_outfit_consistency(&outfit, template.intent, weather, &self.config.consistency);
        PlanOutcome::Planned(Box::new(PlanResult {
            outfit,
            template: template.name.clone(),
            intent: template.intent,
            weather: weather.clone(),
            confidence,
            consistency,
            shopping_tip: None,
            search_score: 0.0,
            method: PlanMethod::RuleBased,
        }))
    }

    /// Deterministic template selection cascade.
    ///
    /// Cold or precipitating weather routes to "layered" before anything
    /// else; explicit query cues route to "formal", "one_piece" or
    /// "smart_casual"; otherwise the query embedding is compared against the
    /// cold/warm anchor phrases to pick between "layered" and "basic".
    /// Missing table entries fall through to "basic".
    fn detect_template(
        &self,
        query: &str,
        weather: &WeatherSnapshot,
        query_vec: Option<&Embedding>,
        anchors: Option<&(Embedding, Embedding)>,
    ) -> Option<&OutfitTemplate> {
        let name = self.template_name_for(query, weather, query_vec, anchors);
        self.templates
            .get(name)
            .or_else(|| self.templates.get("basic"))
            .or_else(|| self.templates.names().next().and_then(|n| self.templates.get(n)))
    }

    fn template_name_for(
        &self,
        query: &str,
        weather: &WeatherSnapshot,
        query_vec: Option<&Embedding>,
        anchors: Option<&(Embedding, Embedding)>,
    ) -> &'static str {
        if weather.temperature_c < LAYERED_TEMP_CUTOFF_C || weather.condition.is_precipitating() {
            return "layered";
        }

        let lower = query.to_lowercase();
        let tokens: Vec<&str> =
            lower.split(|c: char| !c.is_alphanumeric() && c != '-').filter(|t| !t.is_empty()).collect();
        if FORMAL_CUES.iter().any(|c| tokens.contains(c)) {
            return "formal";
        }
        if ONE_PIECE_CUES.iter().any(|c| tokens.contains(c)) {
            return "one_piece";
        }
        if SMART_CASUAL_CUES.iter().any(|c| tokens.contains(c)) {
            return "smart_casual";
        }

        if let (Some(query_vec), Some((cold, warm))) = (query_vec, anchors) {
            if query_vec.cosine_similarity(cold) > query_vec.cosine_similarity(warm) {
                return "layered";
            }
        }
        "basic"
    }

    /// Replace one slot of an existing outfit with the best alternative from
    /// the wardrobe.
    ///
    /// Alternatives are gated by current weather and scored by mean pairwise
    /// compatibility against the rest of the outfit. Returns `None` when the
    /// slot is unfilled or no alternative exists.
    #[must_use]
    pub fn swap_slot(&self, outfit: &Outfit, category: Category, intent: StyleIntent) -> Option<Outfit> {
        let current = outfit.get(category)?;
        let weather = self.weather.current();
        let others: Vec<_> = outfit.iter().filter(|(c, _)| *c != category).map(|(_, i)| i).collect();

        let replacement = self
            .store
            .items_by_category(category)
            .into_iter()
            .filter(|i| i.id != current.id)
            .filter(|i| crate::scoring::safety::is_weather_safe(i, &weather, &self.config.safety))
            .map(|candidate| {
                let score = if others.is_empty() {
                    0.5
                } else {
                    others.iter().map(|o| evaluate_pair(o, candidate, intent)).sum::<f32>()
                        / others.len() as f32
                };
                (candidate, score)
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i.clone())?;

        info!(slot = %category, from = %current.id, to = %replacement.id, "swapped slot");
        let mut swapped = outfit.clone();
        swapped.insert(replacement);
        Some(swapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::HashedTextEncoder;
    use crate::feedback::StaticFeedback;
    use crate::ontology::{Formality, ItemAttributes, WardrobeItem};
    use crate::types::ItemId;
    use crate::weather::{StaticWeather, WeatherCondition};

    fn planner_with(
        items: Vec<WardrobeItem>,
        condition: WeatherCondition,
        temp: f32,
    ) -> OutfitPlanner {
        let encoder = HashedTextEncoder::new(64);
        let store = WardrobeStore::from_items(items);
        OutfitPlanner::new(
            Arc::new(store),
            Arc::new(encoder),
            Box::new(StaticWeather::new(condition, temp)),
            Box::new(StaticFeedback::default()),
            PlannerConfig::default(),
        )
    }

    fn item(id: &str, category: Category, sub: &str, color: &str) -> WardrobeItem {
        let encoder = HashedTextEncoder::new(64);
        let text = format!("{color} {sub}");
        let embedding = encoder.encode_one(&text).ok();
        WardrobeItem {
            id: ItemId::from(id),
            category,
            attributes: ItemAttributes {
                sub_category: sub.to_string(),
                primary_color: color.to_string(),
                formality: Some(Formality::Casual),
                ..ItemAttributes::default()
            },
            embedding,
            assets: None,
        }
    }

    #[test]
    fn jitter_amplitude_zero_is_exactly_one() {
        let mut rng = PlannerRng::seeded(42);
        for _ in 0..10 {
            assert!((rng.jitter(0.0) - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let mut rng = PlannerRng::seeded(42);
        for _ in 0..100 {
            let j = rng.jitter(0.15);
            assert!((0.85..=1.15).contains(&j), "jitter {j} out of band");
        }
    }

    #[test]
    fn cold_weather_routes_to_layered() {
        let planner = planner_with(vec![], WeatherCondition::Clear, 5.0);
        let weather = planner.weather.current();
        assert_eq!(planner.template_name_for("anything", &weather, None, None), "layered");
    }

    #[test]
    fn rain_routes_to_layered_even_when_warm() {
        let planner = planner_with(vec![], WeatherCondition::Rainy, 22.0);
        let weather = planner.weather.current();
        assert_eq!(planner.template_name_for("anything", &weather, None, None), "layered");
    }

    #[test]
    fn formal_cues_route_to_formal_template() {
        let planner = planner_with(vec![], WeatherCondition::Clear, 20.0);
        let weather = planner.weather.current();
        assert_eq!(planner.template_name_for("a summer wedding", &weather, None, None), "formal");
        assert_eq!(planner.template_name_for("job interview", &weather, None, None), "formal");
    }

    #[test]
    fn dressed_does_not_trigger_one_piece() {
        let planner = planner_with(vec![], WeatherCondition::Clear, 20.0);
        let weather = planner.weather.current();
        // Token match, not substring: "dressed" must not hit the "dress" cue.
        assert_eq!(planner.template_name_for("dressed down friday", &weather, None, None), "basic");
        assert_eq!(planner.template_name_for("a red dress day", &weather, None, None), "one_piece");
    }

    #[test]
    fn office_cue_routes_to_smart_casual() {
        let planner = planner_with(vec![], WeatherCondition::Clear, 20.0);
        let weather = planner.weather.current();
        assert_eq!(
            planner.template_name_for("casual office look", &weather, None, None),
            "smart_casual"
        );
    }

    #[test]
    fn swap_slot_picks_a_different_item() {
        let boots = item("boots", Category::Footwear, "Chelsea Boots", "Brown");
        let sneakers = item("sneakers", Category::Footwear, "Sneakers", "Grey");
        let top = item("top", Category::Top, "Oxford Shirt", "Navy");
        let planner = planner_with(
            vec![top.clone(), boots.clone(), sneakers],
            WeatherCondition::Clear,
            18.0,
        );
        let outfit: Outfit = vec![top, boots].into_iter().collect();
        let swapped =
            planner.swap_slot(&outfit, Category::Footwear, StyleIntent::CasualDay).expect("swap");
        assert_eq!(swapped.get(Category::Footwear).unwrap().id.as_str(), "sneakers");
        assert_eq!(swapped.get(Category::Top).unwrap().id.as_str(), "top");
    }

    #[test]
    fn swap_with_no_alternative_returns_none() {
        let boots = item("boots", Category::Footwear, "Chelsea Boots", "Brown");
        let planner = planner_with(vec![boots.clone()], WeatherCondition::Clear, 18.0);
        let outfit: Outfit = vec![boots].into_iter().collect();
        assert!(planner.swap_slot(&outfit, Category::Footwear, StyleIntent::CasualDay).is_none());
        assert!(planner.swap_slot(&outfit, Category::Top, StyleIntent::CasualDay).is_none());
    }
}
