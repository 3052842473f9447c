//! Per-slot candidate retrieval and hybrid re-ranking.
//!
//! For every template slot: pull top-K same-category items by embedding
//! similarity, multiply in the intent/scenario biases and jitter, then drop
//! anything failing the weather gate. An empty required slot aborts the
//! whole plan; an empty optional slot just vanishes from the effective slot
//! list.

use tracing::debug;

use crate::config::PlannerConfig;
use crate::ontology::{OutfitTemplate, SlotSpec, WardrobeItem};
use crate::planner::PlannerRng;
use crate::scoring::{bias, safety};
use crate::store::WardrobeStore;
use crate::types::{Embedding, ScoreKey};
use crate::weather::WeatherSnapshot;

/// One re-ranked, weather-safe candidate for a slot.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// The candidate item (cloned out of the store for path building).
    pub item: WardrobeItem,
    /// Re-ranked retrieval score. Can exceed 1.0 after boosts.
    pub score: f32,
}

/// All surviving candidates for one slot.
#[derive(Debug, Clone)]
pub struct SlotCandidates {
    /// The template slot being filled.
    pub slot: SlotSpec,
    /// Candidates, descending by re-ranked score.
    pub candidates: Vec<ScoredCandidate>,
}

/// Why candidate collection could not produce a plannable slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredSlotEmpty {
    /// Display name of the empty category.
    pub category: String,
}

/// Collect and re-rank candidates for every slot of a template.
///
/// Returns the effective slot list: optional slots with zero survivors are
/// silently dropped, a required slot with zero survivors is an error the
/// caller turns into an infeasible outcome.
pub fn collect(
    store: &WardrobeStore,
    template: &OutfitTemplate,
    query: &str,
    query_vec: &Embedding,
    weather: &WeatherSnapshot,
    config: &PlannerConfig,
    rng: &mut PlannerRng,
) -> Result<Vec<SlotCandidates>, RequiredSlotEmpty> {
    let top_k = config.retrieval.top_k_for(template.intent);
    let mut slots = Vec::with_capacity(template.slots.len());

    for spec in &template.slots {
        let raw = store.search(query_vec, Some(spec.category), top_k);

        let mut candidates: Vec<ScoredCandidate> = raw
            .into_iter()
            .filter_map(|c| store.get(&c.item_id).map(|item| (item.clone(), c.score)))
            .filter(|(item, _)| safety::is_weather_safe(item, weather, &config.safety))
            .map(|(item, raw_score)| {
                let reranked = bias::rerank_score(
                    raw_score,
                    &item,
                    template.intent,
                    query,
                    &config.bias,
                    &config.retrieval,
                ) * rng.jitter(config.retrieval.jitter_amplitude);
                ScoredCandidate { item, score: reranked }
            })
            .collect();

        candidates.sort_by_key(|c| std::cmp::Reverse(ScoreKey::new(c.score)));

        if candidates.is_empty() {
            if spec.required {
                return Err(RequiredSlotEmpty { category: spec.category.to_string() });
            }
            debug!(category = %spec.category, "optional slot has no candidates, skipping");
            continue;
        }

        slots.push(SlotCandidates { slot: *spec, candidates });
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Category, Formality, ItemAttributes, StyleIntent};
    use crate::types::ItemId;
    use crate::weather::{WeatherCondition, WeatherSnapshot};

    fn item(id: &str, category: Category, sub: &str, vec: Vec<f32>) -> WardrobeItem {
        WardrobeItem {
            id: ItemId::from(id),
            category,
            attributes: ItemAttributes {
                sub_category: sub.to_string(),
                formality: Some(Formality::Casual),
                ..ItemAttributes::default()
            },
            embedding: Some(Embedding(vec)),
            assets: None,
        }
    }

    fn template(slots: Vec<SlotSpec>) -> OutfitTemplate {
        OutfitTemplate { name: "test".into(), intent: StyleIntent::CasualDay, slots }
    }

    fn clear() -> WeatherSnapshot {
        WeatherSnapshot {
            condition: WeatherCondition::Clear,
            temperature_c: 18.0,
            location: "test".into(),
        }
    }

    #[test]
    fn required_slot_with_no_candidates_errors() {
        let store = WardrobeStore::from_items(vec![item("t1", Category::Top, "Tee", vec![1.0, 0.0])]);
        let t = template(vec![SlotSpec::required(Category::Top), SlotSpec::required(Category::Footwear)]);
        let mut rng = PlannerRng::seeded(7);
        let err = collect(
            &store,
            &t,
            "anything",
            &Embedding(vec![1.0, 0.0]),
            &clear(),
            &PlannerConfig::default(),
            &mut rng,
        )
        .expect_err("missing footwear");
        assert_eq!(err.category, "Footwear");
    }

    #[test]
    fn optional_slot_with_no_candidates_is_dropped() {
        let store = WardrobeStore::from_items(vec![item("t1", Category::Top, "Tee", vec![1.0, 0.0])]);
        let t = template(vec![
            SlotSpec::required(Category::Top),
            SlotSpec::optional(Category::Accessory, 1),
        ]);
        let mut rng = PlannerRng::seeded(7);
        let slots = collect(
            &store,
            &t,
            "anything",
            &Embedding(vec![1.0, 0.0]),
            &clear(),
            &PlannerConfig::default(),
            &mut rng,
        )
        .expect("plan");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot.category, Category::Top);
    }

    #[test]
    fn unsafe_candidates_never_survive() {
        let store = WardrobeStore::from_items(vec![
            item("s1", Category::Footwear, "Sandals", vec![1.0, 0.0]),
            item("b1", Category::Footwear, "Chelsea Boots", vec![0.5, 0.5]),
        ]);
        let t = template(vec![SlotSpec::required(Category::Footwear)]);
        let rainy = WeatherSnapshot {
            condition: WeatherCondition::Rainy,
            temperature_c: 12.0,
            location: "test".into(),
        };
        let mut rng = PlannerRng::seeded(7);
        let slots = collect(
            &store,
            &t,
            "walk in the rain",
            &Embedding(vec![1.0, 0.0]),
            &rainy,
            &PlannerConfig::default(),
            &mut rng,
        )
        .expect("plan");
        assert_eq!(slots[0].candidates.len(), 1);
        assert_eq!(slots[0].candidates[0].item.id.as_str(), "b1");
    }

    #[test]
    fn only_unsafe_required_candidates_means_infeasible() {
        let store =
            WardrobeStore::from_items(vec![item("s1", Category::Footwear, "Sandals", vec![1.0, 0.0])]);
        let t = template(vec![SlotSpec::required(Category::Footwear)]);
        let rainy = WeatherSnapshot {
            condition: WeatherCondition::Rainy,
            temperature_c: 12.0,
            location: "test".into(),
        };
        let mut rng = PlannerRng::seeded(7);
        let result = collect(
            &store,
            &t,
            "errands",
            &Embedding(vec![1.0, 0.0]),
            &rainy,
            &PlannerConfig::default(),
            &mut rng,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let store = WardrobeStore::from_items(vec![
            item("t1", Category::Top, "Tee", vec![1.0, 0.1]),
            item("t2", Category::Top, "Shirt", vec![1.0, 0.2]),
        ]);
        let t = template(vec![SlotSpec::required(Category::Top)]);
        let mut config = PlannerConfig::default();
        config.retrieval.jitter_amplitude = 0.0;

        let run = |seed: u64| {
            let mut rng = PlannerRng::seeded(seed);
            collect(&store, &t, "tee", &Embedding(vec![1.0, 0.0]), &clear(), &config, &mut rng)
                .expect("plan")[0]
                .candidates
                .iter()
                .map(|c| (c.item.id.clone(), c.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(1), run(999));
    }
}
