//! Beam search over template slots.
//!
//! Paths grow one slot at a time; each extension edge blends the path's
//! running score, the candidate's slot-weighted retrieval score, and the
//! mean pairwise compatibility against every item already on the path, then
//! gets damped by the outfit-level consistency of the tentative combination.
//! Personalization modifies the edge afterwards: pair history nudges, context
//! blocks kill the extension outright. The beam never exceeds its configured
//! width.

use tracing::trace;

use crate::config::PlannerConfig;
use crate::feedback::FeedbackBias;
use crate::ontology::{Outfit, StyleIntent, WardrobeItem};
use crate::planner::candidates::SlotCandidates;
use crate::scoring::{consistency, pairwise};
use crate::types::ScoreKey;
use crate::weather::WeatherSnapshot;

/// One partial-outfit hypothesis.
#[derive(Debug, Clone)]
pub struct SearchPath {
    /// Items in slot order, one per slot processed.
    pub items: Vec<WardrobeItem>,
    /// Cumulative search score.
    pub score: f32,
}

impl SearchPath {
    fn contains(&self, item: &WardrobeItem) -> bool {
        self.items.iter().any(|i| i.id == item.id)
    }

    fn has_sub_category(&self, sub: &str) -> bool {
        !sub.is_empty() && self.items.iter().any(|i| i.sub_lower() == sub)
    }

    /// The completed outfit this path represents.
    #[must_use]
    pub fn into_outfit(self) -> (Outfit, f32) {
        let score = self.score;
        (self.items.into_iter().collect(), score)
    }
}

/// Run beam search over the effective slot list.
///
/// Returns up to `beam_width` complete paths, best first. Empty means no
/// feasible combination survived the gates.
#[must_use]
pub fn run(
    slots: &[SlotCandidates],
    intent: StyleIntent,
    weather: &WeatherSnapshot,
    query: &str,
    feedback: &FeedbackBias,
    config: &PlannerConfig,
) -> Vec<SearchPath> {
    let Some((first, rest)) = slots.split_first() else {
        return Vec::new();
    };

    let mut beam: Vec<SearchPath> = first
        .candidates
        .iter()
        .take(config.beam.beam_width)
        .map(|c| SearchPath { items: vec![c.item.clone()], score: c.score })
        .collect();

    for slot in rest {
        let mut extended: Vec<SearchPath> = Vec::new();

        for path in &beam {
            for candidate in &slot.candidates {
                if let Some(new_path) =
                    extend(path, candidate, slot, intent, weather, query, feedback, config)
                {
                    extended.push(new_path);
                }
            }
        }

        if extended.is_empty() {
            if slot.slot.required {
                trace!(category = %slot.slot.category, "beam emptied on required slot");
                return Vec::new();
            }
            // Optional slot with no surviving extension: carry the beam
            // forward unextended (a structurally shorter outfit).
            continue;
        }

        extended.sort_by_key(|p| std::cmp::Reverse(ScoreKey::new(p.score)));
        extended.truncate(config.beam.beam_width);
        beam = extended;
    }

    beam
}

#[allow(clippy::too_many_arguments)]
fn extend(
    path: &SearchPath,
    candidate: &crate::planner::candidates::ScoredCandidate,
    slot: &SlotCandidates,
    intent: StyleIntent,
    weather: &WeatherSnapshot,
    query: &str,
    feedback: &FeedbackBias,
    config: &PlannerConfig,
) -> Option<SearchPath> {
    let item = &candidate.item;
    if path.contains(item) {
        return None;
    }

    // A previously rejected combination for a similar query is dead.
    let tentative: Outfit =
        path.items.iter().chain(std::iter::once(item)).cloned().collect();
    if feedback.is_blocked(&tentative.ids(), query) {
        return None;
    }

    // Compatibility with the whole path, not just the neighbouring slot;
    // a clash against the first item counts as much as one against the last.
    let mut compat = path
        .items
        .iter()
        .map(|worn| pairwise::evaluate_pair(worn, item, intent))
        .sum::<f32>()
        / path.items.len() as f32;
    if path.has_sub_category(&item.sub_lower()) {
        compat -= config.beam.duplicate_sub_penalty;
    }

    let report = consistency::compute_outfit_consistency(&tentative, intent, weather, &config.consistency);
    if weather.condition.is_precipitating() && report.score < config.consistency.rain_prune_threshold {
        return None;
    }

    let blend = path.score * config.beam.weight_path
        + candidate.score * config.beam.slot_weight(slot.slot.category) * config.beam.weight_retrieval
        + compat * config.beam.weight_pairwise;
    let damping = config.beam.damping_base + config.beam.damping_span * report.score;
    let history: f32 =
        path.items.iter().map(|worn| feedback.pair_modifier(&worn.id, &item.id)).sum();
    let score = blend * damping + history;

    let mut items = path.items.clone();
    items.push(item.clone());
    Some(SearchPath { items, score })
}
