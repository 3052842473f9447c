//! Personalization from like/dislike feedback.
//!
//! Historical feedback events are folded into two read-only derived views:
//!
//! - a per-unordered-item-pair counter (incremented on like, decremented on
//!   dislike) that nudges beam edges up or down;
//! - a per-context blocklist of disliked full-outfit id-sets, which hard-
//!   skips any extension that would reproduce a previously rejected
//!   combination under a similar query.
//!
//! Neither view is mutated by the search. A fetch failure degrades to empty
//! bias, never fails planning.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{ItemId, UserId};

/// Modifier applied to a beam edge whose item pair has negative history.
const DISLIKED_PAIR_MODIFIER: f32 = -0.5;
/// Modifier for a pair with positive history.
const LIKED_PAIR_MODIFIER: f32 = 0.3;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Thumbs up or down on a recommended outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// User accepted the outfit.
    Like,
    /// User rejected the outfit.
    Dislike,
}

/// One recorded reaction to a recommended outfit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// Who reacted.
    pub user_id: UserId,
    /// Like or dislike.
    pub rating: Rating,
    /// Ids of every item in the outfit at feedback time.
    pub item_ids: BTreeSet<ItemId>,
    /// The query the outfit was planned for, if recorded.
    #[serde(default)]
    pub context: Option<String>,
    /// When the reaction happened.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Derived bias
// ---------------------------------------------------------------------------

/// Sorted unordered pair key.
fn pair_key(a: &ItemId, b: &ItemId) -> (ItemId, ItemId) {
    if a <= b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) }
}

fn normalize_context(context: &str) -> String {
    context.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Per-user bias derived from the feedback log. Append-only view, built once
/// per fetch.
#[derive(Debug, Clone, Default)]
pub struct FeedbackBias {
    pair_counts: HashMap<(ItemId, ItemId), i32>,
    context_blocklist: HashMap<String, Vec<BTreeSet<ItemId>>>,
}

impl FeedbackBias {
    /// Fold a feedback log into pair counters and the context blocklist.
    #[must_use]
    pub fn from_events(events: &[FeedbackEvent]) -> Self {
        let mut bias = Self::default();
        for event in events {
            let delta = match event.rating {
                Rating::Like => 1,
                Rating::Dislike => -1,
            };
            let ids: Vec<&ItemId> = event.item_ids.iter().collect();
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    *bias.pair_counts.entry(pair_key(a, b)).or_insert(0) += delta;
                }
            }
            if event.rating == Rating::Dislike {
                let context = normalize_context(event.context.as_deref().unwrap_or(""));
                bias.context_blocklist.entry(context).or_default().push(event.item_ids.clone());
            }
        }
        bias
    }

    /// Whether any feedback exists at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pair_counts.is_empty() && self.context_blocklist.is_empty()
    }

    /// Edge modifier for an item pair: negative history pushes hard down,
    /// positive history nudges up.
    #[must_use]
    pub fn pair_modifier(&self, a: &ItemId, b: &ItemId) -> f32 {
        match self.pair_counts.get(&pair_key(a, b)).copied().unwrap_or(0) {
            n if n < 0 => DISLIKED_PAIR_MODIFIER,
            n if n > 0 => LIKED_PAIR_MODIFIER,
            _ => 0.0,
        }
    }

    /// Whether this exact id-set was rejected under a context fuzzily
    /// matching the current query (substring either direction).
    ///
    /// A hard skip, not a penalty: the combination is dead for similar
    /// requests, though its items stay eligible elsewhere.
    #[must_use]
    pub fn is_blocked(&self, ids: &BTreeSet<ItemId>, query: &str) -> bool {
        let query = normalize_context(query);
        self.context_blocklist.iter().any(|(context, outfits)| {
            let context_matches = context.is_empty()
                || query.contains(context.as_str())
                || context.contains(&query);
            context_matches && outfits.iter().any(|blocked| blocked == ids)
        })
    }
}

// ---------------------------------------------------------------------------
// Source & cache
// ---------------------------------------------------------------------------

/// Where feedback events come from — a database in production, a fixed list
/// in tests.
pub trait FeedbackSource: Send + Sync {
    /// All recorded events for one user.
    ///
    /// # Errors
    ///
    /// May fail on the underlying store; callers treat failure as "no
    /// feedback".
    fn events_for(&self, user_id: &UserId) -> crate::error::Result<Vec<FeedbackEvent>>;
}

/// A source backed by an in-memory event list.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedback(pub Vec<FeedbackEvent>);

impl FeedbackSource for StaticFeedback {
    fn events_for(&self, user_id: &UserId) -> crate::error::Result<Vec<FeedbackEvent>> {
        Ok(self.0.iter().filter(|e| &e.user_id == user_id).cloned().collect())
    }
}

/// Compute-once per-user cache over a [`FeedbackSource`].
///
/// Feedback changes rarely relative to planning requests; entries live until
/// [`FeedbackCache::invalidate_user`] or process restart. Values are never
/// updated in place, so concurrent planning requests for the same user are
/// safe.
pub struct FeedbackCache {
    source: Box<dyn FeedbackSource>,
    cache: DashMap<UserId, Arc<FeedbackBias>>,
}

impl FeedbackCache {
    /// Wrap a feedback source.
    #[must_use]
    pub fn new(source: Box<dyn FeedbackSource>) -> Self {
        Self { source, cache: DashMap::new() }
    }

    /// Bias for one user, computed on first access.
    ///
    /// A source failure is logged and degrades to empty bias; it is not
    /// cached, so the next request retries the fetch.
    #[must_use]
    pub fn bias_for(&self, user_id: &UserId) -> Arc<FeedbackBias> {
        if let Some(cached) = self.cache.get(user_id) {
            return Arc::clone(&cached);
        }
        match self.source.events_for(user_id) {
            Ok(events) => {
                let bias = Arc::new(FeedbackBias::from_events(&events));
                self.cache.insert(user_id.clone(), Arc::clone(&bias));
                bias
            }
            Err(e) => {
                warn!(user = %user_id, error = %e, "feedback fetch failed, planning without bias");
                Arc::new(FeedbackBias::default())
            }
        }
    }

    /// Drop the cached bias for one user (call after new feedback lands).
    pub fn invalidate_user(&self, user_id: &UserId) {
        self.cache.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> BTreeSet<ItemId> {
        names.iter().map(|n| ItemId::from(*n)).collect()
    }

    fn event(user: &str, rating: Rating, items: &[&str], context: Option<&str>) -> FeedbackEvent {
        FeedbackEvent {
            user_id: UserId(user.to_string()),
            rating,
            item_ids: ids(items),
            context: context.map(str::to_string),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn likes_and_dislikes_cancel_out() {
        let bias = FeedbackBias::from_events(&[
            event("u", Rating::Like, &["a", "b"], None),
            event("u", Rating::Dislike, &["a", "b"], None),
        ]);
        let a = ItemId::from("a");
        let b = ItemId::from("b");
        assert!((bias.pair_modifier(&a, &b) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn pair_modifier_is_order_independent() {
        let bias = FeedbackBias::from_events(&[event("u", Rating::Dislike, &["a", "b"], None)]);
        let a = ItemId::from("a");
        let b = ItemId::from("b");
        assert!((bias.pair_modifier(&a, &b) - (-0.5)).abs() < f32::EPSILON);
        assert!((bias.pair_modifier(&b, &a) - (-0.5)).abs() < f32::EPSILON);
    }

    #[test]
    fn dislike_blocks_exact_set_under_similar_context() {
        let bias =
            FeedbackBias::from_events(&[event("u", Rating::Dislike, &["shirt", "loafers"], Some("dinner"))]);
        assert!(bias.is_blocked(&ids(&["shirt", "loafers"]), "smart casual dinner"));
        // Different id-set under the same context stays allowed.
        assert!(!bias.is_blocked(&ids(&["shirt", "boots"]), "smart casual dinner"));
        // Same set under an unrelated context stays allowed.
        assert!(!bias.is_blocked(&ids(&["shirt", "loafers"]), "gym session"));
    }

    #[test]
    fn context_matching_is_bidirectional_substring() {
        let bias = FeedbackBias::from_events(&[event(
            "u",
            Rating::Dislike,
            &["a", "b"],
            Some("casual office meeting outfit"),
        )]);
        // Query is a substring of the recorded context.
        assert!(bias.is_blocked(&ids(&["a", "b"]), "office meeting"));
    }

    #[test]
    fn liked_pairs_nudge_up() {
        let bias = FeedbackBias::from_events(&[event("u", Rating::Like, &["a", "b", "c"], None)]);
        let a = ItemId::from("a");
        let c = ItemId::from("c");
        // Every unordered pair in the liked outfit counts, not just adjacency.
        assert!((bias.pair_modifier(&a, &c) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn cache_computes_once_and_invalidates() {
        let source = StaticFeedback(vec![event("u", Rating::Like, &["a", "b"], None)]);
        let cache = FeedbackCache::new(Box::new(source));
        let user = UserId("u".to_string());
        let first = cache.bias_for(&user);
        let second = cache.bias_for(&user);
        assert!(Arc::ptr_eq(&first, &second));
        cache.invalidate_user(&user);
        let third = cache.bias_for(&user);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn unknown_user_gets_empty_bias() {
        let cache = FeedbackCache::new(Box::new(StaticFeedback::default()));
        let bias = cache.bias_for(&UserId("nobody".to_string()));
        assert!(bias.is_empty());
    }
}
