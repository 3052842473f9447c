//! Shopping/upgrade advisor.
//!
//! After an outfit is finalized, scan a catalog of virtual (unowned) items
//! for the single purchase that would most improve fit to the query. Owned
//! items win by default via a flat bias, and anything loosely overlapping an
//! owned piece is skipped — the advisor suggests upgrades, not duplicates.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ShoppingConfig;
use crate::encoder::TextEncoder;
use crate::error::Result;
use crate::ontology::{Category, Outfit};
use crate::types::{Embedding, ItemId};

/// A purchasable item the user does not own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog identifier.
    pub id: ItemId,
    /// Slot this item would fill.
    pub category: Category,
    /// Fine-grained kind, e.g. "Trench Coat".
    pub sub_category: String,
    /// Dominant color.
    #[serde(default)]
    pub primary_color: String,
    /// Short marketing description, the text that gets embedded.
    #[serde(default)]
    pub description: String,
    /// Text-derived embedding, filled by [`Catalog::encode_with`].
    #[serde(default)]
    pub embedding: Option<Embedding>,
}

impl CatalogItem {
    fn encode_source(&self) -> String {
        if self.description.is_empty() {
            format!("{} {}", self.primary_color, self.sub_category)
        } else {
            self.description.clone()
        }
    }
}

/// The essentials catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// All catalog entries.
    pub items: Vec<CatalogItem>,
}

impl Catalog {
    /// Load a catalog from a JSON file (an array of catalog items).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<CatalogItem> = serde_json::from_str(&content)?;
        Ok(Self { items })
    }

    /// Fill in embeddings for every entry via the text encoder.
    ///
    /// Done once at load, not per request.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn encode_with(&mut self, encoder: &dyn TextEncoder) -> Result<()> {
        let sources: Vec<String> = self.items.iter().map(CatalogItem::encode_source).collect();
        let refs: Vec<&str> = sources.iter().map(String::as_str).collect();
        let vectors = encoder.encode_text(&refs)?;
        for (item, vector) in self.items.iter_mut().zip(vectors) {
            item.embedding = Some(vector);
        }
        Ok(())
    }
}

/// A single upgrade suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingSuggestion {
    /// The suggested catalog item.
    pub item: CatalogItem,
    /// The outfit slot it would replace.
    pub slot: Category,
    /// Biased similarity that cleared the threshold.
    pub score: f32,
}

/// Whether a catalog entry loosely duplicates an owned item: color plus
/// sub-category overlap via substring containment either direction.
fn overlaps_owned(catalog_sub: &str, catalog_color: &str, owned_sub: &str, owned_color: &str) -> bool {
    let (cs, os) = (catalog_sub.to_lowercase(), owned_sub.to_lowercase());
    let subs_overlap = !cs.is_empty() && !os.is_empty() && (cs.contains(&os) || os.contains(&cs));
    let colors_overlap = catalog_color.eq_ignore_ascii_case(owned_color);
    subs_overlap && colors_overlap
}

/// Pick at most one catalog item that would improve the outfit's fit to the
/// query.
///
/// For each filled slot, same-category catalog entries are scored by query
/// similarity minus the ownership bias; the best score above the improvement
/// threshold wins.
#[must_use]
pub fn suggest_upgrade(
    outfit: &Outfit,
    query_vec: &Embedding,
    catalog: &Catalog,
    config: &ShoppingConfig,
) -> Option<ShoppingSuggestion> {
    let mut best: Option<ShoppingSuggestion> = None;

    for (slot, owned) in outfit.iter() {
        for entry in catalog.items.iter().filter(|e| e.category == slot) {
            if overlaps_owned(
                &entry.sub_category,
                &entry.primary_color,
                &owned.attributes.sub_category,
                &owned.attributes.primary_color,
            ) {
                continue;
            }
            let Some(embedding) = &entry.embedding else {
                continue;
            };
            let score = query_vec.cosine_similarity(embedding) - config.ownership_bias;
            if score <= config.improvement_threshold {
                continue;
            }
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(ShoppingSuggestion { item: entry.clone(), slot, score });
            }
        }
    }

    if let Some(suggestion) = &best {
        debug!(item = %suggestion.item.id, slot = %suggestion.slot, score = suggestion.score, "upgrade suggested");
    }
    best
}
