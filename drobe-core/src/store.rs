//! In-memory wardrobe index.
//!
//! The store is an immutable snapshot built once from pre-computed item
//! records (one JSON file per item, as written by the tagging pipeline).
//! It supports category-filtered listing and brute-force cosine search —
//! wardrobes are a few hundred items at most, so an exact scan beats any
//! index structure. Refreshing means building a new store and swapping it
//! in; the planner never mutates one.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DrobeError, Result};
use crate::ontology::{AssetPaths, Category, ItemAttributes, WardrobeItem};
use crate::types::{Candidate, Embedding, ItemId, ScoreKey};

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// On-disk item record: `{ id, meta: { category, ...attributes }, embedding,
/// paths }`.
#[derive(Debug, Deserialize)]
struct ItemRecord {
    id: String,
    meta: MetaRecord,
    #[serde(default)]
    embedding: Vec<f32>,
    #[serde(default)]
    paths: Option<AssetPaths>,
}

#[derive(Debug, Deserialize)]
struct MetaRecord {
    category: Category,
    #[serde(flatten)]
    attributes: ItemAttributes,
}

impl ItemRecord {
    fn into_item(self) -> WardrobeItem {
        let embedding = if self.embedding.is_empty() {
            None
        } else {
            Some(Embedding(self.embedding))
        };
        WardrobeItem {
            id: ItemId(self.id),
            category: self.meta.category,
            attributes: self.meta.attributes,
            embedding,
            assets: self.paths,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Read-only in-memory index of wardrobe items.
#[derive(Debug, Default)]
pub struct WardrobeStore {
    /// Items in insertion order — the stable tie-break for search.
    items: Vec<WardrobeItem>,
    /// Id → index into `items`.
    by_id: HashMap<ItemId, usize>,
}

impl WardrobeStore {
    /// Build a store from already-parsed items.
    ///
    /// Duplicate ids keep the first occurrence and log the rest.
    #[must_use]
    pub fn from_items(items: Vec<WardrobeItem>) -> Self {
        let mut store = Self::default();
        for item in items {
            store.push(item);
        }
        store
    }

    /// Load every `*.json` item record under `dir`.
    ///
    /// Malformed records are logged and skipped — one corrupt file never
    /// aborts the load. Files are read in sorted name order so insertion
    /// order (and therefore search tie-breaking) is deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be read.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut store = Self::default();
        for path in &paths {
            match Self::load_record(path) {
                Ok(item) => store.push(item),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping item record"),
            }
        }
        debug!(
            items = store.items.len(),
            vectors = store.items.iter().filter(|i| i.embedding.is_some()).count(),
            "wardrobe store loaded"
        );
        Ok(store)
    }

    fn load_record(path: &Path) -> Result<WardrobeItem> {
        let content = std::fs::read_to_string(path)?;
        let record: ItemRecord =
            serde_json::from_str(&content).map_err(|e| DrobeError::MalformedItem {
                id: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(record.into_item())
    }

    fn push(&mut self, item: WardrobeItem) {
        if self.by_id.contains_key(&item.id) {
            warn!(id = %item.id, "duplicate item id, keeping first occurrence");
            return;
        }
        self.by_id.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    /// Total item count (with or without embeddings).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&WardrobeItem> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }

    /// All items of one category, in insertion order. Includes items without
    /// embeddings.
    #[must_use]
    pub fn items_by_category(&self, category: Category) -> Vec<&WardrobeItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// All items, in insertion order.
    #[must_use]
    pub fn all_items(&self) -> &[WardrobeItem] {
        &self.items
    }

    /// Top-K cosine similarity search.
    ///
    /// Ranks descending by `cos(query, item)`, optionally filtered to one
    /// category. Items without embeddings are excluded. Ties break by
    /// insertion order (stable sort), so results are deterministic.
    #[must_use]
    pub fn search(
        &self,
        query: &Embedding,
        category: Option<Category>,
        top_k: usize,
    ) -> Vec<Candidate> {
        let mut scored: Vec<Candidate> = self
            .items
            .iter()
            .filter(|item| category.is_none_or(|c| item.category == c))
            .filter_map(|item| {
                let embedding = item.embedding.as_ref()?;
                Some(Candidate {
                    item_id: item.id.clone(),
                    score: query.cosine_similarity(embedding),
                })
            })
            .collect();

        scored.sort_by_key(|c| std::cmp::Reverse(ScoreKey::new(c.score)));
        scored.truncate(top_k);
        scored
    }
}

// ---------------------------------------------------------------------------
// Snapshot handle
// ---------------------------------------------------------------------------

/// Swappable handle to the current store snapshot.
///
/// Planning requests clone the `Arc` and run against a frozen snapshot;
/// a wardrobe refresh builds a new store and swaps it in atomically. No
/// request ever observes a half-updated index.
#[derive(Default)]
pub struct SharedStore {
    current: RwLock<Arc<WardrobeStore>>,
}

impl SharedStore {
    /// Wrap an initial snapshot.
    #[must_use]
    pub fn new(store: WardrobeStore) -> Self {
        Self { current: RwLock::new(Arc::new(store)) }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WardrobeStore> {
        Arc::clone(&self.current.read())
    }

    /// Replace the snapshot. In-flight requests keep their old `Arc`.
    pub fn replace(&self, store: WardrobeStore) {
        *self.current.write() = Arc::new(store);
    }
}
