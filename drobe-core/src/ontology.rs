//! Clothing ontology — categories, attribute vocabulary, outfit templates.
//!
//! Serde string forms match the records emitted by the external tagging
//! pipeline ("Smart Casual", "One-Piece", "All-Season", …), so stored JSON
//! round-trips without a mapping layer.
//!
//! There is exactly one template type: [`OutfitTemplate`] with rich
//! [`SlotSpec`] entries. The older list-of-categories template form is
//! supported only as a constructor ([`OutfitTemplate::from_category_list`])
//! that expands each category into a required min=max=1 slot.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{Embedding, ItemId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Clothing slot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Shirts, t-shirts, knitwear.
    Top,
    /// Trousers, jeans, shorts, skirts.
    Bottom,
    /// Shoes, boots, sandals.
    Footwear,
    /// Jackets, coats, overshirts.
    Outerwear,
    /// Dresses, jumpsuits.
    #[serde(rename = "One-Piece")]
    OnePiece,
    /// Belts, scarves, bags, jewellery.
    Accessory,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
            Self::Footwear => "Footwear",
            Self::Outerwear => "Outerwear",
            Self::OnePiece => "One-Piece",
            Self::Accessory => "Accessory",
        };
        write!(f, "{s}")
    }
}

/// Which layer of an outfit an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayerRole {
    /// Worn against the skin (t-shirt, shirt).
    #[default]
    Base,
    /// Worn over a base layer (cardigan, sweater).
    Mid,
    /// Outermost layer (jacket, coat).
    Outer,
    /// Not part of the layering stack (shoes, accessories).
    None,
}

/// Seasonality tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Hot-weather wear.
    Summer,
    /// Cold-weather wear.
    Winter,
    /// Transitional.
    Spring,
    /// Transitional.
    Fall,
    /// Works year-round.
    #[serde(rename = "All-Season")]
    AllSeason,
}

/// Formality level of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Formality {
    /// Loungewear, sleepwear.
    Lounge,
    /// Everyday casual.
    Casual,
    /// Dressed-up casual.
    #[serde(rename = "Smart Casual")]
    SmartCasual,
    /// Business / event formal.
    Formal,
}

/// How an item fits the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Fit {
    /// Close-cut.
    Slim,
    /// Structured, sharply cut.
    Tailored,
    /// Standard cut.
    #[default]
    Regular,
    /// Roomy but intentional.
    Relaxed,
    /// Deliberately large.
    Oversized,
    /// Unstructured and wide.
    Loose,
}

impl Fit {
    /// Whether this fit reads as bulky when worn under another layer.
    #[must_use]
    pub fn is_bulky(self) -> bool {
        matches!(self, Self::Oversized | Self::Loose)
    }

    /// Whether this fit is structurally tight as an outer layer.
    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Slim | Self::Tailored)
    }
}

/// Declared silhouette volume, used for proportion scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SilhouetteVolume {
    /// Slim silhouette.
    Narrow,
    /// Standard silhouette.
    #[default]
    Regular,
    /// Voluminous silhouette.
    Wide,
}

/// Coarse style/occasion tag driving bias weights during planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleIntent {
    /// Relaxed everyday wear.
    #[serde(rename = "Casual Day")]
    CasualDay,
    /// Polished but unfussy.
    #[serde(rename = "Smart Casual")]
    SmartCasual,
    /// Weddings, interviews, galas.
    #[serde(rename = "Formal Event")]
    FormalEvent,
    /// Statement streetwear.
    Street,
    /// Cold-weather layering.
    #[serde(rename = "Layered Cold")]
    LayeredCold,
    /// At-home comfort.
    Lounge,
}

// ---------------------------------------------------------------------------
// Item attributes & wardrobe item
// ---------------------------------------------------------------------------

/// Structured attribute record for one item, populated by the tagging
/// pipeline.
///
/// Free-form fields (sub-category, colors, material, pattern) stay strings:
/// every symbolic rule over them is a keyword predicate, and the tagging
/// vocabulary is open-ended.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemAttributes {
    /// Fine-grained kind, e.g. "Oxford Shirt", "Chelsea Boots".
    #[serde(default)]
    pub sub_category: String,
    /// Dominant color name.
    #[serde(default)]
    pub primary_color: String,
    /// Optional secondary color name.
    #[serde(default)]
    pub secondary_color: Option<String>,
    /// Surface pattern, e.g. "Solid", "Plaid".
    #[serde(default)]
    pub pattern: String,
    /// Primary material, e.g. "Cotton", "Suede".
    #[serde(default)]
    pub material: String,
    /// One or more seasonality tags.
    #[serde(default)]
    pub seasonality: Vec<Season>,
    /// Formality level, if tagged.
    #[serde(default)]
    pub formality: Option<Formality>,
    /// Cut of the item.
    #[serde(default)]
    pub fit: Fit,
    /// Occasion tags, e.g. "Everyday", "Office".
    #[serde(default)]
    pub occasion: Vec<String>,
    /// Free-form style tags.
    #[serde(default)]
    pub style_tags: Vec<String>,
    /// Layering role.
    #[serde(default)]
    pub layer_role: LayerRole,
    /// Declared silhouette volume.
    #[serde(default)]
    pub silhouette_volume: SilhouetteVolume,
    /// Intrinsic versatility score, roughly \[-0.2, 0.4\].
    #[serde(default)]
    pub pairing_bias: f32,
    /// Length/cut profile, e.g. "Standard", "Cropped".
    #[serde(default)]
    pub length_profile: String,
}

impl ItemAttributes {
    /// Lowercased sub-category for keyword predicates.
    #[must_use]
    pub fn sub_lower(&self) -> String {
        self.sub_category.to_lowercase()
    }

    /// Lowercased material for keyword predicates.
    #[must_use]
    pub fn material_lower(&self) -> String {
        self.material.to_lowercase()
    }

    /// Lowercased primary color for keyword predicates.
    #[must_use]
    pub fn color_lower(&self) -> String {
        self.primary_color.to_lowercase()
    }
}

/// Paths to the item's processed image assets (owned by the upload pipeline,
/// carried through untouched).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetPaths {
    /// Original upload.
    #[serde(default)]
    pub raw: String,
    /// Background-removed image.
    #[serde(default)]
    pub clean: String,
}

/// One digitized clothing item.
///
/// Immutable within a planning session; the planner never mutates items.
/// `embedding` may be absent, in which case the item is excluded from vector
/// search but still visible to category listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardrobeItem {
    /// Stable unique identifier.
    pub id: ItemId,
    /// Clothing slot category.
    pub category: Category,
    /// Structured attribute record.
    pub attributes: ItemAttributes,
    /// FashionCLIP-family embedding, if computed.
    pub embedding: Option<Embedding>,
    /// Image asset paths.
    #[serde(default)]
    pub assets: Option<AssetPaths>,
}

impl WardrobeItem {
    /// Shorthand used all over the scoring engines.
    #[must_use]
    pub fn sub_lower(&self) -> String {
        self.attributes.sub_lower()
    }
}

// ---------------------------------------------------------------------------
// Outfit
// ---------------------------------------------------------------------------

/// A complete (or partial) outfit: one item per filled slot category.
///
/// Backed by a `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Outfit {
    slots: BTreeMap<Category, WardrobeItem>,
}

impl Outfit {
    /// Create an empty outfit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an item to its slot. Returns the previous occupant, if any.
    pub fn insert(&mut self, item: WardrobeItem) -> Option<WardrobeItem> {
        self.slots.insert(item.category, item)
    }

    /// The item in a given slot.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<&WardrobeItem> {
        self.slots.get(&category)
    }

    /// Iterate over (category, item) pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &WardrobeItem)> {
        self.slots.iter().map(|(c, i)| (*c, i))
    }

    /// Iterate over items only.
    pub fn items(&self) -> impl Iterator<Item = &WardrobeItem> {
        self.slots.values()
    }

    /// Number of filled slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the outfit has no filled slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sorted set of item ids — the identity of an outfit for feedback
    /// matching.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<ItemId> {
        self.slots.values().map(|i| i.id.clone()).collect()
    }
}

impl FromIterator<WardrobeItem> for Outfit {
    fn from_iter<T: IntoIterator<Item = WardrobeItem>>(iter: T) -> Self {
        let mut outfit = Self::new();
        for item in iter {
            outfit.insert(item);
        }
        outfit
    }
}

// ---------------------------------------------------------------------------
// Outfit templates
// ---------------------------------------------------------------------------

/// One slot in an outfit template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Which category fills this slot.
    pub category: Category,
    /// Whether planning fails if the slot cannot be filled.
    pub required: bool,
    /// Minimum item count.
    pub min: u8,
    /// Maximum item count.
    pub max: u8,
}

impl SlotSpec {
    /// A required single-item slot.
    #[must_use]
    pub fn required(category: Category) -> Self {
        Self { category, required: true, min: 1, max: 1 }
    }

    /// An optional slot allowing up to `max` items.
    #[must_use]
    pub fn optional(category: Category, max: u8) -> Self {
        Self { category, required: false, min: 0, max }
    }
}

/// A named outfit structure: an intent tag plus an ordered slot list.
///
/// Invariants: at least one required slot; categories unique within the
/// template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitTemplate {
    /// Template name, e.g. "basic", "layered".
    pub name: String,
    /// Style intent driving bias weights.
    pub intent: StyleIntent,
    /// Ordered slot list.
    pub slots: Vec<SlotSpec>,
}

impl OutfitTemplate {
    /// Build a template from the legacy list-of-categories form: every
    /// listed category becomes a required min=max=1 slot.
    #[must_use]
    pub fn from_category_list(
        name: impl Into<String>,
        intent: StyleIntent,
        categories: &[Category],
    ) -> Self {
        Self {
            name: name.into(),
            intent,
            slots: categories.iter().map(|c| SlotSpec::required(*c)).collect(),
        }
    }

}

/// The template table: a small static configuration keyed by name,
/// extensible without touching the search algorithm.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    templates: BTreeMap<String, OutfitTemplate>,
}

impl TemplateTable {
    /// The built-in five-template table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self { templates: BTreeMap::new() };
        for template in builtin_templates() {
            table.insert(template);
        }
        table
    }

    /// Add or replace a template.
    pub fn insert(&mut self, template: OutfitTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Look up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OutfitTemplate> {
        self.templates.get(name)
    }

    /// All template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The built-in outfit templates.
#[must_use]
pub fn builtin_templates() -> Vec<OutfitTemplate> {
    vec![
        OutfitTemplate {
            name: "basic".into(),
            intent: StyleIntent::CasualDay,
            slots: vec![
                SlotSpec::required(Category::Top),
                SlotSpec::required(Category::Bottom),
                SlotSpec::required(Category::Footwear),
                SlotSpec::optional(Category::Accessory, 1),
            ],
        },
        OutfitTemplate {
            name: "smart_casual".into(),
            intent: StyleIntent::SmartCasual,
            slots: vec![
                SlotSpec::required(Category::Top),
                SlotSpec::required(Category::Bottom),
                SlotSpec::optional(Category::Outerwear, 1),
                SlotSpec::required(Category::Footwear),
                SlotSpec::optional(Category::Accessory, 2),
            ],
        },
        OutfitTemplate {
            name: "formal".into(),
            intent: StyleIntent::FormalEvent,
            slots: vec![
                SlotSpec::required(Category::Top),
                SlotSpec::required(Category::Bottom),
                SlotSpec::required(Category::Outerwear),
                SlotSpec::required(Category::Footwear),
                SlotSpec { category: Category::Accessory, required: true, min: 1, max: 2 },
            ],
        },
        OutfitTemplate {
            name: "layered".into(),
            intent: StyleIntent::LayeredCold,
            slots: vec![
                SlotSpec::required(Category::Top),
                SlotSpec { category: Category::Outerwear, required: true, min: 1, max: 2 },
                SlotSpec::required(Category::Bottom),
                SlotSpec::required(Category::Footwear),
                SlotSpec::optional(Category::Accessory, 2),
            ],
        },
        OutfitTemplate {
            name: "one_piece".into(),
            intent: StyleIntent::FormalEvent,
            slots: vec![
                SlotSpec::required(Category::OnePiece),
                SlotSpec::required(Category::Footwear),
                SlotSpec::optional(Category::Accessory, 2),
            ],
        },
    ]
}
