//! Rule-based fallback planner.
//!
//! Used when the encoder is unavailable: no embeddings, no beam — just
//! formality sorting and crude color matching over the category listings.
//! The weather gate still applies; degrading to rules never readmits unsafe
//! items.

use tracing::info;

use crate::config::PlannerConfig;
use crate::ontology::{Category, Formality, Outfit, OutfitTemplate, WardrobeItem};
use crate::scoring::color::{is_neutral, simple_color_score};
use crate::scoring::safety::is_weather_safe;
use crate::store::WardrobeStore;
use crate::weather::WeatherSnapshot;

/// Plan an outfit without embeddings.
///
/// Per slot: the anchoring Top (or One-Piece) is the most formal available
/// item; Bottoms and Outerwear pick the best crude color match against the
/// anchor; Footwear and Accessories prefer neutral colors. Returns `None`
/// when a required slot cannot be filled.
#[must_use]
pub fn plan_rule_based(
    store: &WardrobeStore,
    template: &OutfitTemplate,
    weather: &WeatherSnapshot,
    config: &PlannerConfig,
) -> Option<Outfit> {
    info!(template = %template.name, "planning via rule-based fallback");
    let mut outfit = Outfit::new();
    let mut anchor_color: Option<String> = None;

    for spec in &template.slots {
        let candidates: Vec<&WardrobeItem> = store
            .items_by_category(spec.category)
            .into_iter()
            .filter(|i| is_weather_safe(i, weather, &config.safety))
            .collect();

        let chosen = match spec.category {
            Category::Top | Category::OnePiece => pick_most_formal(&candidates),
            Category::Bottom | Category::Outerwear => {
                pick_color_match(&candidates, anchor_color.as_deref())
            }
            Category::Footwear | Category::Accessory => pick_neutral(&candidates),
        };

        match chosen {
            Some(item) => {
                if matches!(spec.category, Category::Top | Category::OnePiece) {
                    anchor_color = Some(item.attributes.primary_color.clone());
                }
                outfit.insert(item.clone());
            }
            None if spec.required => return None,
            None => {}
        }
    }

    Some(outfit)
}

fn formality_rank(item: &WardrobeItem) -> u8 {
    match item.attributes.formality {
        Some(Formality::Formal) => 3,
        Some(Formality::SmartCasual) => 2,
        Some(Formality::Casual) | None => 1,
        Some(Formality::Lounge) => 0,
    }
}

fn pick_most_formal<'a>(candidates: &[&'a WardrobeItem]) -> Option<&'a WardrobeItem> {
    candidates.iter().copied().max_by_key(|i| formality_rank(i))
}

fn pick_color_match<'a>(
    candidates: &[&'a WardrobeItem],
    anchor_color: Option<&str>,
) -> Option<&'a WardrobeItem> {
    let Some(anchor) = anchor_color else {
        return candidates.first().copied();
    };
    candidates
        .iter()
        .copied()
        .map(|i| (i, simple_color_score(anchor, &i.attributes.primary_color)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

fn pick_neutral<'a>(candidates: &[&'a WardrobeItem]) -> Option<&'a WardrobeItem> {
    candidates
        .iter()
        .copied()
        .find(|i| is_neutral(&i.attributes.primary_color))
        .or_else(|| candidates.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{ItemAttributes, SlotSpec, StyleIntent};
    use crate::types::ItemId;
    use crate::weather::{WeatherCondition, WeatherSnapshot};

    fn item(id: &str, category: Category, sub: &str, color: &str, formality: Option<Formality>) -> WardrobeItem {
        WardrobeItem {
            id: ItemId::from(id),
            category,
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

    fn basic_template() -> OutfitTemplate {
        OutfitTemplate {
            name: "basic".into(),
            intent: StyleIntent::CasualDay,
            slots: vec![
                SlotSpec::required(Category::Top),
                SlotSpec::required(Category::Bottom),
                SlotSpec::required(Category::Footwear),
            ],
        }
    }

    fn clear() -> WeatherSnapshot {
        WeatherSnapshot {
            condition: WeatherCondition::Clear,
            temperature_c: 18.0,
            location: "test".into(),
        }
    }

    #[test]
    fn picks_most_formal_top_and_matching_bottom() {
        let store = WardrobeStore::from_items(vec![
            item("tee", Category::Top, "Tee", "White", Some(Formality::Casual)),
            item("oxford", Category::Top, "Oxford Shirt", "Navy", Some(Formality::SmartCasual)),
            item("red-pants", Category::Bottom, "Trousers", "Red", Some(Formality::Casual)),
            item("chinos", Category::Bottom, "Chinos", "Beige", Some(Formality::Casual)),
            item("sneakers", Category::Footwear, "Sneakers", "White", Some(Formality::Casual)),
        ]);
        let outfit =
            plan_rule_based(&store, &basic_template(), &clear(), &PlannerConfig::default()).expect("plan");
        assert_eq!(outfit.get(Category::Top).unwrap().id.as_str(), "oxford");
        // Navy top + beige chinos (both neutral) beats navy + red.
        assert_eq!(outfit.get(Category::Bottom).unwrap().id.as_str(), "chinos");
    }

    #[test]
    fn prefers_neutral_footwear() {
        let store = WardrobeStore::from_items(vec![
            item("top", Category::Top, "Tee", "White", None),
            item("bottom", Category::Bottom, "Jeans", "Blue", None),
            item("red-shoes", Category::Footwear, "Sneakers", "Red", None),
            item("black-shoes", Category::Footwear, "Derbies", "Black", None),
        ]);
        let outfit =
            plan_rule_based(&store, &basic_template(), &clear(), &PlannerConfig::default()).expect("plan");
        assert_eq!(outfit.get(Category::Footwear).unwrap().id.as_str(), "black-shoes");
    }

    #[test]
    fn weather_gate_still_applies() {
        let store = WardrobeStore::from_items(vec![
            item("top", Category::Top, "Tee", "White", None),
            item("bottom", Category::Bottom, "Jeans", "Blue", None),
            item("sandals", Category::Footwear, "Sandals", "Brown", None),
        ]);
        let rainy = WeatherSnapshot {
            condition: WeatherCondition::Rainy,
            temperature_c: 12.0,
            location: "test".into(),
        };
        // Sandals are the only footwear and they are rain-unsafe: no outfit.
        assert!(plan_rule_based(&store, &basic_template(), &rainy, &PlannerConfig::default()).is_none());
    }

    #[test]
    fn optional_slot_missing_is_fine() {
        let mut template = basic_template();
        template.slots.push(SlotSpec::optional(Category::Accessory, 1));
        let store = WardrobeStore::from_items(vec![
            item("top", Category::Top, "Tee", "White", None),
            item("bottom", Category::Bottom, "Jeans", "Blue", None),
            item("shoes", Category::Footwear, "Sneakers", "Black", None),
        ]);
        let outfit =
            plan_rule_based(&store, &template, &clear(), &PlannerConfig::default()).expect("plan");
        assert_eq!(outfit.len(), 3);
    }
}
