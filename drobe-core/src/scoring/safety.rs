//! Hard weather/material safety gate.
//!
//! Applied during candidate filtering, before re-ranking: an unsafe item
//! never enters the beam. Distinct from the softer season axis of the
//! consistency engine, which scores whole outfits.

use crate::config::SafetyConfig;
use crate::ontology::{Category, WardrobeItem};
use crate::weather::WeatherSnapshot;

/// Open footwear that has no business in rain.
const RAIN_UNSAFE_FOOTWEAR: [&str; 5] = ["sandal", "slide", "flip-flop", "flip flop", "espadrille"];

/// Fabrics ruined or soaked through by precipitation.
const RAIN_UNSAFE_MATERIALS: [&str; 6] = ["suede", "silk", "satin", "velvet", "canvas", "mesh"];

/// Items that overheat above the hot cutoff.
const HOT_WEATHER_BANS: [&str; 6] = ["glove", "scarf", "beanie", "puffer", "wool coat", "parka"];

/// Exposed-skin items that underdress below the cold cutoff.
const COLD_WEATHER_BANS: [&str; 6] = ["shorts", "sandal", "linen", "tank", "flip flop", "slide"];

/// Whether an item may be worn at all under the given weather.
///
/// Trigger lists:
/// - rainy → no sandal/slide/flip-flop/espadrille footwear;
/// - rain or snow → no suede/silk/satin/velvet/canvas/mesh, and no white
///   footwear;
/// - above the hot cutoff → no glove/scarf/beanie/puffer/wool coat/parka;
/// - below the cold cutoff → no shorts/sandal/linen/tank.
#[must_use]
pub fn is_weather_safe(item: &WardrobeItem, weather: &WeatherSnapshot, config: &SafetyConfig) -> bool {
    let sub = item.sub_lower();
    let material = item.attributes.material_lower();

    if weather.condition.is_precipitating() {
        if item.category == Category::Footwear
            && (RAIN_UNSAFE_FOOTWEAR.iter().any(|f| sub.contains(f))
                || item.attributes.primary_color.eq_ignore_ascii_case("white"))
        {
            return false;
        }
        if RAIN_UNSAFE_MATERIALS.iter().any(|m| material.contains(m)) {
            return false;
        }
    }

    if weather.temperature_c > config.hot_cutoff_c
        && HOT_WEATHER_BANS.iter().any(|b| sub.contains(b))
    {
        return false;
    }

    if weather.temperature_c < config.cold_cutoff_c
        && COLD_WEATHER_BANS.iter().any(|b| sub.contains(b))
    {
        return false;
    }

    true
}

/// Gate applied at outfit level: every item must pass individually.
#[must_use]
pub fn all_weather_safe(
    items: &[&WardrobeItem],
    weather: &WeatherSnapshot,
    config: &SafetyConfig,
) -> bool {
    items.iter().all(|item| is_weather_safe(item, weather, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::ItemAttributes;
    use crate::types::ItemId;
    use crate::weather::{WeatherCondition, WeatherSnapshot};

    fn item(category: Category, sub: &str, material: &str, color: &str) -> WardrobeItem {
        WardrobeItem {
            id: ItemId::from(sub),
            category,
            attributes: ItemAttributes {
                sub_category: sub.to_string(),
                material: material.to_string(),
                primary_color: color.to_string(),
                ..ItemAttributes::default()
            },
            embedding: None,
            assets: None,
        }
    }

    fn weather(condition: WeatherCondition, temp: f32) -> WeatherSnapshot {
        WeatherSnapshot { condition, temperature_c: temp, location: "test".into() }
    }

    #[test]
    fn sandals_rejected_in_rain() {
        let sandals = item(Category::Footwear, "Leather Sandals", "Leather", "Black");
        let config = SafetyConfig::default();
        assert!(!is_weather_safe(&sandals, &weather(WeatherCondition::Rainy, 20.0), &config));
        assert!(is_weather_safe(&sandals, &weather(WeatherCondition::Clear, 20.0), &config));
    }

    #[test]
    fn suede_rejected_under_snow() {
        let boots = item(Category::Footwear, "Chukka Boots", "Suede", "Tan");
        let config = SafetyConfig::default();
        assert!(!is_weather_safe(&boots, &weather(WeatherCondition::Snowy, 0.0), &config));
        assert!(is_weather_safe(&boots, &weather(WeatherCondition::Cloudy, 0.0), &config));
    }

    #[test]
    fn white_footwear_rejected_in_rain_only() {
        let sneakers = item(Category::Footwear, "Sneakers", "Leather", "White");
        let config = SafetyConfig::default();
        assert!(!is_weather_safe(&sneakers, &weather(WeatherCondition::Rainy, 20.0), &config));
        assert!(is_weather_safe(&sneakers, &weather(WeatherCondition::Clear, 20.0), &config));
        // White tops are fine in rain; the rule is footwear-only.
        let tee = item(Category::Top, "T-Shirt", "Cotton", "White");
        assert!(is_weather_safe(&tee, &weather(WeatherCondition::Rainy, 20.0), &config));
    }

    #[test]
    fn winter_items_rejected_when_hot() {
        let config = SafetyConfig::default();
        let hot = weather(WeatherCondition::Clear, 30.0);
        for sub in ["Puffer Jacket", "Wool Coat", "Beanie", "Parka"] {
            let i = item(Category::Outerwear, sub, "Wool", "Black");
            assert!(!is_weather_safe(&i, &hot, &config), "{sub} should be rejected at 30°C");
        }
        let mild = weather(WeatherCondition::Clear, 12.0);
        let coat = item(Category::Outerwear, "Wool Coat", "Wool", "Black");
        assert!(is_weather_safe(&coat, &mild, &config));
    }

    #[test]
    fn summer_items_rejected_when_cold() {
        let config = SafetyConfig::default();
        let cold = weather(WeatherCondition::Clear, 5.0);
        for sub in ["Chino Shorts", "Linen Shirt", "Tank Top", "Sandals"] {
            let i = item(Category::Top, sub, "Cotton", "Blue");
            assert!(!is_weather_safe(&i, &cold, &config), "{sub} should be rejected at 5°C");
        }
    }

    #[test]
    fn outfit_gate_requires_every_item_safe() {
        let config = SafetyConfig::default();
        let shirt = item(Category::Top, "Oxford Shirt", "Cotton", "Navy");
        let sandals = item(Category::Footwear, "Sandals", "Leather", "Black");
        let rainy = weather(WeatherCondition::Rainy, 15.0);
        assert!(all_weather_safe(&[&shirt], &rainy, &config));
        assert!(!all_weather_safe(&[&shirt, &sandals], &rainy, &config));
    }
}
