//! Weather snapshot and override cascade.
//!
//! The planner receives a weather snapshot from an external provider (or a
//! default), and both an explicit override string and keyword cues in the
//! query can force the condition: "what should I wear in the rain" plans for
//! rain regardless of what the provider says.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Condition & snapshot
// ---------------------------------------------------------------------------

/// Coarse sky condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    /// Dry and bright.
    #[default]
    Clear,
    /// Overcast, dry.
    Cloudy,
    /// Precipitating.
    Rainy,
    /// Snowing.
    Snowy,
}

impl WeatherCondition {
    /// Parse a condition from free text via substring cues.
    ///
    /// Trigger lists: rain/drizzle/storm/shower → `Rainy`; snow/sleet/
    /// blizzard → `Snowy`; cloud/overcast → `Cloudy`; clear/sun → `Clear`.
    /// Precipitation cues are checked first so "sunny with showers" plans
    /// for rain.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        const RAIN_CUES: [&str; 4] = ["rain", "drizzle", "storm", "shower"];
        const SNOW_CUES: [&str; 3] = ["snow", "sleet", "blizzard"];
        const CLOUD_CUES: [&str; 2] = ["cloud", "overcast"];
        const CLEAR_CUES: [&str; 2] = ["clear", "sun"];

        if RAIN_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Rainy)
        } else if SNOW_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Snowy)
        } else if CLOUD_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Cloudy)
        } else if CLEAR_CUES.iter().any(|c| lower.contains(c)) {
            Some(Self::Clear)
        } else {
            None
        }
    }

    /// Whether this condition involves precipitation.
    #[must_use]
    pub fn is_precipitating(self) -> bool {
        matches!(self, Self::Rainy | Self::Snowy)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Snowy => "Snowy",
        };
        write!(f, "{s}")
    }
}

/// A point-in-time weather reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Sky condition.
    pub condition: WeatherCondition,
    /// Air temperature in °C.
    pub temperature_c: f32,
    /// Human-readable location label.
    pub location: String,
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self {
            condition: WeatherCondition::Clear,
            temperature_c: 20.0,
            location: "unknown".to_string(),
        }
    }
}

impl WeatherSnapshot {
    /// Apply the override cascade: an explicit manual override wins, else a
    /// keyword cue in the query forces the condition, else the snapshot
    /// stands.
    #[must_use]
    pub fn with_overrides(mut self, manual: Option<&str>, query: &str) -> Self {
        if let Some(condition) = manual.and_then(WeatherCondition::parse) {
            self.condition = condition;
        } else if let Some(condition) = WeatherCondition::parse(query) {
            self.condition = condition;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// Source of the current weather — a live HTTP provider in production, a
/// fixed snapshot in tests.
pub trait WeatherProvider: Send + Sync {
    /// The current reading.
    fn current(&self) -> WeatherSnapshot;
}

/// A provider that always returns one fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticWeather(pub WeatherSnapshot);

impl StaticWeather {
    /// Fix the provider to the given condition and temperature.
    #[must_use]
    pub fn new(condition: WeatherCondition, temperature_c: f32) -> Self {
        Self(WeatherSnapshot {
            condition,
            temperature_c,
            location: "static".to_string(),
        })
    }
}

impl WeatherProvider for StaticWeather {
    fn current(&self) -> WeatherSnapshot {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_precipitation_cues() {
        assert_eq!(WeatherCondition::parse("light drizzle"), Some(WeatherCondition::Rainy));
        assert_eq!(WeatherCondition::parse("heavy SNOW expected"), Some(WeatherCondition::Snowy));
        assert_eq!(WeatherCondition::parse("sunny with showers"), Some(WeatherCondition::Rainy));
    }

    #[test]
    fn parses_dry_cues() {
        assert_eq!(WeatherCondition::parse("overcast all day"), Some(WeatherCondition::Cloudy));
        assert_eq!(WeatherCondition::parse("clear skies"), Some(WeatherCondition::Clear));
        assert_eq!(WeatherCondition::parse("mild"), None);
    }

    #[test]
    fn manual_override_beats_query_cue() {
        let snapshot = WeatherSnapshot::default()
            .with_overrides(Some("snowy"), "outfit for a rainy walk");
        assert_eq!(snapshot.condition, WeatherCondition::Snowy);
    }

    #[test]
    fn query_cue_overrides_snapshot() {
        let snapshot = WeatherSnapshot::default().with_overrides(None, "rainy day errands");
        assert_eq!(snapshot.condition, WeatherCondition::Rainy);
    }

    #[test]
    fn no_cue_keeps_snapshot() {
        let snapshot = WeatherSnapshot::default().with_overrides(None, "dinner date");
        assert_eq!(snapshot.condition, WeatherCondition::Clear);
    }
}
