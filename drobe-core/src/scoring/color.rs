//! Color grouping predicates shared by the fallback planner, the pairwise
//! engine, and confidence scoring.

/// Colors that pair with anything.
pub const NEUTRAL_COLORS: [&str; 9] =
    ["black", "white", "grey", "gray", "beige", "brown", "navy", "khaki", "cream"];

/// Warm-family colors, for clash detection against the cool family.
pub const WARM_COLORS: [&str; 7] =
    ["red", "orange", "yellow", "burgundy", "rust", "tan", "mustard"];

/// Cool-family colors.
pub const COOL_COLORS: [&str; 5] = ["blue", "green", "teal", "purple", "olive"];

/// Whether a color name reads as neutral. Substring match, so "Off-White"
/// and "Dark Grey" both qualify.
#[must_use]
pub fn is_neutral(color: &str) -> bool {
    let lower = color.to_lowercase();
    NEUTRAL_COLORS.iter().any(|n| lower.contains(n))
}

/// Whether a color is in the warm family.
#[must_use]
pub fn is_warm(color: &str) -> bool {
    let lower = color.to_lowercase();
    WARM_COLORS.iter().any(|w| lower.contains(w))
}

/// Whether a color is in the cool family.
#[must_use]
pub fn is_cool(color: &str) -> bool {
    let lower = color.to_lowercase();
    COOL_COLORS.iter().any(|c| lower.contains(c))
}

/// Crude two-color harmony score, no HSV math.
///
/// Both neutral → 0.8, one neutral → 0.6, same color → 0.7, otherwise 0.3.
#[must_use]
pub fn simple_color_score(color_a: &str, color_b: &str) -> f32 {
    let a_neutral = is_neutral(color_a);
    let b_neutral = is_neutral(color_b);
    if a_neutral && b_neutral {
        0.8
    } else if a_neutral || b_neutral {
        0.6
    } else if color_a.eq_ignore_ascii_case(color_b) {
        0.7
    } else {
        0.3
    }
}
