//! Pairwise item compatibility.
//!
//! Evaluated at every beam-extension edge, between each item already on the
//! path and the new candidate. Roles (inner/outer, shoe/belt) resolve via
//! category inspection, never argument order, so the function is effectively
//! symmetric.

use crate::ontology::{Category, Formality, StyleIntent, WardrobeItem};

/// Starting score before any adjustment.
const BASE_SCORE: f32 = 0.5;
/// Max contribution from embedding similarity between the two items.
const VISUAL_WEIGHT: f32 = 0.4;
/// Formal next to Lounge is a hard clash.
const HARD_CLASH_PENALTY: f32 = 0.4;
/// Any other formality mismatch.
const SOFT_CLASH_PENALTY: f32 = 0.1;
/// Bulky inner layer under a structurally tight outer.
const BULKY_UNDER_TIGHT_PENALTY: f32 = 0.5;
/// Hoodie under blazer, on top of any bulk penalty.
const HOODIE_UNDER_BLAZER_PENALTY: f32 = 0.3;
/// Belt matching the shoe color in a leather/formal context.
const BELT_MATCH_FORMAL_BONUS: f32 = 0.3;
/// Belt matching the shoe color elsewhere.
const BELT_MATCH_CASUAL_BONUS: f32 = 0.1;
/// Black/brown dress shoe against a differently colored belt.
const BELT_MISMATCH_PENALTY: f32 = 0.5;
/// Casual accessory inside a formal-intent outfit.
const CASUAL_ACCESSORY_PENALTY: f32 = 0.4;

/// Sub-category names that read bulky regardless of declared fit.
const BULKY_SUBS: [&str; 4] = ["shawl cardigan", "chunky knit", "puffer", "fleece"];
/// Outerwear that is structurally tight regardless of declared fit.
const TIGHT_OUTER_SUBS: [&str; 3] = ["blazer", "denim jacket", "biker"];

/// Score how well two items wear together, in roughly \[-0.5, 1.3\].
#[must_use]
pub fn evaluate_pair(a: &WardrobeItem, b: &WardrobeItem, intent: StyleIntent) -> f32 {
    let mut score = BASE_SCORE;

    if let (Some(va), Some(vb)) = (&a.embedding, &b.embedding) {
        score += VISUAL_WEIGHT * va.cosine_similarity(vb);
    }

    score -= formality_clash(a, b);
    score -= layering_penalty(a, b);
    score += accessory_adjustment(a, b, intent);

    score
}

fn formality_clash(a: &WardrobeItem, b: &WardrobeItem) -> f32 {
    match (a.attributes.formality, b.attributes.formality) {
        (Some(fa), Some(fb)) if fa != fb => {
            let hard = matches!(
                (fa, fb),
                (Formality::Formal, Formality::Lounge) | (Formality::Lounge, Formality::Formal)
            );
            if hard { HARD_CLASH_PENALTY } else { SOFT_CLASH_PENALTY }
        }
        _ => 0.0,
    }
}

/// Layering physics, evaluated only for {Top, Outerwear} pairs.
fn layering_penalty(a: &WardrobeItem, b: &WardrobeItem) -> f32 {
    let (inner, outer) = match (a.category, b.category) {
        (Category::Top, Category::Outerwear) => (a, b),
        (Category::Outerwear, Category::Top) => (b, a),
        _ => return 0.0,
    };

    let inner_sub = inner.sub_lower();
    let outer_sub = outer.sub_lower();
    let inner_bulky =
        inner.attributes.fit.is_bulky() || BULKY_SUBS.iter().any(|s| inner_sub.contains(s));
    let outer_tight = outer.attributes.fit.is_structured()
        || TIGHT_OUTER_SUBS.iter().any(|s| outer_sub.contains(s));

    let mut penalty = 0.0;
    if inner_bulky && outer_tight {
        penalty += BULKY_UNDER_TIGHT_PENALTY;
    }
    if inner_sub.contains("hoodie") && outer_sub.contains("blazer") {
        penalty += HOODIE_UNDER_BLAZER_PENALTY;
    }
    penalty
}

/// Belt/shoe matching and formal-intent accessory rules, evaluated only for
/// {Footwear, Accessory} pairs.
fn accessory_adjustment(a: &WardrobeItem, b: &WardrobeItem, intent: StyleIntent) -> f32 {
    let (shoe, accessory) = match (a.category, b.category) {
        (Category::Footwear, Category::Accessory) => (a, b),
        (Category::Accessory, Category::Footwear) => (b, a),
        _ => return 0.0,
    };

    let mut adjustment = 0.0;

    if accessory.sub_lower().contains("belt") {
        let shoe_color = shoe.attributes.color_lower();
        let belt_color = accessory.attributes.color_lower();
        let leather_context = shoe.attributes.material_lower().contains("leather")
            || shoe.attributes.formality == Some(Formality::Formal);

        if !shoe_color.is_empty() && shoe_color == belt_color {
            adjustment += if leather_context { BELT_MATCH_FORMAL_BONUS } else { BELT_MATCH_CASUAL_BONUS };
        } else if leather_context && (shoe_color == "black" || shoe_color == "brown") {
            adjustment -= BELT_MISMATCH_PENALTY;
        }
    }

    if intent == StyleIntent::FormalEvent
        && matches!(accessory.attributes.formality, Some(Formality::Casual | Formality::Lounge))
    {
        adjustment -= CASUAL_ACCESSORY_PENALTY;
    }

    adjustment
}
