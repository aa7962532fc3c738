//! Static option catalogs for the three wizard steps.

use crate::model::{CuisineOption, MealTypeOption, Mood, Tint};

const MOODS: &[(&str, &str, Tint)] = &[
    ("Happy", "😄", Tint::Yellow),
    ("Stressed", "😫", Tint::Red),
    ("Comforting", "🤗", Tint::Blue),
    ("Adventurous", "🤠", Tint::Green),
    ("Energetic", "⚡️", Tint::Orange),
    ("Relaxed", "😌", Tint::Purple),
    ("Sad", "😢", Tint::Gray),
];

const MEAL_TYPES: &[(&str, &str)] = &[
    ("Breakfast", "🥞"),
    ("Lunch", "🥗"),
    ("Dinner", "🍝"),
    ("Snack", "🥨"),
    ("Dessert", "🍰"),
];

const CUISINE_TYPES: &[&str] = &[
    "Western",
    "Asian",
    "Italian",
    "Mexican",
    "Indian",
    "Spicy",
    "Sweet",
    "Savory",
    "Comfort Food",
    "Healthy",
];

pub fn moods() -> Vec<Mood> {
    MOODS
        .iter()
        .map(|(name, emoji, tint)| Mood::new(name, emoji, *tint))
        .collect()
}

pub fn meal_types() -> Vec<MealTypeOption> {
    MEAL_TYPES
        .iter()
        .map(|(name, emoji)| MealTypeOption::new(name, Some(emoji)))
        .collect()
}

pub fn cuisines() -> Vec<CuisineOption> {
    CUISINE_TYPES
        .iter()
        .map(|name| CuisineOption {
            name: name.to_string(),
        })
        .collect()
}

/// Look up a mood by name, ignoring case.
pub fn find_mood(name: &str) -> Option<Mood> {
    moods()
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
}

/// Look up a meal type by name, ignoring case.
pub fn find_meal_type(name: &str) -> Option<MealTypeOption> {
    meal_types()
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
}

/// Resolve a cuisine name to its canonical spelling, ignoring case.
pub fn find_cuisine(name: &str) -> Option<String> {
    CUISINE_TYPES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(name.trim()))
        .map(|c| c.to_string())
}
