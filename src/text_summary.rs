//! Text summary builder for CLI output.
//!
//! Formats a finished wizard as human-readable lines for text mode.

use crate::model::FoodRecommendation;
use crate::wizard::WizardState;
use anyhow::{anyhow, Result};

/// Pre-formatted lines for text output.
#[derive(Debug)]
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Format recommendation cards, one numbered block per record.
pub(crate) fn format_cards(recommendations: &[FoodRecommendation]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, rec) in recommendations.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{}. {}", i + 1, rec.name));
        lines.push(format!("   {}", rec.description));
        lines.push(format!("   Why: {}", rec.reason));
    }
    lines
}

/// Build a text summary from a finished wizard.
///
/// Fails with the wizard's error message when the run did not produce results.
pub(crate) fn build_text_summary(state: &WizardState) -> Result<TextSummary> {
    if let Some(err) = state.error() {
        return Err(anyhow!("{err}"));
    }
    let selection = state
        .selection()
        .ok_or_else(|| anyhow!("no selection to summarize"))?;
    let recommendations = state
        .recommendations()
        .ok_or_else(|| anyhow!("no recommendations available"))?;

    let mut lines = Vec::new();
    let mood = &selection.mood;
    lines.push(format!("Mood: {} {}", mood.emoji, mood.name));
    lines.push(format!("Meal: {}", selection.meal_type.name));
    if !selection.cuisines.is_empty() {
        lines.push(format!("Cuisines: {}", selection.cuisines.as_slice().join(", ")));
    }
    lines.push(String::new());

    if recommendations.is_empty() {
        lines.push("No recommendations this time. Try again or change your choices.".into());
    } else {
        lines.push("Your mood-matched recommendations!".into());
        lines.push(String::new());
        lines.extend(format_cards(recommendations));
    }

    Ok(TextSummary { lines })
}
