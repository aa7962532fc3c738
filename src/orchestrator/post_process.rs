//! Post-run processing utilities.
//!
//! Turns a finished wizard into the serializable result used by JSON mode.

use crate::model::RunResult;
use crate::provider::RecommendationProvider;
use crate::wizard::WizardState;

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

/// Build a `RunResult` from a wizard in the results state.
pub(crate) fn build_run_result(
    provider: &dyn RecommendationProvider,
    state: &WizardState,
) -> Option<RunResult> {
    let recommendations = state.recommendations()?;
    let selection = state.selection()?;
    Some(RunResult {
        generated_at: now_rfc3339(),
        provider: provider.provider_name().to_string(),
        model: provider.model_name().to_string(),
        mood: selection.mood.name.clone(),
        meal_type: selection.meal_type.name.clone(),
        cuisines: selection.cuisines.as_slice().to_vec(),
        recommendations: recommendations.to_vec(),
    })
}
