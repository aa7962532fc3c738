use crate::model::{CuisineSelection, FoodRecommendation, MealTypeOption, Mood};
use serde::Serialize;

pub const VALIDATION_MESSAGE: &str = "Please select a mood and a meal type.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// The three user inputs once both required steps are complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub mood: Mood,
    pub meal_type: MealTypeOption,
    pub cuisines: CuisineSelection,
}

/// Wizard state. Each variant carries only the fields valid for it, so a
/// loading state can never also hold recommendations or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WizardState {
    Empty {
        notice: Option<String>,
    },
    MoodChosen {
        mood: Mood,
        notice: Option<String>,
    },
    MealChosen {
        selection: Selection,
    },
    Loading {
        selection: Selection,
        generation: u64,
    },
    Results {
        selection: Selection,
        recommendations: Vec<FoodRecommendation>,
    },
    Failed {
        selection: Selection,
        message: String,
    },
}

impl Default for WizardState {
    fn default() -> Self {
        WizardState::Empty { notice: None }
    }
}

/// Step labels S0..S5, derived from which fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    Empty,
    MoodChosen,
    MealChosen,
    Loading,
    Results,
    Error,
}

impl WizardState {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        match self {
            WizardState::Empty { .. } => Step::Empty,
            WizardState::MoodChosen { .. } => Step::MoodChosen,
            WizardState::MealChosen { .. } => Step::MealChosen,
            WizardState::Loading { .. } => Step::Loading,
            WizardState::Results { .. } => Step::Results,
            WizardState::Failed { .. } => Step::Error,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            WizardState::Empty { .. } | WizardState::MoodChosen { .. } => None,
            WizardState::MealChosen { selection }
            | WizardState::Loading { selection, .. }
            | WizardState::Results { selection, .. }
            | WizardState::Failed { selection, .. } => Some(selection),
        }
    }

    pub fn selected_mood(&self) -> Option<&Mood> {
        match self {
            WizardState::Empty { .. } => None,
            WizardState::MoodChosen { mood, .. } => Some(mood),
            _ => self.selection().map(|s| &s.mood),
        }
    }

    pub fn selected_meal_type(&self) -> Option<&MealTypeOption> {
        self.selection().map(|s| &s.meal_type)
    }

    pub fn selected_cuisines(&self) -> &[String] {
        self.selection()
            .map(|s| s.cuisines.as_slice())
            .unwrap_or(&[])
    }

    pub fn recommendations(&self) -> Option<&[FoodRecommendation]> {
        match self {
            WizardState::Results {
                recommendations, ..
            } => Some(recommendations),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WizardState::Loading { .. })
    }

    /// Validation notice or provider failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            WizardState::Empty { notice } | WizardState::MoodChosen { notice, .. } => {
                notice.as_deref()
            }
            WizardState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        let in_wizard = !self.is_loading() && self.recommendations().is_none();
        let mood_chosen = self.selected_mood().is_some();
        let meal_chosen = self.selected_meal_type().is_some();
        Visibility {
            mood_step: in_wizard,
            meal_step: in_wizard && mood_chosen,
            cuisine_step: in_wizard && meal_chosen,
            submit: in_wizard && mood_chosen && meal_chosen,
            submit_enabled: !self.is_loading(),
            loading: self.is_loading(),
            error_banner: self.error().is_some(),
            results: self.recommendations().is_some(),
        }
    }
}

/// Which parts of the wizard the presentation layer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub mood_step: bool,
    pub meal_step: bool,
    pub cuisine_step: bool,
    pub submit: bool,
    pub submit_enabled: bool,
    pub loading: bool,
    pub error_banner: bool,
    /// Results panel, including the retry and start-over triggers.
    pub results: bool,
}

/// Read-only view handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSnapshot {
    pub state: WizardState,
    pub step: Step,
    pub visibility: Visibility,
}

impl From<&WizardState> for WizardSnapshot {
    fn from(state: &WizardState) -> Self {
        Self {
            state: state.clone(),
            step: state.step(),
            visibility: state.visibility(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn selection() -> Selection {
        Selection {
            mood: catalog::find_mood("Happy").unwrap(),
            meal_type: catalog::find_meal_type("Dinner").unwrap(),
            cuisines: CuisineSelection::new(),
        }
    }

    #[test]
    fn initial_state_shows_only_mood_step() {
        let v = WizardState::initial().visibility();
        assert!(v.mood_step);
        assert!(!v.meal_step);
        assert!(!v.cuisine_step);
        assert!(!v.submit);
        assert!(!v.results);
        assert!(!v.error_banner);
    }

    #[test]
    fn meal_step_requires_mood() {
        let state = WizardState::MoodChosen {
            mood: catalog::find_mood("Sad").unwrap(),
            notice: None,
        };
        let v = state.visibility();
        assert!(v.meal_step);
        assert!(!v.cuisine_step);
        assert!(!v.submit);
    }

    #[test]
    fn loading_hides_wizard_and_disables_submit() {
        let state = WizardState::Loading {
            selection: selection(),
            generation: 1,
        };
        let v = state.visibility();
        assert!(v.loading);
        assert!(!v.mood_step);
        assert!(!v.submit_enabled);
        assert!(state.error().is_none());
        assert!(state.recommendations().is_none());
    }

    #[test]
    fn failed_keeps_wizard_visible_with_banner() {
        let state = WizardState::Failed {
            selection: selection(),
            message: "rate limited".into(),
        };
        let v = state.visibility();
        assert!(v.mood_step && v.meal_step && v.cuisine_step && v.submit);
        assert!(v.error_banner);
        assert!(!v.results);
        assert_eq!(state.step(), Step::Error);
    }

    #[test]
    fn results_hide_wizard() {
        let state = WizardState::Results {
            selection: selection(),
            recommendations: vec![],
        };
        let v = state.visibility();
        assert!(v.results);
        assert!(!v.mood_step);
        assert!(state.error().is_none());
    }
}
