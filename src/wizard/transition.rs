use super::state::{Selection, WizardState, UNKNOWN_ERROR_MESSAGE, VALIDATION_MESSAGE};
use crate::model::{CuisineSelection, FoodRecommendation, MealTypeOption, Mood, RecommendationRequest};
use crate::provider::ProviderError;

/// User actions plus the provider resolution that closes a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectMood(Mood),
    SelectMealType(MealTypeOption),
    ToggleCuisine(String),
    Submit,
    StartOver,
    Resolved {
        generation: u64,
        outcome: Result<Vec<FoodRecommendation>, ProviderError>,
    },
}

/// Side effect requested by a transition; the caller performs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(RecommendationRequest),
    DiscardedStale { generation: u64 },
}

/// Wizard state plus the request generation counter.
///
/// The counter survives `StartOver` so a resolution from a call dispatched
/// before the reset can never match a later request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wizard {
    state: WizardState,
    generation: u64,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply `action` in place and return the effect to perform, if any.
    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let (next, effect) = transition(std::mem::take(self), action);
        *self = next;
        effect
    }
}

/// Pure transition function: (wizard, action) -> (wizard, effect).
pub fn transition(wizard: Wizard, action: Action) -> (Wizard, Option<Effect>) {
    let Wizard { state, generation } = wizard;
    match action {
        Action::SelectMood(mood) => (
            Wizard {
                state: select_mood(state, mood),
                generation,
            },
            None,
        ),
        Action::SelectMealType(meal_type) => (
            Wizard {
                state: select_meal_type(state, meal_type),
                generation,
            },
            None,
        ),
        Action::ToggleCuisine(name) => (
            Wizard {
                state: toggle_cuisine(state, &name),
                generation,
            },
            None,
        ),
        Action::Submit => submit(state, generation),
        Action::StartOver => {
            tracing::debug!("start over");
            (
                Wizard {
                    state: WizardState::initial(),
                    generation,
                },
                None,
            )
        }
        Action::Resolved {
            generation: resolved,
            outcome,
        } => resolve(state, generation, resolved, outcome),
    }
}

fn select_mood(state: WizardState, mood: Mood) -> WizardState {
    match state {
        WizardState::Empty { .. } | WizardState::MoodChosen { .. } => {
            tracing::debug!(mood = %mood.name, "mood selected");
            WizardState::MoodChosen { mood, notice: None }
        }
        WizardState::MealChosen { selection } => {
            tracing::debug!(mood = %mood.name, "mood replaced");
            WizardState::MealChosen {
                selection: Selection { mood, ..selection },
            }
        }
        WizardState::Failed { selection, message } => {
            tracing::debug!(mood = %mood.name, "mood replaced");
            WizardState::Failed {
                selection: Selection { mood, ..selection },
                message,
            }
        }
        other => ignored(other, "select_mood"),
    }
}

fn select_meal_type(state: WizardState, meal_type: MealTypeOption) -> WizardState {
    match state {
        WizardState::MoodChosen { mood, .. } => {
            tracing::debug!(meal_type = %meal_type.name, "meal type selected");
            WizardState::MealChosen {
                selection: Selection {
                    mood,
                    meal_type,
                    cuisines: CuisineSelection::new(),
                },
            }
        }
        WizardState::MealChosen { selection } => {
            tracing::debug!(meal_type = %meal_type.name, "meal type replaced");
            WizardState::MealChosen {
                selection: Selection {
                    meal_type,
                    ..selection
                },
            }
        }
        WizardState::Failed { selection, message } => {
            tracing::debug!(meal_type = %meal_type.name, "meal type replaced");
            WizardState::Failed {
                selection: Selection {
                    meal_type,
                    ..selection
                },
                message,
            }
        }
        other => ignored(other, "select_meal_type"),
    }
}

fn toggle_cuisine(state: WizardState, name: &str) -> WizardState {
    match state {
        WizardState::MealChosen { mut selection } => {
            selection.cuisines.toggle(name);
            tracing::debug!(cuisine = name, selected = selection.cuisines.contains(name), "cuisine toggled");
            WizardState::MealChosen { selection }
        }
        // The failure message stays up until the next submit.
        WizardState::Failed {
            mut selection,
            message,
        } => {
            selection.cuisines.toggle(name);
            tracing::debug!(cuisine = name, selected = selection.cuisines.contains(name), "cuisine toggled");
            WizardState::Failed { selection, message }
        }
        other => ignored(other, "toggle_cuisine"),
    }
}

fn submit(state: WizardState, generation: u64) -> (Wizard, Option<Effect>) {
    match state {
        WizardState::Empty { .. } => {
            tracing::debug!("submit without mood or meal type");
            (
                Wizard {
                    state: WizardState::Empty {
                        notice: Some(VALIDATION_MESSAGE.to_string()),
                    },
                    generation,
                },
                None,
            )
        }
        WizardState::MoodChosen { mood, .. } => {
            tracing::debug!("submit without meal type");
            (
                Wizard {
                    state: WizardState::MoodChosen {
                        mood,
                        notice: Some(VALIDATION_MESSAGE.to_string()),
                    },
                    generation,
                },
                None,
            )
        }
        WizardState::MealChosen { selection }
        | WizardState::Results { selection, .. }
        | WizardState::Failed { selection, .. } => {
            let generation = generation + 1;
            let request = RecommendationRequest {
                generation,
                mood: selection.mood.name.clone(),
                meal_type: selection.meal_type.name.clone(),
                cuisines: selection.cuisines.as_slice().to_vec(),
            };
            tracing::info!(
                generation,
                mood = %request.mood,
                meal_type = %request.meal_type,
                cuisines = ?request.cuisines,
                "dispatching recommendation request"
            );
            (
                Wizard {
                    state: WizardState::Loading {
                        selection,
                        generation,
                    },
                    generation,
                },
                Some(Effect::Fetch(request)),
            )
        }
        loading @ WizardState::Loading { .. } => (
            Wizard {
                state: ignored(loading, "submit"),
                generation,
            },
            None,
        ),
    }
}

fn resolve(
    state: WizardState,
    current: u64,
    resolved: u64,
    outcome: Result<Vec<FoodRecommendation>, ProviderError>,
) -> (Wizard, Option<Effect>) {
    match state {
        WizardState::Loading {
            selection,
            generation,
        } if generation == resolved => {
            let state = match outcome {
                Ok(recommendations) => {
                    tracing::info!(generation, count = recommendations.len(), "recommendations received");
                    WizardState::Results {
                        selection,
                        recommendations,
                    }
                }
                Err(err) => {
                    tracing::warn!(generation, error = %err, "recommendation request failed");
                    WizardState::Failed {
                        selection,
                        message: err
                            .user_message()
                            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
                    }
                }
            };
            (
                Wizard {
                    state,
                    generation: current,
                },
                None,
            )
        }
        other => {
            tracing::warn!(generation = resolved, current, "discarding stale resolution");
            (
                Wizard {
                    state: other,
                    generation: current,
                },
                Some(Effect::DiscardedStale {
                    generation: resolved,
                }),
            )
        }
    }
}

fn ignored(state: WizardState, action: &'static str) -> WizardState {
    tracing::debug!(action, step = ?state.step(), "action not available in this step");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::wizard::state::Step;

    fn mood(name: &str) -> Mood {
        catalog::find_mood(name).unwrap()
    }

    fn meal(name: &str) -> MealTypeOption {
        catalog::find_meal_type(name).unwrap()
    }

    fn rec(name: &str) -> FoodRecommendation {
        FoodRecommendation {
            name: name.into(),
            description: format!("{name} description"),
            reason: format!("{name} reason"),
        }
    }

    fn ready() -> Wizard {
        let mut w = Wizard::new();
        w.dispatch(Action::SelectMood(mood("Happy")));
        w.dispatch(Action::SelectMealType(meal("Dinner")));
        w
    }

    fn fetch_generation(effect: Option<Effect>) -> u64 {
        match effect {
            Some(Effect::Fetch(req)) => req.generation,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn only_latest_mood_is_kept() {
        let mut w = Wizard::new();
        for name in ["Happy", "Sad", "Relaxed", "Stressed"] {
            w.dispatch(Action::SelectMood(mood(name)));
        }
        assert_eq!(w.state().selected_mood().unwrap().name, "Stressed");
        assert_eq!(w.state().step(), Step::MoodChosen);

        w.dispatch(Action::SelectMealType(meal("Lunch")));
        w.dispatch(Action::SelectMood(mood("Energetic")));
        assert_eq!(w.state().selected_mood().unwrap().name, "Energetic");
        assert_eq!(w.state().selected_meal_type().unwrap().name, "Lunch");
    }

    #[test]
    fn toggle_cuisine_is_its_own_inverse() {
        let mut w = ready();
        w.dispatch(Action::ToggleCuisine("Asian".into()));
        let before = w.state().clone();
        w.dispatch(Action::ToggleCuisine("Mexican".into()));
        w.dispatch(Action::ToggleCuisine("Mexican".into()));
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn toggle_before_meal_type_is_ignored() {
        let mut w = Wizard::new();
        w.dispatch(Action::SelectMood(mood("Happy")));
        w.dispatch(Action::ToggleCuisine("Italian".into()));
        assert!(w.state().selected_cuisines().is_empty());
        assert_eq!(w.state().step(), Step::MoodChosen);
    }

    #[test]
    fn happy_dinner_scenario_dispatches_in_order() {
        let mut w = ready();
        w.dispatch(Action::ToggleCuisine("Italian".into()));
        w.dispatch(Action::ToggleCuisine("Spicy".into()));
        assert_eq!(
            w.state().selected_cuisines(),
            &["Italian".to_string(), "Spicy".to_string()]
        );

        let effect = w.dispatch(Action::Submit);
        assert_eq!(
            effect,
            Some(Effect::Fetch(RecommendationRequest {
                generation: 1,
                mood: "Happy".into(),
                meal_type: "Dinner".into(),
                cuisines: vec!["Italian".into(), "Spicy".into()],
            }))
        );
        assert!(w.state().is_loading());
        assert!(w.state().error().is_none());
        assert!(w.state().recommendations().is_none());
    }

    #[test]
    fn submit_without_selection_sets_validation_error() {
        let mut w = Wizard::new();
        assert_eq!(w.dispatch(Action::Submit), None);
        assert_eq!(w.state().error(), Some(VALIDATION_MESSAGE));
        assert!(w.state().recommendations().is_none());

        let mut w = Wizard::new();
        w.dispatch(Action::SelectMood(mood("Sad")));
        assert_eq!(w.dispatch(Action::Submit), None);
        assert_eq!(w.state().error(), Some("Please select a mood and a meal type."));
        assert_eq!(w.state().selected_mood().unwrap().name, "Sad");
        assert_eq!(w.generation(), 0);
    }

    #[test]
    fn submit_while_loading_is_rejected() {
        let mut w = ready();
        let first = fetch_generation(w.dispatch(Action::Submit));
        assert_eq!(w.dispatch(Action::Submit), None);
        assert_eq!(w.generation(), first);
        assert!(w.state().is_loading());
    }

    #[test]
    fn success_clears_error_and_loading() {
        let mut w = ready();
        let generation = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::Resolved {
            generation,
            outcome: Err(ProviderError::Request("boom".into())),
        });
        assert_eq!(w.state().error(), Some("boom"));

        let generation = fetch_generation(w.dispatch(Action::Submit));
        assert!(w.state().error().is_none());
        w.dispatch(Action::Resolved {
            generation,
            outcome: Ok(vec![rec("Ramen"), rec("Tacos")]),
        });
        assert_eq!(w.state().step(), Step::Results);
        assert!(w.state().error().is_none());
        assert!(!w.state().is_loading());
        let names: Vec<_> = w
            .state()
            .recommendations()
            .unwrap()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["Ramen", "Tacos"]);
    }

    #[test]
    fn descriptive_failure_is_shown_verbatim() {
        let mut w = ready();
        let generation = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::Resolved {
            generation,
            outcome: Err(ProviderError::Request("rate limited".into())),
        });
        assert_eq!(w.state().error(), Some("rate limited"));
        assert!(w.state().recommendations().is_none());
        assert!(!w.state().is_loading());
    }

    #[test]
    fn non_descriptive_failure_uses_fallback() {
        let mut w = ready();
        let generation = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::Resolved {
            generation,
            outcome: Err(ProviderError::Unspecified),
        });
        assert_eq!(w.state().error(), Some(UNKNOWN_ERROR_MESSAGE));

        let generation = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::Resolved {
            generation,
            outcome: Err(ProviderError::Request("   ".into())),
        });
        assert_eq!(w.state().error(), Some("An unknown error occurred."));
    }

    #[test]
    fn retry_from_results_matches_first_submit() {
        let mut w = ready();
        w.dispatch(Action::ToggleCuisine("Healthy".into()));
        let first = match w.dispatch(Action::Submit) {
            Some(Effect::Fetch(req)) => req,
            other => panic!("expected fetch, got {other:?}"),
        };
        w.dispatch(Action::Resolved {
            generation: first.generation,
            outcome: Ok(vec![rec("Salad")]),
        });
        let retry = match w.dispatch(Action::Submit) {
            Some(Effect::Fetch(req)) => req,
            other => panic!("expected fetch, got {other:?}"),
        };
        assert_eq!(retry.generation, first.generation + 1);
        assert_eq!(
            (retry.mood, retry.meal_type, retry.cuisines),
            (first.mood, first.meal_type, first.cuisines)
        );
        assert!(w.state().recommendations().is_none());
    }

    #[test]
    fn selection_is_locked_while_results_are_shown() {
        let mut w = ready();
        let generation = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::Resolved {
            generation,
            outcome: Ok(vec![rec("Pancakes")]),
        });
        let before = w.state().clone();
        w.dispatch(Action::SelectMood(mood("Sad")));
        w.dispatch(Action::ToggleCuisine("Sweet".into()));
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn editing_after_failure_keeps_message_until_submit() {
        let mut w = ready();
        let generation = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::Resolved {
            generation,
            outcome: Err(ProviderError::Request("nope".into())),
        });
        w.dispatch(Action::ToggleCuisine("Indian".into()));
        w.dispatch(Action::SelectMood(mood("Sad")));
        w.dispatch(Action::SelectMealType(meal("Lunch")));
        assert_eq!(w.state().step(), Step::Error);
        assert_eq!(w.state().error(), Some("nope"));
        assert_eq!(w.state().selected_cuisines(), &["Indian".to_string()]);
        assert_eq!(w.state().selected_mood().unwrap().name, "Sad");
        assert_eq!(w.state().selected_meal_type().unwrap().name, "Lunch");

        let req = match w.dispatch(Action::Submit) {
            Some(Effect::Fetch(req)) => req,
            other => panic!("expected fetch, got {other:?}"),
        };
        assert_eq!((req.mood.as_str(), req.meal_type.as_str()), ("Sad", "Lunch"));
        assert!(w.state().error().is_none());
    }

    #[test]
    fn start_over_from_every_state_yields_initial() {
        let mut states = Vec::new();

        let mut w = Wizard::new();
        w.dispatch(Action::Submit);
        states.push(w.clone());

        let mut w = Wizard::new();
        w.dispatch(Action::SelectMood(mood("Happy")));
        states.push(w.clone());

        let mut w = ready();
        w.dispatch(Action::ToggleCuisine("Sweet".into()));
        states.push(w.clone());

        w.dispatch(Action::Submit);
        states.push(w.clone());

        let mut done = w.clone();
        done.dispatch(Action::Resolved {
            generation: w.generation(),
            outcome: Ok(vec![rec("Churros")]),
        });
        states.push(done);

        let mut failed = w.clone();
        failed.dispatch(Action::Resolved {
            generation: w.generation(),
            outcome: Err(ProviderError::Unspecified),
        });
        states.push(failed);

        for mut w in states {
            w.dispatch(Action::StartOver);
            assert_eq!(w.state(), &WizardState::initial());
        }
    }

    #[test]
    fn resolution_after_start_over_is_discarded() {
        let mut w = ready();
        let stale = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::StartOver);
        let effect = w.dispatch(Action::Resolved {
            generation: stale,
            outcome: Ok(vec![rec("Soup")]),
        });
        assert_eq!(effect, Some(Effect::DiscardedStale { generation: stale }));
        assert_eq!(w.state(), &WizardState::initial());
    }

    #[test]
    fn resolution_from_older_generation_is_discarded() {
        let mut w = ready();
        let stale = fetch_generation(w.dispatch(Action::Submit));
        w.dispatch(Action::StartOver);
        w.dispatch(Action::SelectMood(mood("Adventurous")));
        w.dispatch(Action::SelectMealType(meal("Snack")));
        let current = fetch_generation(w.dispatch(Action::Submit));
        assert!(current > stale);

        w.dispatch(Action::Resolved {
            generation: stale,
            outcome: Ok(vec![rec("Soup")]),
        });
        assert!(w.state().is_loading());

        w.dispatch(Action::Resolved {
            generation: current,
            outcome: Ok(vec![rec("Nachos")]),
        });
        assert_eq!(w.state().recommendations().unwrap()[0].name, "Nachos");
    }

    #[test]
    fn transition_is_pure() {
        let w = ready();
        let (a, ea) = transition(w.clone(), Action::Submit);
        let (b, eb) = transition(w, Action::Submit);
        assert_eq!(a, b);
        assert_eq!(ea, eb);
    }
}
