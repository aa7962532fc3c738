//! Key handling for the wizard tab.

use super::state::{Focus, UiState};
use crate::orchestrator::UiCommand;
use crate::wizard::{Action, Step};
use crossterm::event::{KeyCode, KeyModifiers};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Nothing,
    Send(UiCommand),
    CopyResults,
    Quit,
}

fn wizard(action: Action) -> KeyOutcome {
    KeyOutcome::Send(UiCommand::Wizard(action))
}

/// Map a key press to an outcome, updating local cursor/focus state.
pub fn handle_key(state: &mut UiState, modifiers: KeyModifiers, code: KeyCode) -> KeyOutcome {
    match (modifiers, code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            return KeyOutcome::Quit
        }
        (_, KeyCode::Char('?')) => {
            state.tab = if state.tab == 1 { 0 } else { 1 };
            return KeyOutcome::Nothing;
        }
        (_, KeyCode::Esc) if state.tab == 1 => {
            state.tab = 0;
            return KeyOutcome::Nothing;
        }
        _ => {}
    }
    if state.tab != 0 {
        return KeyOutcome::Nothing;
    }

    let step = state.snapshot.step;
    let v = state.snapshot.visibility;
    match code {
        KeyCode::Char('n') => wizard(Action::StartOver),
        KeyCode::Char('r') if matches!(step, Step::Results | Step::Error) => wizard(Action::Submit),
        KeyCode::Char('g') if v.submit && v.submit_enabled => wizard(Action::Submit),
        KeyCode::Char('y') if v.results => KeyOutcome::CopyResults,
        KeyCode::Up | KeyCode::Char('k') if v.results => {
            state.results_scroll = state.results_scroll.saturating_sub(1);
            KeyOutcome::Nothing
        }
        KeyCode::Down | KeyCode::Char('j') if v.results => {
            let last = state
                .snapshot
                .state
                .recommendations()
                .map(|r| r.len().saturating_sub(1))
                .unwrap_or(0);
            let last = u16::try_from(last).unwrap_or(u16::MAX);
            state.results_scroll = state.results_scroll.saturating_add(1).min(last);
            KeyOutcome::Nothing
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
            state.cycle_focus(true);
            KeyOutcome::Nothing
        }
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
            state.cycle_focus(false);
            KeyOutcome::Nothing
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.move_cursor(-1);
            KeyOutcome::Nothing
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.move_cursor(1);
            KeyOutcome::Nothing
        }
        KeyCode::Enter | KeyCode::Char(' ') => activate(state),
        _ => KeyOutcome::Nothing,
    }
}

fn activate(state: &mut UiState) -> KeyOutcome {
    if !state.focusable().contains(&state.focus) {
        return KeyOutcome::Nothing;
    }
    match state.focus {
        Focus::Mood => match state.moods.get(state.mood_cursor).cloned() {
            Some(mood) => {
                state.focus = Focus::Meal;
                wizard(Action::SelectMood(mood))
            }
            None => KeyOutcome::Nothing,
        },
        Focus::Meal => match state.meal_types.get(state.meal_cursor).cloned() {
            Some(meal) => {
                state.focus = Focus::Cuisine;
                wizard(Action::SelectMealType(meal))
            }
            None => KeyOutcome::Nothing,
        },
        Focus::Cuisine => match state.cuisines.get(state.cuisine_cursor) {
            Some(c) => wizard(Action::ToggleCuisine(c.name.clone())),
            None => KeyOutcome::Nothing,
        },
        Focus::Submit if state.snapshot.visibility.submit_enabled => wizard(Action::Submit),
        Focus::Submit => KeyOutcome::Nothing,
    }
}
