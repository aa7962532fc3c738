use crate::catalog;
use crate::model::{CuisineOption, MealTypeOption, Mood, Tint};
use crate::wizard::{WizardSnapshot, WizardState};
use ratatui::style::Color;

/// Wizard section that currently receives arrow keys and Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Mood,
    Meal,
    Cuisine,
    Submit,
}

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub snapshot: WizardSnapshot,
    pub focus: Focus,
    pub mood_cursor: usize,
    pub meal_cursor: usize,
    pub cuisine_cursor: usize,
    pub results_scroll: u16,
    pub spinner_tick: usize,

    pub moods: Vec<Mood>,
    pub meal_types: Vec<MealTypeOption>,
    pub cuisines: Vec<CuisineOption>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            info: String::new(),
            snapshot: WizardSnapshot::from(&WizardState::initial()),
            focus: Focus::Mood,
            mood_cursor: 0,
            meal_cursor: 0,
            cuisine_cursor: 0,
            results_scroll: 0,
            spinner_tick: 0,
            moods: catalog::moods(),
            meal_types: catalog::meal_types(),
            cuisines: catalog::cuisines(),
        }
    }
}

impl UiState {
    /// Sections the user can currently move focus to, in display order.
    pub fn focusable(&self) -> Vec<Focus> {
        let v = self.snapshot.visibility;
        let mut out = Vec::new();
        if v.mood_step {
            out.push(Focus::Mood);
        }
        if v.meal_step {
            out.push(Focus::Meal);
        }
        if v.cuisine_step {
            out.push(Focus::Cuisine);
        }
        if v.submit {
            out.push(Focus::Submit);
        }
        out
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.focusable();
        if order.is_empty() {
            return;
        }
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % order.len()
        } else {
            (idx + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Move the cursor of the focused section by `delta`, clamped to its options.
    pub fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Mood => (&mut self.mood_cursor, self.moods.len()),
            Focus::Meal => (&mut self.meal_cursor, self.meal_types.len()),
            Focus::Cuisine => (&mut self.cuisine_cursor, self.cuisines.len()),
            Focus::Submit => return,
        };
        if len == 0 {
            return;
        }
        let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
        *cursor = next as usize;
    }

    /// Install a fresh snapshot from the controller.
    pub fn apply_snapshot(&mut self, snapshot: WizardSnapshot) {
        let was_results = self.snapshot.visibility.results;
        self.snapshot = snapshot;
        if self.snapshot.visibility.results && !was_results {
            self.results_scroll = 0;
        }
        if matches!(self.snapshot.state, WizardState::Empty { .. }) {
            self.focus = Focus::Mood;
        }
        if !self.focusable().contains(&self.focus) {
            self.focus = self.focusable().first().copied().unwrap_or(Focus::Mood);
        }
    }
}

pub fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Yellow => Color::Yellow,
        Tint::Red => Color::LightRed,
        Tint::Blue => Color::LightBlue,
        Tint::Green => Color::LightGreen,
        Tint::Orange => Color::Rgb(255, 165, 0),
        Tint::Purple => Color::LightMagenta,
        Tint::Gray => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{Action, Wizard};

    fn snapshot_after(actions: Vec<Action>) -> WizardSnapshot {
        let mut w = Wizard::new();
        for a in actions {
            w.dispatch(a);
        }
        WizardSnapshot::from(w.state())
    }

    #[test]
    fn focus_only_reaches_visible_steps() {
        let mut state = UiState::default();
        assert_eq!(state.focusable(), vec![Focus::Mood]);
        state.cycle_focus(true);
        assert_eq!(state.focus, Focus::Mood);

        state.apply_snapshot(snapshot_after(vec![
            Action::SelectMood(catalog::find_mood("Happy").unwrap()),
            Action::SelectMealType(catalog::find_meal_type("Lunch").unwrap()),
        ]));
        assert_eq!(
            state.focusable(),
            vec![Focus::Mood, Focus::Meal, Focus::Cuisine, Focus::Submit]
        );
        state.cycle_focus(false);
        assert_eq!(state.focus, Focus::Submit);
    }

    #[test]
    fn start_over_snapshot_resets_focus() {
        let mut state = UiState::default();
        state.apply_snapshot(snapshot_after(vec![
            Action::SelectMood(catalog::find_mood("Happy").unwrap()),
            Action::SelectMealType(catalog::find_meal_type("Lunch").unwrap()),
        ]));
        state.focus = Focus::Cuisine;
        state.apply_snapshot(WizardSnapshot::from(&WizardState::initial()));
        assert_eq!(state.focus, Focus::Mood);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut state = UiState::default();
        state.move_cursor(-3);
        assert_eq!(state.mood_cursor, 0);
        state.move_cursor(100);
        assert_eq!(state.mood_cursor, state.moods.len() - 1);
    }
}
