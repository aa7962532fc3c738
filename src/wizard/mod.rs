//! Selection wizard.
//!
//! A finite-state controller over the user's mood, meal type and cuisine
//! choices. Step gating is derived from the state variant; the only way to
//! change the state is the pure transition function, applied through
//! [`Wizard::dispatch`].

mod state;
mod transition;

pub use state::{Step, WizardSnapshot, WizardState};
pub use transition::{Action, Effect, Wizard};

#[cfg(test)]
pub use state::{Selection, UNKNOWN_ERROR_MESSAGE, VALIDATION_MESSAGE};
