//! Application-level orchestration utilities.
//!
//! This module owns the wizard lifecycle (commands in, snapshots out, provider
//! calls in between) and post-run processing for the non-interactive modes.
//! UI/CLI layers call into this module to keep responsibilities separated.

mod controller;
mod post_process;

pub(crate) use controller::{run_controller, run_once, UiCommand};
pub(crate) use post_process::build_run_result;
