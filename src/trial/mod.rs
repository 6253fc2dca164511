//! Trial interaction state machine
//!
//! `transition` is the pure per-key step; `run_trial` drives it against a
//! renderer and a key source until the operator advances.

mod key;
mod machine;
mod runner;

pub use key::Key;
pub use machine::{transition, Effect, TrialMachine, TrialState};
pub use runner::{await_acknowledgement, run_trial, TrialPosition, RESPONSE_PROMPT};
