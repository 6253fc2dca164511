//! Transcription session orchestration
//!
//! This module provides the `TranscriptionSession` abstraction that:
//! - Recovers trials interrupted between logging and archival
//! - Draws the sample plan up front
//! - Runs the trials strictly in plan order
//! - Records each response before archiving its stimulus

mod config;
mod recovery;
mod session;
mod stats;

pub use config::{SessionConfig, SessionSettings, DEFAULT_CLOSING_MESSAGE, DEFAULT_INSTRUCTIONS};
pub use recovery::complete_interrupted_archival;
pub use session::TranscriptionSession;
pub use stats::{CompletedTrial, SessionSummary};
