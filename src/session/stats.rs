use chrono::{DateTime, Local};

use crate::stimulus::StimulusKind;

/// Outcome of a finished session
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub coder_id: String,

    pub session_number: u32,

    pub kind: StimulusKind,

    /// When the session started
    pub started_at: DateTime<Local>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Trials in plan order, each recorded and archived
    pub trials: Vec<CompletedTrial>,

    /// Stimuli archived by start-up recovery (already in a log)
    pub recovered: Vec<String>,
}

/// A trial whose row was written and whose stimulus was archived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTrial {
    /// 1-based trial number
    pub trial_number: usize,

    pub file_name: String,

    pub transcription: String,
}
