use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::stimulus::StimulusKind;

pub const DEFAULT_INSTRUCTIONS: &str = "Press ENTER to replay the stimulus.\n\n\
     Press RIGHT ARROW to go to the next one.\n\n\
     Now press ENTER to begin.";

pub const DEFAULT_CLOSING_MESSAGE: &str = "The end! Thank you.";

/// Operator-supplied parameters for one session; immutable once the session starts
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Coder identifier (any non-empty string; names the response log)
    pub coder_id: String,

    /// Session number, starting at 1
    pub session_number: u32,

    /// Number of stimuli to transcribe in this session
    pub sample_size: usize,

    /// Stimulus kind to sample from
    pub kind: StimulusKind,
}

impl SessionConfig {
    pub fn new(
        coder_id: impl Into<String>,
        session_number: u32,
        sample_size: usize,
        kind: StimulusKind,
    ) -> Result<Self> {
        let coder_id = coder_id.into();

        if coder_id.trim().is_empty() {
            return Err(Error::InvalidSessionConfig(
                "coder id must not be empty".to_string(),
            ));
        }
        if coder_id.contains(['/', '\\']) {
            return Err(Error::InvalidSessionConfig(format!(
                "coder id {:?} must not contain path separators",
                coder_id
            )));
        }
        if session_number == 0 {
            return Err(Error::InvalidSessionConfig(
                "session number starts at 1".to_string(),
            ));
        }
        if sample_size == 0 {
            return Err(Error::InvalidSessionConfig(
                "number of files must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            coder_id,
            session_number,
            sample_size,
            kind,
        })
    }
}

/// Engine knobs that are not part of the operator's session parameters
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// How long the capture loop waits for keys before redrawing
    pub refresh_interval: Duration,

    /// How long the closing message stays up
    pub closing_delay: Duration,

    /// Seed for the sample draw; entropy when `None`
    pub seed: Option<u64>,

    /// Directory scanned for response logs before sampling, to archive
    /// stimuli whose row was written but whose move never happened.
    /// `None` disables the scan.
    pub recovery_log_dir: Option<PathBuf>,

    pub instructions: String,

    pub closing_message: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(50),
            closing_delay: Duration::from_secs(2),
            seed: None,
            recovery_log_dir: None,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            closing_message: DEFAULT_CLOSING_MESSAGE.to_string(),
        }
    }
}
