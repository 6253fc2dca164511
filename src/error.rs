use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the transcription session engine
#[derive(Error, Debug)]
pub enum Error {
    /// Session parameters rejected before anything runs
    #[error("Invalid session config: {0}")]
    InvalidSessionConfig(String),

    /// Requested sample size exceeds the eligible pool
    #[error("Requested {requested} stimuli but only {available} are eligible")]
    InsufficientStimuli { requested: usize, available: usize },

    /// Archive directory has not been created by the setup step
    #[error("Archive directory does not exist: {0}")]
    ArchiveDirMissing(PathBuf),

    /// Stimulus or archive directory could not be listed
    #[error("Failed to list {path}: {source}")]
    StimulusDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Response row could not be durably written
    #[error("Failed to write response log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Existing response log could not be read back
    #[error("Failed to read response log {path}: {source}")]
    LogRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Stimulus could not be moved into the archive after its response was logged
    #[error("Failed to archive {file_name}: {source}")]
    Archival {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Presentation surface failure
    #[error("Render error: {0}")]
    Render(#[source] std::io::Error),

    /// Key-event source failure
    #[error("Input error: {0}")]
    Input(#[source] std::io::Error),

    /// Operator aborted the session (Ctrl-C)
    #[error("Session interrupted by operator")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure left the pool out of sync with the response log
    pub fn is_pool_integrity_defect(&self) -> bool {
        matches!(self, Error::Archival { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stimuli_message() {
        let err = Error::InsufficientStimuli {
            requested: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Requested 5 stimuli but only 3 are eligible"
        );
        assert!(!err.is_pool_integrity_defect());
    }

    #[test]
    fn test_archival_is_pool_integrity_defect() {
        let err = Error::Archival {
            file_name: "a.wav".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(err.is_pool_integrity_defect());
        assert!(err.to_string().contains("a.wav"));
    }
}
