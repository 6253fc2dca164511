use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::recorder::CsvResponseLog;
use crate::stimulus::{StimulusKind, StimulusPool};

/// Archive pending stimuli that already have a row in some coder's log.
///
/// Such a stimulus was logged but the process died before the move. Moving
/// it now completes that trial; nothing is written to any log. Returns the
/// archived file names.
pub fn complete_interrupted_archival(
    pool: &dyn StimulusPool,
    kind: StimulusKind,
    log_dir: &Path,
) -> Result<Vec<String>> {
    let mut recorded = HashSet::new();
    for log in CsvResponseLog::discover(log_dir)? {
        recorded.extend(log.recorded_file_names()?);
    }

    if recorded.is_empty() {
        return Ok(Vec::new());
    }

    let mut archived = Vec::new();
    for stimulus in pool.list_eligible(kind)? {
        if !recorded.contains(&stimulus.file_name) {
            continue;
        }
        warn!(
            "{} is already recorded but was never archived; archiving it now",
            stimulus.file_name
        );
        pool.archive(&stimulus)?;
        archived.push(stimulus.file_name);
    }

    if !archived.is_empty() {
        info!("Recovered {} interrupted trial(s)", archived.len());
    }

    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{ResponseLog, TrialRecord};
    use crate::stimulus::DirectoryPool;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_recorded_but_pending_is_archived() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("CODED")).unwrap();
        for name in ["a.wav", "b.wav", "c.mp4"] {
            fs::write(dir.join(name), b"x").unwrap();
        }

        CsvResponseLog::for_coder(dir, "mv")
            .append(&TrialRecord {
                coder_id: "mv".to_string(),
                date: "01 January 2024".to_string(),
                session_number: 1,
                file_name: "a.wav".to_string(),
                transcription: "hi".to_string(),
            })
            .unwrap();

        let pool = DirectoryPool::new(dir, dir.join("CODED"));
        let recovered = complete_interrupted_archival(&pool, StimulusKind::Audio, dir).unwrap();

        assert_eq!(recovered, vec!["a.wav".to_string()]);
        assert!(dir.join("CODED").join("a.wav").exists());
        assert!(dir.join("b.wav").exists());
    }

    #[test]
    fn test_log_cut_off_mid_row_does_not_block_recovery() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("CODED")).unwrap();
        for name in ["a.wav", "b.wav"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        fs::write(
            CsvResponseLog::for_coder(dir, "mv").path(),
            "coder_ID,date,session,file_name,coded_as\n\
             mv,07 March 2017,1,a.wav,hi\n\
             mv,07 March 2017,1,b.w",
        )
        .unwrap();

        let pool = DirectoryPool::new(dir, dir.join("CODED"));
        let recovered = complete_interrupted_archival(&pool, StimulusKind::Audio, dir).unwrap();

        assert_eq!(recovered, vec!["a.wav".to_string()]);
        assert!(dir.join("b.wav").exists());
    }

    #[test]
    fn test_no_logs_no_changes() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("CODED")).unwrap();
        fs::write(dir.join("a.wav"), b"x").unwrap();

        let pool = DirectoryPool::new(dir, dir.join("CODED"));
        let recovered = complete_interrupted_archival(&pool, StimulusKind::Audio, dir).unwrap();

        assert!(recovered.is_empty());
        assert!(dir.join("a.wav").exists());
    }
}
