use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::record::TrialRecord;
use super::ResponseLog;
use crate::error::{Error, Result};

/// Log file names end with this suffix; the coder id is the prefix
pub const LOG_FILE_SUFFIX: &str = "_transcribed_stimuli.csv";

const FILE_NAME_COLUMN: &str = "file_name";

/// Position of `file_name` in logs written by this crate
const DEFAULT_FILE_NAME_INDEX: usize = 3;

/// CSV response log with columns `coder_ID,date,session,file_name,coded_as`
#[derive(Debug, Clone)]
pub struct CsvResponseLog {
    path: PathBuf,
}

impl CsvResponseLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<log_dir>/<coder_id>_transcribed_stimuli.csv`
    pub fn for_coder(log_dir: &Path, coder_id: &str) -> Self {
        Self::new(log_dir.join(format!("{}{}", coder_id, LOG_FILE_SUFFIX)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in the log, in write order; an absent log is empty
    pub fn read_records(&self) -> Result<Vec<TrialRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let read_err = |source: csv::Error| Error::LogRead {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(read_err)?;

        reader
            .deserialize::<TrialRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(read_err)
    }

    /// Stimulus file names already recorded in this log.
    ///
    /// Only the `file_name` column is read. Rows cut short by a crash or
    /// holding free-text session values are still accepted; rows without a
    /// file name are skipped with a warning.
    pub fn recorded_file_names(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let read_err = |source: csv::Error| Error::LogRead {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(read_err)?;

        let column = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .position(|name| name == FILE_NAME_COLUMN)
            .unwrap_or(DEFAULT_FILE_NAME_INDEX);

        let mut names = HashSet::new();
        for (index, row) in reader.records().enumerate() {
            match row {
                Ok(row) => match row.get(column).filter(|name| !name.is_empty()) {
                    Some(name) => {
                        names.insert(name.to_string());
                    }
                    None => warn!(
                        "Skipping row {} of {}: no file name",
                        index + 1,
                        self.path.display()
                    ),
                },
                Err(e) => warn!(
                    "Skipping unreadable row {} of {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(names)
    }

    /// Every response log in `log_dir`, one per coder
    pub fn discover(log_dir: &Path) -> Result<Vec<Self>> {
        let dir_err = |source: std::io::Error| Error::StimulusDir {
            path: log_dir.to_path_buf(),
            source,
        };

        let mut logs = Vec::new();
        for entry in fs::read_dir(log_dir).map_err(dir_err)? {
            let entry = entry.map_err(dir_err)?;
            let is_log = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(LOG_FILE_SUFFIX));
            if is_log && entry.file_type().map_err(dir_err)?.is_file() {
                logs.push(Self::new(entry.path()));
            }
        }
        logs.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(logs)
    }

    fn write_row(&self, record: &TrialRecord) -> std::result::Result<(), csv::Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // header goes in only when the file is brand new (or was left empty)
        let write_header = file.metadata()?.len() == 0;
        if write_header {
            info!("Creating response log {}", self.path.display());
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        Ok(())
    }
}

impl ResponseLog for CsvResponseLog {
    fn append(&self, record: &TrialRecord) -> Result<()> {
        self.write_row(record).map_err(|source| Error::LogWrite {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            "Logged {} -> {:?} in {}",
            record.file_name,
            record.transcription,
            self.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(file_name: &str, text: &str) -> TrialRecord {
        TrialRecord {
            coder_id: "mv".to_string(),
            date: "07 March 2017".to_string(),
            session_number: 2,
            file_name: file_name.to_string(),
            transcription: text.to_string(),
        }
    }

    #[test]
    fn test_header_written_once() {
        let temp_dir = TempDir::new().unwrap();
        let log = CsvResponseLog::for_coder(temp_dir.path(), "mv");

        log.append(&record("a.wav", "cat?")).unwrap();
        log.append(&record("b.wav", "")).unwrap();
        log.append(&record("c.wav", "dog 1")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "coder_ID,date,session,file_name,coded_as");
        assert_eq!(lines[1], "mv,07 March 2017,2,a.wav,cat?");
        assert!(lines[2].starts_with("mv,07 March 2017,2,b.wav,"));
        assert_eq!(lines[3], "mv,07 March 2017,2,c.wav,dog 1");
    }

    #[test]
    fn test_existing_log_gets_no_second_header() {
        let temp_dir = TempDir::new().unwrap();
        let log = CsvResponseLog::for_coder(temp_dir.path(), "mv");
        log.append(&record("a.wav", "one")).unwrap();

        // a later session reopens the same file
        let reopened = CsvResponseLog::for_coder(temp_dir.path(), "mv");
        reopened.append(&record("b.wav", "two")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches("coder_ID").count(), 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_read_back_records() {
        let temp_dir = TempDir::new().unwrap();
        let log = CsvResponseLog::for_coder(temp_dir.path(), "mv");
        log.append(&record("a.wav", "hello, world")).unwrap();
        log.append(&record("b.wav", "")).unwrap();

        let records = log.read_records().unwrap();
        assert_eq!(records, vec![record("a.wav", "hello, world"), record("b.wav", "")]);
    }

    #[test]
    fn test_absent_log_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log = CsvResponseLog::for_coder(temp_dir.path(), "nobody");
        assert!(log.recorded_file_names().unwrap().is_empty());
        assert!(!log.path().exists());
    }

    #[test]
    fn test_truncated_last_row_still_yields_names() {
        let temp_dir = TempDir::new().unwrap();
        let log = CsvResponseLog::for_coder(temp_dir.path(), "mv");
        fs::write(
            log.path(),
            "coder_ID,date,session,file_name,coded_as\n\
             mv,07 March 2017,1,a.wav,hi\n\
             mv,07 March 2017,1,b.w",
        )
        .unwrap();

        let names = log.recorded_file_names().unwrap();
        assert!(names.contains("a.wav"));
        assert!(!names.contains("b.wav"));
    }

    #[test]
    fn test_free_text_session_and_short_rows_are_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let log = CsvResponseLog::for_coder(temp_dir.path(), "mv");
        fs::write(
            log.path(),
            "coder_ID,date,session,file_name,coded_as\n\
             mv,07 March 2017,first,a.wav,hi\n\
             mv,07 March 2017\n\
             mv,08 March 2017,2,c.wav,yo\n",
        )
        .unwrap();

        let names = log.recorded_file_names().unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.wav") && names.contains("c.wav"));
        // the strict reader still refuses such a log
        assert!(matches!(log.read_records(), Err(Error::LogRead { .. })));
    }

    #[test]
    fn test_unwritable_log_path() {
        let temp_dir = TempDir::new().unwrap();
        // a directory where the log file should be
        let path = temp_dir.path().join("mv_transcribed_stimuli.csv");
        fs::create_dir(&path).unwrap();

        let err = CsvResponseLog::new(&path).append(&record("a.wav", "x")).unwrap_err();
        assert!(matches!(err, Error::LogWrite { .. }));
    }

    #[test]
    fn test_discover_logs() {
        let temp_dir = TempDir::new().unwrap();
        CsvResponseLog::for_coder(temp_dir.path(), "a").append(&record("x.wav", "")).unwrap();
        CsvResponseLog::for_coder(temp_dir.path(), "b").append(&record("y.wav", "")).unwrap();
        fs::write(temp_dir.path().join("notes.csv"), "x").unwrap();

        let logs = CsvResponseLog::discover(temp_dir.path()).unwrap();
        assert_eq!(logs.len(), 2);
    }
}
