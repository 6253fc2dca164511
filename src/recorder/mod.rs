//! Response recorder
//!
//! One append-only CSV log per coder. A row is durable once `append`
//! returns; the stimulus may only be archived after that.

mod csv_log;
mod record;

pub use csv_log::{CsvResponseLog, LOG_FILE_SUFFIX};
pub use record::{session_date, TrialRecord};

use crate::error::Result;

/// Durable, append-only sink for completed trials
pub trait ResponseLog {
    /// Write exactly one row for `record` and make it durable before returning
    fn append(&self, record: &TrialRecord) -> Result<()>;
}
