use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Session-local, human-readable date used in the log's date column,
/// e.g. `07 March 2017`
pub fn session_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%d %B %Y").to_string()
}

/// One completed trial, as written to the response log.
///
/// Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    #[serde(rename = "coder_ID")]
    pub coder_id: String,

    pub date: String,

    #[serde(rename = "session")]
    pub session_number: u32,

    pub file_name: String,

    /// Transcription; may be empty and may contain `?`
    #[serde(rename = "coded_as")]
    pub transcription: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_session_date_format() {
        let at = NaiveDate::from_ymd_opt(2017, 3, 7)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
            .and_utc();
        assert_eq!(session_date(&at), "07 March 2017");

        let now = Utc::now();
        assert!(session_date(&now).ends_with(&now.format("%Y").to_string()));
    }
}
