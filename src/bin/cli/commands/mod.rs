pub mod account;
pub mod assistant;
pub mod study_log;
pub mod subject;
pub mod task;

use chrono::{DateTime, NaiveDate, Utc};

/// Parses a date given either as `YYYY-MM-DD` (midnight UTC) or as RFC 3339
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD or RFC 3339", input))
}
