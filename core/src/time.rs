//! Time related utils.

use crate::Error;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Convert epoch seconds into datetime.
pub fn from_timestamp(secs: i64) -> crate::Result<DateTime> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::unexpected(format!("timestamp {secs} is out of range")))
}

/// Format time into ISO 8601 with seperator: "2022-03-13T07:20:04Z"
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse time from ISO 8601 with seperator: "2022-03-13T07:20:04Z"
pub fn parse_iso8601(s: &str) -> crate::Result<DateTime> {
    let t = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")
        .map_err(|e| Error::unexpected(format!("parse {s} into iso8601 failed")).with_source(e))?;
    Ok(Utc.from_utc_datetime(&t))
}
