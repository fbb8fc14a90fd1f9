//! Time utility functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// Naive layouts accepted for stored timestamps, interpreted as UTC
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a stored `created_at` value into an instant
///
/// Accepts RFC 3339 (any offset) and the offset-less `YYYY-MM-DD HH:MM:SS[.fff]`
/// layout SQLite's `datetime()` produces, which is taken as UTC. Returns `None`
/// for anything else so callers can skip the record.
pub fn parse_created_at(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format an instant the way `created_at` is stored (RFC 3339, microseconds, `Z`)
pub fn format_created_at(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an IANA zone name such as `Asia/Kolkata`
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
