//! Timestamp parsing for stored and uploaded ticks.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Epoch values above this are read as milliseconds.
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Formats a timestamp the way it is written to the `ticks` table.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Converts an integer epoch (seconds, or milliseconds when large) to UTC.
#[must_use]
pub fn parse_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.unsigned_abs() > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// Parses a timestamp cell.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` (naive values are UTC), the
/// same with a `T` separator, a bare date, or an integer epoch.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    if let Ok(epoch) = value.parse::<i64>() {
        return parse_epoch(epoch);
    }

    value
        .parse::<f64>()
        .ok()
        .map(f64::trunc)
        .filter(|v| v.is_finite() && (i64::MIN as f64..i64::MAX as f64).contains(v))
        .and_then(|v| parse_epoch(v as i64))
}
