//! Lenient parsing of the date-like text found in station CSVs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Datetime layouts without an offset; interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses `text` as a point in time, returning `None` for anything that does
/// not look like a date.
///
/// Accepted forms: RFC 3339 (`2024-01-01T00:00:00Z`, `...+02:00`), ISO-8601
/// without offset (`T` or space separator, optional fractional seconds),
/// `YYYY-MM-DD`, `YYYY/MM/DD[ HH:MM[:SS]]`, `MM/DD/YYYY[ HH:MM[:SS]]` and
/// RFC 2822. Inputs without an offset are taken to be UTC; date-only inputs
/// resolve to midnight UTC.
///
/// # Examples
///
/// ```
/// use weather_dashboard::parse_temporal;
/// use chrono::{TimeZone, Utc};
///
/// let expected = Utc.with_ymd_and_hms(2024, 1, 1, 6, 30, 0).unwrap();
/// assert_eq!(parse_temporal("2024-01-01T06:30:00Z"), Some(expected));
/// assert_eq!(parse_temporal("2024-01-01 06:30"), Some(expected));
/// assert_eq!(parse_temporal("01/01/2024 06:30:00"), Some(expected));
/// assert_eq!(parse_temporal("12.3"), None);
/// ```
pub fn parse_temporal(text: &str) -> Option<DateTime<Utc>> {
    // Stored timestamps carry millisecond precision; drop anything finer so
    // parsed values survive a cache round trip unchanged.
    parse_full_precision(text).and_then(|dt| DateTime::from_timestamp_millis(dt.timestamp_millis()))
}

fn parse_full_precision(text: &str) -> Option<DateTime<Utc>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // RFC 3339 requires seconds; allow "2024-01-01T06:30Z" style too.
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
