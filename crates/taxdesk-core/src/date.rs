//! # Display Formatting
//!
//! Cell-level formatting rules shared by every renderer: the request-date
//! format and the gender tag style key.
//!
//! Formatting never fails. A value that cannot be parsed as a calendar date
//! is shown exactly as received.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts accepted in addition to RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts, tried last.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y"];

/// Format a raw request date as `<abbreviated month> <day>, <year>`
/// (`"Jan 5, 2024"`).
///
/// - `None` or `""` renders as `""`.
/// - Unparseable input renders unchanged.
/// - Timestamps render the calendar date as written, without shifting
///   time zones.
pub fn format_request_date(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return String::new();
    };
    match parse_calendar_date(raw) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Style key for the gender tag: the lowercased value, or `""` when absent.
pub fn gender_tag_style(gender: Option<&str>) -> String {
    gender.map(str::to_lowercase).unwrap_or_default()
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
