//! Coercion of raw spreadsheet cells and birth dates.
//!
//! Exports from spreadsheet tools leak their cell types into the text:
//! numbers come out as `1023456789.0`, dates as `2001-03-04 00:00:00` and
//! blanks as `nan`. Everything is folded back to what a person would have
//! typed. Nothing here fails: unparsable dates become the 1111-01-01
//! sentinel and are logged.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Sentinel written in place of a date that could not be read.
pub const SENTINEL_DATE_TEXT: &str = "1/1/1111";

/// Display format for dates in profiles.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Accepted input formats for birth dates, tried in order.
const BIRTH_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

/// Integer written back as a float (`1023456789.0`). Grouped numbers such
/// as `80.000` are left alone.
static RE_INTEGRAL_FLOAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+\.0$").unwrap());

static RE_ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$").unwrap()
});

/// The 1111-01-01 sentinel date.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1111, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Fold an exported cell back to plain text.
pub fn coerce_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }

    if RE_INTEGRAL_FLOAT.is_match(trimmed) {
        return trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string();
    }

    if let Some(caps) = RE_ISO_DATETIME.captures(trimmed) {
        let date = caps[1].parse().ok().and_then(|year: i32| {
            let month = caps[2].parse().ok()?;
            let day = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        });
        return match date {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => {
                tracing::warn!(cell = trimmed, "Invalid date cell, using sentinel");
                SENTINEL_DATE_TEXT.to_string()
            }
        };
    }

    trimmed.to_string()
}

/// Parse a birth date in any accepted format, falling back to the sentinel.
pub fn parse_birth_date(raw: &str) -> NaiveDate {
    let text = raw.trim();
    let text = text.split([' ', 'T']).next().unwrap_or(text);
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .unwrap_or_else(|| {
            tracing::warn!(date = raw, "Unreadable birth date, using sentinel");
            sentinel_date()
        })
}

/// Birth date in display format; blank stays blank.
pub fn format_birth_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    parse_birth_date(raw).format(DATE_FORMAT).to_string()
}

/// Completed years between `birth` and `today`.
///
/// `None` for the sentinel and for birth dates in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth == sentinel_date() {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
