//! Date normalization to ISO `YYYY-MM-DD`.
//!
//! Accepts ISO, `DD-MM-YYYY`, and `DD/MM/YYYY`. Anything else is
//! unparseable and cleans to null; the original value is never guessed at.

use chrono::NaiveDate;

const INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parse a date in any accepted input format.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Normalize a date string to ISO, or `None` when unparseable.
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(|date| date.format("%Y-%m-%d").to_string())
}
