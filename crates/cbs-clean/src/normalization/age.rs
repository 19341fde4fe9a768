//! Age decomposition: "<digits> <unit>" into a quantity and a unit token.
//!
//! Age is mapped as two canonical fields (`age_number`, `age_unit`) that
//! usually share one source column, so each extraction stays a pure
//! per-field transform.

use std::sync::LazyLock;

use regex::Regex;

static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*([A-Za-z()]+)$").expect("age pattern is valid"));

const UNITS: &[(&str, &str)] = &[
    ("year", "years"),
    ("years", "years"),
    ("year(s)", "years"),
    ("yr", "years"),
    ("yrs", "years"),
    ("month", "months"),
    ("months", "months"),
    ("month(s)", "months"),
    ("mo", "months"),
    ("day", "days"),
    ("days", "days"),
    ("day(s)", "days"),
];

fn normalize_unit(token: &str) -> Option<&'static str> {
    let needle = token.trim().to_lowercase();
    UNITS
        .iter()
        .find(|(key, _)| *key == needle)
        .map(|&(_, unit)| unit)
}

/// The numeric quantity of an age value, or null when there is none.
pub fn extract_number(value: &str) -> String {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return trimmed.to_string();
    }
    AGE_PATTERN
        .captures(trimmed)
        .map(|captures| captures[1].to_string())
        .unwrap_or_default()
}

/// The unit token of an age value, normalized to years/months/days.
///
/// A bare unit token ("years", "Month(s)") normalizes directly; an
/// unrecognized alphabetic token passes through unchanged for the
/// validator to flag; a value with no unit at all is null.
pub fn extract_unit(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(captures) = AGE_PATTERN.captures(trimmed) {
        let token = &captures[2];
        return normalize_unit(token).map_or_else(|| token.to_string(), String::from);
    }
    let unit_like = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphabetic() || ch == '(' || ch == ')');
    if unit_like {
        return normalize_unit(trimmed).map_or_else(|| trimmed.to_string(), String::from);
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_quantity_and_unit() {
        assert_eq!(extract_number("20 Year(s)"), "20");
        assert_eq!(extract_unit("20 Year(s)"), "years");
        assert_eq!(extract_number("3 Month(s)"), "3");
        assert_eq!(extract_unit("3 Month(s)"), "months");
    }

    #[test]
    fn bare_values_are_stable() {
        assert_eq!(extract_number("20"), "20");
        assert_eq!(extract_unit("years"), "years");
        assert_eq!(extract_unit("20"), "");
        assert_eq!(extract_number("years"), "");
    }

    #[test]
    fn unknown_unit_passes_through() {
        assert_eq!(extract_unit("5 decades"), "decades");
        assert_eq!(extract_unit("decades"), "decades");
    }
}
