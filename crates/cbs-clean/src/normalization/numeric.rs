//! Currency and amount normalization.

/// Strip currency symbols, letters, and separators and parse the rest as a
/// non-negative decimal. Negative or unparseable input is null.
pub fn normalize_amount(value: &str) -> Option<String> {
    let stripped: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    let parsed: f64 = stripped.parse().ok()?;
    if !parsed.is_finite() || parsed < 0.0 {
        return None;
    }
    Some(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_symbols_and_separators() {
        assert_eq!(normalize_amount("GHS 1,250.50").as_deref(), Some("1250.50"));
        assert_eq!(normalize_amount("$40").as_deref(), Some("40"));
        assert_eq!(normalize_amount("120.50").as_deref(), Some("120.50"));
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert_eq!(normalize_amount("-5.00"), None);
        assert_eq!(normalize_amount("free"), None);
        assert_eq!(normalize_amount("1.2.3"), None);
        assert_eq!(normalize_amount(""), None);
    }
}
