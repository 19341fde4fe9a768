//! Deterministic code-structure similarity.
//!
//! Unlike the name-based fuzzy scoring used for column mapping elsewhere,
//! diagnosis codes are compared structurally: shared ICD-style base,
//! shared chapter letter, and numeric distance within the chapter.

/// Similarity between two diagnosis codes, in `[0, 1]`.
///
/// Same 3-character base scores 0.9; same leading letter scores by numeric
/// distance (0.85 at distance 0 down to 0.3 beyond 5), or 0.2 when either
/// code has no numeric part; different leading letters score 0.
pub fn code_similarity(input: &str, candidate: &str) -> f64 {
    let input = input.trim().to_uppercase();
    let candidate = candidate.trim().to_uppercase();
    if input.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    if base(&input) == base(&candidate) {
        return 0.9;
    }

    let (Some(input_first), Some(candidate_first)) =
        (input.chars().next(), candidate.chars().next())
    else {
        return 0.0;
    };
    if input_first != candidate_first {
        return 0.0;
    }

    match (numeric_part(&input), numeric_part(&candidate)) {
        // 0.7 - 0.1 * d for d in 1..=2, spelled as literals to keep the
        // scores exact.
        (Some(a), Some(b)) => match a.abs_diff(b) {
            0 => 0.85,
            1 => 0.6,
            2..=5 => 0.5,
            _ => 0.3,
        },
        _ => 0.2,
    }
}

/// The 3-character base of an ICD-style code.
fn base(code: &str) -> &str {
    code.get(..3).unwrap_or(code)
}

/// Digits following the leading alphabetic prefix, up to the decimal point.
fn numeric_part(code: &str) -> Option<u32> {
    let digits: String = code
        .chars()
        .skip_while(|ch| ch.is_ascii_alphabetic())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
