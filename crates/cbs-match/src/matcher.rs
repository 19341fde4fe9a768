//! The matching ladder: extraction, exact lookup, decimal narrowing,
//! similarity ranking.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;
use tracing::debug;

use cbs_model::{Alternative, Vocabulary};

use crate::error::{MatchError, Result};
use crate::similarity::code_similarity;

/// Suggestions at or above this similarity are accepted automatically,
/// with an audit record.
pub const AUTO_ACCEPT_THRESHOLD: f64 = 0.70;

/// How many ranked alternatives a suggestion or failure carries.
pub const MAX_ALTERNATIVES: usize = 3;

const NOT_APPLICABLE_TOKENS: &[&str] = &["not applicable", "n/a", "na", "nil", "none"];

/// True for the tokens an additional-diagnosis field accepts as empty.
pub fn is_not_applicable(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    NOT_APPLICABLE_TOKENS.contains(&value.as_str())
}

/// A fuzzy acceptance: the matcher substituted a vocabulary code for an
/// unmatched input, at the recorded confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyAcceptance {
    pub original_code: String,
    pub confidence: f64,
    /// Ranked candidates, accepted code first.
    pub alternatives: Vec<Alternative>,
}

/// A resolved diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisMatch {
    /// Accepted vocabulary code.
    pub code: String,
    /// Vocabulary display name for the accepted code.
    pub name: String,
    /// Informational notes (parent-code narrowing, extra codes ignored).
    pub notes: Vec<String>,
    /// Present only when the code was accepted through similarity ranking.
    pub fuzzy: Option<FuzzyAcceptance>,
}

/// Matcher over an injected vocabulary reference.
#[derive(Debug, Clone)]
pub struct DiagnosisMatcher<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> DiagnosisMatcher<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Resolve a raw coded-diagnosis value to a single accepted code.
    ///
    /// First success wins: exact case-insensitive lookup, full decimal
    /// strip, progressively shorter decimal suffixes, then similarity
    /// ranking with auto-acceptance at [`AUTO_ACCEPT_THRESHOLD`].
    pub fn match_value(&self, raw: &str) -> Result<DiagnosisMatch> {
        let (codes, name_hint) =
            extract_codes(raw).ok_or_else(|| MatchError::MissingCode(raw.trim().to_string()))?;

        let primary = codes[0].clone();
        let mut notes = Vec::new();
        if codes.len() > 1 {
            notes.push(format!(
                "additional codes {} ignored for the principal diagnosis; use the additional-diagnosis field",
                codes[1..].join(", ")
            ));
        }

        // Exact match.
        if let Some(entry) = self.vocabulary.lookup(&primary) {
            return Ok(DiagnosisMatch {
                code: entry.code.clone(),
                name: entry.name.clone(),
                notes,
                fuzzy: None,
            });
        }

        // Hierarchical narrowing: strip the decimal component, then retry
        // progressively shorter suffixes ("I64.00" -> "I64" -> "I64.0").
        if let Some(dot) = primary.find('.') {
            let stem = &primary[..dot];
            let suffix = &primary[dot + 1..];
            if let Some(entry) = self.vocabulary.lookup(stem) {
                notes.push(parent_note(&primary, &entry.code));
                return Ok(DiagnosisMatch {
                    code: entry.code.clone(),
                    name: entry.name.clone(),
                    notes,
                    fuzzy: None,
                });
            }
            for length in (1..suffix.len()).rev() {
                let Some(shortened) = suffix.get(..length) else {
                    continue;
                };
                let candidate = format!("{stem}.{shortened}");
                if let Some(entry) = self.vocabulary.lookup(&candidate) {
                    notes.push(parent_note(&primary, &entry.code));
                    return Ok(DiagnosisMatch {
                        code: entry.code.clone(),
                        name: entry.name.clone(),
                        notes,
                        fuzzy: None,
                    });
                }
            }
        }

        // Similarity ranking over the whole vocabulary.
        let ranked = self.rank_candidates(&primary, &name_hint);
        let Some(best) = ranked.first() else {
            return Err(MatchError::NoMatch(primary));
        };

        if best.similarity >= AUTO_ACCEPT_THRESHOLD {
            debug!(
                original = %primary,
                accepted = %best.code,
                confidence = best.similarity,
                "auto-accepted diagnosis suggestion"
            );
            return Ok(DiagnosisMatch {
                code: best.code.clone(),
                name: best.name.clone(),
                notes,
                fuzzy: Some(FuzzyAcceptance {
                    original_code: primary,
                    confidence: best.similarity,
                    alternatives: ranked,
                }),
            });
        }

        Err(MatchError::Unmatched {
            code: primary,
            alternatives: ranked,
        })
    }

    /// Score every vocabulary entry, rank descending, keep the top few.
    ///
    /// Ties break on name similarity to the free-text label, then on code,
    /// so the ranking is deterministic.
    fn rank_candidates(&self, code: &str, name_hint: &str) -> Vec<Alternative> {
        let mut scored: Vec<(Alternative, f64)> = self
            .vocabulary
            .entries()
            .iter()
            .filter_map(|entry| {
                let similarity = code_similarity(code, &entry.code);
                if similarity <= 0.0 {
                    return None;
                }
                let name_similarity = if name_hint.is_empty() {
                    0.0
                } else {
                    jaro_winkler::similarity(
                        name_hint.to_lowercase().chars(),
                        entry.name.to_lowercase().chars(),
                    )
                };
                Some((
                    Alternative {
                        code: entry.code.clone(),
                        name: entry.name.clone(),
                        similarity,
                    },
                    name_similarity,
                ))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.similarity
                .partial_cmp(&a.0.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
                .then_with(|| a.0.code.cmp(&b.0.code))
        });

        scored
            .into_iter()
            .take(MAX_ALTERNATIVES)
            .map(|(alternative, _)| alternative)
            .collect()
    }
}

fn parent_note(original: &str, accepted: &str) -> String {
    format!("code {original} not in vocabulary; parent code {accepted} used")
}

/// Extract the code token(s) from a raw diagnosis value.
///
/// Accepts "Name(CODE)" and "Name(CODE1, CODE2)" forms; a bare value that
/// itself looks like a code (letter-led, no spaces) is taken as-is.
/// Returns the codes plus the free-text label preceding the parentheses.
fn extract_codes(raw: &str) -> Option<(Vec<String>, String)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(open) = raw.find('(')
        && let Some(close) = raw.rfind(')')
        && close > open
    {
        let codes: Vec<String> = raw[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(String::from)
            .collect();
        if codes.is_empty() {
            return None;
        }
        return Some((codes, raw[..open].trim().to_string()));
    }

    if looks_like_code(raw) {
        return Some((vec![raw.to_string()], String::new()));
    }
    None
}

fn looks_like_code(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic() && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_parenthesized_code() {
        let (codes, hint) = extract_codes("Stroke(I64)").unwrap();
        assert_eq!(codes, vec!["I64"]);
        assert_eq!(hint, "Stroke");
    }

    #[test]
    fn extracts_comma_separated_codes() {
        let (codes, _) = extract_codes("Sepsis (A41.9, J18.9)").unwrap();
        assert_eq!(codes, vec!["A41.9", "J18.9"]);
    }

    #[test]
    fn accepts_bare_codes() {
        let (codes, hint) = extract_codes(" I64.0 ").unwrap();
        assert_eq!(codes, vec!["I64.0"]);
        assert!(hint.is_empty());
    }

    #[test]
    fn rejects_prose_without_code() {
        assert!(extract_codes("unknown diagnosis").is_none());
        assert!(extract_codes("Stroke()").is_none());
        assert!(extract_codes("").is_none());
    }

    #[test]
    fn not_applicable_tokens() {
        assert!(is_not_applicable("Not Applicable"));
        assert!(is_not_applicable(" n/a "));
        assert!(!is_not_applicable("Stroke(I64)"));
    }
}
