use cbs_match::{AUTO_ACCEPT_THRESHOLD, DiagnosisMatcher, MatchError};
use cbs_model::{DiagnosisEntry, Vocabulary};

fn entry(code: &str, name: &str) -> DiagnosisEntry {
    DiagnosisEntry {
        code: code.to_string(),
        name: name.to_string(),
    }
}

fn vocabulary() -> Vocabulary {
    Vocabulary::new(vec![
        entry("I64", "Stroke, not specified as haemorrhage or infarction"),
        entry("J18.9", "Pneumonia, unspecified"),
        entry("A41.9", "Sepsis, unspecified"),
        entry("A09", "Diarrhoea and gastroenteritis"),
        entry("B54", "Unspecified malaria"),
    ])
}

#[test]
fn exact_match_returns_code_unchanged_without_suggestion() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    let matched = matcher.match_value("Malaria(B54)").unwrap();
    assert_eq!(matched.code, "B54");
    assert!(matched.fuzzy.is_none());
    assert!(matched.notes.is_empty());
}

#[test]
fn exact_match_is_case_insensitive() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    let matched = matcher.match_value("Pneumonia(j18.9)").unwrap();
    assert_eq!(matched.code, "J18.9");
    assert!(matched.fuzzy.is_none());
}

#[test]
fn trailing_decimal_resolves_to_parent_with_note() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    let matched = matcher.match_value("Stroke(I64.00)").unwrap();
    assert_eq!(matched.code, "I64");
    assert!(matched.fuzzy.is_none());
    assert_eq!(matched.notes.len(), 1);
    assert!(matched.notes[0].contains("parent code I64"));
}

#[test]
fn shorter_suffix_is_tried_when_full_strip_misses() {
    let vocabulary = Vocabulary::new(vec![entry("J18.9", "Pneumonia, unspecified")]);
    let matcher = DiagnosisMatcher::new(&vocabulary);

    // "J18" is absent; narrowing "J18.91" -> "J18.9" succeeds.
    let matched = matcher.match_value("Pneumonia(J18.91)").unwrap();
    assert_eq!(matched.code, "J18.9");
    assert!(matched.notes[0].contains("parent code J18.9"));
}

#[test]
fn extra_codes_produce_informational_note() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    let matched = matcher.match_value("Sepsis(A41.9, J18.9)").unwrap();
    assert_eq!(matched.code, "A41.9");
    assert_eq!(matched.notes.len(), 1);
    assert!(matched.notes[0].contains("J18.9"));
    assert!(matched.notes[0].contains("additional-diagnosis"));
}

#[test]
fn same_base_candidate_is_auto_accepted_with_audit() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    // "B541" shares the base "B54"; similarity 0.9 clears the threshold.
    let matched = matcher.match_value("Malaria(B541)").unwrap();
    assert_eq!(matched.code, "B54");
    let fuzzy = matched.fuzzy.expect("fuzzy acceptance expected");
    assert_eq!(fuzzy.original_code, "B541");
    assert!(fuzzy.confidence >= AUTO_ACCEPT_THRESHOLD);
    assert_eq!(fuzzy.alternatives[0].code, "B54");
}

#[test]
fn below_threshold_fails_with_ranked_alternatives() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    // "I65" is distance 1 from "I64": similarity 0.6, below 0.70.
    let error = matcher.match_value("Occlusion(I65)").unwrap_err();
    match error {
        MatchError::Unmatched { code, alternatives } => {
            assert_eq!(code, "I65");
            assert!(!alternatives.is_empty());
            assert_eq!(alternatives[0].code, "I64");
            assert!(alternatives[0].similarity < AUTO_ACCEPT_THRESHOLD);
            assert!(alternatives.len() <= 3);
        }
        other => panic!("expected Unmatched, got {other:?}"),
    }
}

#[test]
fn no_scoring_candidate_fails_plain() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    // No vocabulary code starts with 'Z'.
    let error = matcher.match_value("Observation(Z03)").unwrap_err();
    assert!(matches!(error, MatchError::NoMatch(code) if code == "Z03"));
}

#[test]
fn value_without_code_token_fails() {
    let vocabulary = vocabulary();
    let matcher = DiagnosisMatcher::new(&vocabulary);

    let error = matcher.match_value("fever of unknown origin").unwrap_err();
    assert!(matches!(error, MatchError::MissingCode(_)));
}

#[test]
fn alternatives_are_ranked_descending() {
    let vocabulary = Vocabulary::new(vec![
        entry("A01", "Typhoid fever"),
        entry("A03", "Shigellosis"),
        entry("A09", "Diarrhoea and gastroenteritis"),
        entry("A20", "Plague"),
    ]);
    let matcher = DiagnosisMatcher::new(&vocabulary);

    // "A05" misses everything: A01/A03/A09 score 0.5, A20 scores 0.3.
    // With no name hint, equal scores order by code.
    let error = matcher.match_value("A05").unwrap_err();
    let alternatives = error.alternatives();
    let codes: Vec<&str> = alternatives.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["A01", "A03", "A09"]);
    assert!(
        alternatives
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity)
    );
}
