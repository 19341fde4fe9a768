//! Controlled diagnosis vocabulary.
//!
//! Loaded once per session (see `cbs-ingest`) and passed by reference into
//! the matcher, so tests can supply a fixed vocabulary without touching
//! process-wide state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One vocabulary entry: a diagnosis code and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    pub code: String,
    pub name: String,
}

/// The controlled vocabulary with case-insensitive exact lookup.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<DiagnosisEntry>,
    index: BTreeMap<String, usize>,
}

impl Vocabulary {
    pub fn new(entries: Vec<DiagnosisEntry>) -> Self {
        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            // First definition of a code wins.
            index.entry(entry.code.to_uppercase()).or_insert(position);
        }
        Self { entries, index }
    }

    /// Case-insensitive exact lookup by code.
    pub fn lookup(&self, code: &str) -> Option<&DiagnosisEntry> {
        self.index
            .get(&code.trim().to_uppercase())
            .map(|&position| &self.entries[position])
    }

    pub fn entries(&self) -> &[DiagnosisEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(vec![
            DiagnosisEntry {
                code: "I64".to_string(),
                name: "Stroke, not specified".to_string(),
            },
            DiagnosisEntry {
                code: "J18.9".to_string(),
                name: "Pneumonia, unspecified".to_string(),
            },
        ])
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let vocabulary = vocabulary();
        assert_eq!(vocabulary.lookup("i64").unwrap().code, "I64");
        assert_eq!(vocabulary.lookup(" J18.9 ").unwrap().code, "J18.9");
        assert!(vocabulary.lookup("A00").is_none());
    }

    #[test]
    fn first_definition_wins() {
        let vocabulary = Vocabulary::new(vec![
            DiagnosisEntry {
                code: "I64".to_string(),
                name: "first".to_string(),
            },
            DiagnosisEntry {
                code: "i64".to_string(),
                name: "second".to_string(),
            },
        ]);
        assert_eq!(vocabulary.lookup("I64").unwrap().name, "first");
        assert_eq!(vocabulary.len(), 2);
    }
}
