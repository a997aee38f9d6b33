//! Suggestion records.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::dictionary::{DictionaryHit, MatchKind};
use crate::structure::Construct;

/// A signal that contributed to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    PatternHit,
    DictionaryHit,
    StructuralOnly,
}

/// The learned template a suggestion was phrased with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternHit {
    /// `"<kind>:<bucket>"`
    pub key: String,
    pub template: String,
    pub support: u32,
    /// Total support of every template under the key.
    pub key_support: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub signals: Vec<Signal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternHit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dictionary: Vec<DictionaryHit>,
}

impl Provenance {
    pub fn has(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    pub fn is_structural_only(&self) -> bool {
        self.signals == [Signal::StructuralOnly]
    }

    /// Only fuzzy dictionary matches contributed.
    pub fn fuzzy_only(&self) -> bool {
        !self.dictionary.is_empty() && self.dictionary.iter().all(|h| h.kind == MatchKind::Fuzzy)
    }

    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match (self.has(Signal::PatternHit), self.has(Signal::DictionaryHit)) {
            (true, true) => "pattern+dictionary",
            (true, false) => "pattern",
            (false, true) => "dictionary",
            (false, false) => "structural",
        }
    }
}

/// A generated comment for one uncommented construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable across runs over the same source.
    pub id: String,
    pub construct: Construct,
    pub text: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub provenance: Provenance,
}

impl Suggestion {
    pub fn file(&self) -> &str {
        &self.construct.location.file
    }

    pub fn line(&self) -> u32 {
        self.construct.location.line_start
    }
}

/// Stable id from file, line, kind and identifier.
pub fn suggestion_id(construct: &Construct) -> String {
    let seed = format!(
        "{}\0{}\0{}\0{}",
        construct.location.file,
        construct.location.line_start,
        construct.kind.name(),
        construct.identifier().unwrap_or("")
    );
    format!("{:016x}", xxh3_64(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::scan_source;

    #[test]
    fn ids_are_stable_and_distinct() {
        let scan = scan_source("a.cpp", "int a = 1;\nint b = 2;\n");
        let a = suggestion_id(&scan.constructs[0]);
        assert_eq!(a.len(), 16);
        assert_eq!(a, suggestion_id(&scan.constructs[0]));
        assert_ne!(a, suggestion_id(&scan.constructs[1]));
        let again = scan_source("a.cpp", "int a = 1;\nint b = 2;\n");
        assert_eq!(a, suggestion_id(&again.constructs[0]));
    }

    #[test]
    fn provenance_labels() {
        let mut p = Provenance {
            signals: vec![Signal::PatternHit, Signal::DictionaryHit],
            ..Default::default()
        };
        assert_eq!(p.label(), "pattern+dictionary");
        p.signals = vec![Signal::StructuralOnly];
        assert_eq!(p.label(), "structural");
        assert!(p.is_structural_only());
        assert!(!p.fuzzy_only());
    }
}
