//! Domain dictionary: user-maintained meanings for identifiers and magic values.
//!
//! An immutable snapshot loaded once per run. Identifier keys match exactly
//! and case-sensitively; numeric keys are normalized at load so lookups by a
//! literal's normalized key hit regardless of how either side spelled it.

pub mod fuzzy;
pub mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use commentator_core::errors::DictionaryError;
use commentator_core::types::collections::FxHashMap;

pub use fuzzy::FuzzyMatcher;

use crate::lexer::literals::{looks_numeric, normalize_numeric};
use crate::lexer::LiteralValue;

/// How a dictionary entry matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// What the matched key was looked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitSource {
    Identifier,
    Literal,
}

/// One dictionary match for a construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryHit {
    /// Dictionary key that matched.
    pub key: String,
    pub meaning: String,
    pub source: HitSource,
    pub kind: MatchKind,
    /// The identifier or literal text looked up.
    pub subject: String,
}

impl DictionaryHit {
    /// Meaning as it should read inside a comment. Fuzzy identifier hits
    /// name the identifier they were inferred from.
    pub fn rendered(&self) -> String {
        match self.kind {
            MatchKind::Exact => self.meaning.clone(),
            MatchKind::Fuzzy => format!("{} ({})", self.meaning, self.subject),
        }
    }
}

/// Normalize a dictionary key: numeric keys to their literal normal form,
/// everything else untouched.
pub fn normalize_key(key: &str) -> String {
    let trimmed = key.trim();
    if looks_numeric(trimmed) {
        normalize_numeric(trimmed).unwrap_or_else(|| trimmed.to_string())
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    entries: FxHashMap<String, String>,
    fuzzy: Option<FuzzyMatcher>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw key/meaning pairs. Later duplicates (after key
    /// normalization) replace earlier ones.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = FxHashMap::default();
        for (key, meaning) in entries {
            let normalized = normalize_key(key.as_ref());
            if let Some(previous) = map.insert(normalized.clone(), meaning.into()) {
                tracing::warn!(key = %normalized, previous = %previous, "duplicate dictionary key after normalization");
            }
        }
        Self {
            entries: map,
            fuzzy: None,
        }
    }

    /// Load from a `.json` or `.toml` file.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        loader::load(path)
    }

    /// Load if the file exists; an absent file is an empty dictionary.
    pub fn load_optional(path: &Path) -> Result<Self, DictionaryError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no dictionary file, continuing without domain knowledge");
            Ok(Self::new())
        }
    }

    /// Enable fuzzy identifier matching over the current entries.
    pub fn with_fuzzy_matching(mut self) -> Self {
        self.fuzzy = Some(FuzzyMatcher::new(self.entries.keys().map(String::as_str)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Entries sorted by key.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        out.sort_unstable();
        out
    }

    /// Exact, case-sensitive identifier lookup.
    pub fn lookup_identifier(&self, name: &str) -> Option<DictionaryHit> {
        self.get(name).map(|meaning| DictionaryHit {
            key: name.to_string(),
            meaning: meaning.to_string(),
            source: HitSource::Identifier,
            kind: MatchKind::Exact,
            subject: name.to_string(),
        })
    }

    /// Lookup by a literal's normalized key (raw text for malformed literals).
    pub fn lookup_literal(&self, literal: &LiteralValue) -> Option<DictionaryHit> {
        self.get(&literal.key).map(|meaning| DictionaryHit {
            key: literal.key.clone(),
            meaning: meaning.to_string(),
            source: HitSource::Literal,
            kind: MatchKind::Exact,
            subject: literal.raw.clone(),
        })
    }

    /// Fuzzy identifier lookup; `None` unless fuzzy matching is enabled.
    pub fn fuzzy_identifier(&self, name: &str) -> Option<DictionaryHit> {
        let matcher = self.fuzzy.as_ref()?;
        let key = matcher.best_match(name)?;
        self.get(key).map(|meaning| DictionaryHit {
            key: key.to_string(),
            meaning: meaning.to_string(),
            source: HitSource::Identifier,
            kind: MatchKind::Fuzzy,
            subject: name.to_string(),
        })
    }

    /// Identifier lookup: exact first, then fuzzy if enabled.
    pub fn resolve_identifier(&self, name: &str) -> Option<DictionaryHit> {
        self.lookup_identifier(name)
            .or_else(|| self.fuzzy_identifier(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_are_normalized() {
        let dict = Dictionary::from_entries([("0xA000", "Terrain Height Base"), ("1'000", "One thousand")]);
        let hit = dict.lookup_literal(&LiteralValue::new("0xa000u")).unwrap();
        assert_eq!(hit.meaning, "Terrain Height Base");
        assert_eq!(hit.key, "0xa000");
        assert_eq!(hit.subject, "0xa000u");
        assert!(dict.lookup_literal(&LiteralValue::new("1000")).is_some());
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        let dict = Dictionary::from_entries([("player_id", "Unique Entity ID")]);
        assert!(dict.lookup_identifier("player_id").is_some());
        assert!(dict.lookup_identifier("Player_ID").is_none());
    }

    #[test]
    fn malformed_literal_matches_raw_key() {
        let dict = Dictionary::from_entries([("10_km", "Ten kilometres")]);
        assert!(dict.lookup_literal(&LiteralValue::new("10_km")).is_some());
    }

    #[test]
    fn fuzzy_is_opt_in_and_rendered_with_identifier() {
        let dict = Dictionary::from_entries([("terrain", "Terrain Data")]);
        assert!(dict.resolve_identifier("terrain_height").is_none());

        let dict = dict.with_fuzzy_matching();
        let hit = dict.resolve_identifier("terrain_height").unwrap();
        assert_eq!(hit.kind, MatchKind::Fuzzy);
        assert_eq!(hit.rendered(), "Terrain Data (terrain_height)");
    }

    #[test]
    fn exact_beats_fuzzy() {
        let dict = Dictionary::from_entries([("terrain", "Terrain Data"), ("terrain_height", "Height map")])
            .with_fuzzy_matching();
        let hit = dict.resolve_identifier("terrain_height").unwrap();
        assert_eq!(hit.kind, MatchKind::Exact);
        assert_eq!(hit.rendered(), "Height map");
    }

    #[test]
    fn entries_are_sorted() {
        let dict = Dictionary::from_entries([("b", "2"), ("a", "1")]);
        assert_eq!(dict.entries(), vec![("a", "1"), ("b", "2")]);
    }
}
