//! Fuzzy identifier matching against dictionary terms.
//!
//! Terms of three or more characters match anywhere inside the lowercased
//! identifier. Shorter terms must equal the identifier or sit against an
//! underscore (`_id`, `id_`). The longest matching term wins; equal lengths
//! resolve to the lexicographically smaller term.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::lexer::literals::looks_numeric;

/// Terms shorter than this only match at underscore boundaries.
const MIN_CONTAINED_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    /// Lowercased long terms, index-aligned with `long_keys`.
    automaton: Option<AhoCorasick>,
    long_keys: Vec<String>,
    /// (lowercased term, original key), longest first.
    short_terms: Vec<(String, String)>,
}

impl FuzzyMatcher {
    pub fn new<'k>(keys: impl IntoIterator<Item = &'k str>) -> Self {
        let mut long_keys: Vec<String> = Vec::new();
        let mut short_terms: Vec<(String, String)> = Vec::new();
        for key in keys {
            if key.is_empty() || looks_numeric(key) {
                continue;
            }
            if key.chars().count() >= MIN_CONTAINED_LEN {
                long_keys.push(key.to_string());
            } else {
                short_terms.push((key.to_lowercase(), key.to_string()));
            }
        }
        // Longest first, then lexicographic, so pattern index order is the
        // preference order.
        long_keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        short_terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(&b.1)));

        let patterns: Vec<String> = long_keys.iter().map(|k| k.to_lowercase()).collect();
        let automaton = if patterns.is_empty() {
            None
        } else {
            AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&patterns)
                .map_err(|e| tracing::warn!(error = %e, "fuzzy dictionary automaton unavailable"))
                .ok()
        };

        Self {
            automaton,
            long_keys,
            short_terms,
        }
    }

    /// Best matching dictionary key for `identifier`, if any.
    pub fn best_match(&self, identifier: &str) -> Option<&str> {
        let lower = identifier.to_lowercase();

        if let Some(ac) = &self.automaton {
            let best = ac
                .find_overlapping_iter(&lower)
                .map(|m| m.pattern().as_usize())
                .min();
            if let Some(index) = best {
                return self.long_keys.get(index).map(String::as_str);
            }
        }

        self.short_terms
            .iter()
            .find(|(term, _)| {
                lower == *term
                    || lower.contains(&format!("_{term}"))
                    || lower.contains(&format!("{term}_"))
            })
            .map(|(_, key)| key.as_str())
    }
}
