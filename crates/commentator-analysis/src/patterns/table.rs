//! Partial pattern tables built per file and merged.
//!
//! Merging is associative and commutative: support counts add up, and the
//! text kept for a de-duplicated template is the one seen first in corpus
//! order, so any reduction order yields the same table.

use commentator_core::types::collections::FxHashMap;

use super::key::PatternKey;
use super::model::{PatternEntry, PatternModel};
use super::template::normalize_for_dedup;

/// Corpus position of a comment: file index in walk order, then construct
/// ordinal within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SeenAt {
    pub file: u32,
    pub ordinal: u32,
}

impl SeenAt {
    pub fn new(file: u32, ordinal: u32) -> Self {
        Self { file, ordinal }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStats {
    pub template: String,
    pub support: u32,
    pub first_seen: SeenAt,
}

#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    /// key -> normalized template -> stats
    entries: FxHashMap<PatternKey, FxHashMap<String, TemplateStats>>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more supporting comment for `template` under `key`.
    pub fn record(&mut self, key: PatternKey, template: String, seen: SeenAt) {
        let normalized = normalize_for_dedup(&template);
        let stats = TemplateStats {
            template,
            support: 1,
            first_seen: seen,
        };
        Self::absorb(self.entries.entry(key).or_default(), normalized, stats);
    }

    fn absorb(slot: &mut FxHashMap<String, TemplateStats>, normalized: String, stats: TemplateStats) {
        match slot.get_mut(&normalized) {
            Some(existing) => {
                existing.support = existing.support.saturating_add(stats.support);
                if stats.first_seen < existing.first_seen {
                    existing.first_seen = stats.first_seen;
                    existing.template = stats.template;
                }
            }
            None => {
                slot.insert(normalized, stats);
            }
        }
    }

    /// Combine two partial tables.
    pub fn merge(mut self, other: PatternTable) -> PatternTable {
        for (key, templates) in other.entries {
            let slot = self.entries.entry(key).or_default();
            for (normalized, stats) in templates {
                Self::absorb(slot, normalized, stats);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn template_count(&self) -> usize {
        self.entries.values().map(|t| t.len()).sum()
    }

    /// Support recorded for a template (matched after normalization).
    pub fn support(&self, key: PatternKey, template: &str) -> u32 {
        self.entries
            .get(&key)
            .and_then(|t| t.get(&normalize_for_dedup(template)))
            .map_or(0, |s| s.support)
    }

    /// Rank, filter and cap each key's templates into the immutable model.
    pub fn finalize(self, max_templates_per_key: usize, min_support: u32) -> PatternModel {
        let mut model = PatternModel::empty();
        for (key, templates) in self.entries {
            let mut ranked: Vec<TemplateStats> = templates
                .into_values()
                .filter(|s| s.support >= min_support.max(1))
                .collect();
            ranked.sort_by(|a, b| {
                b.support
                    .cmp(&a.support)
                    .then(a.first_seen.cmp(&b.first_seen))
                    .then_with(|| a.template.cmp(&b.template))
            });
            ranked.truncate(max_templates_per_key);
            if ranked.is_empty() {
                continue;
            }
            model.insert(
                key,
                ranked
                    .into_iter()
                    .map(|s| PatternEntry {
                        template: s.template,
                        support: s.support,
                    })
                    .collect(),
            );
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ConstructKind, NamingBucket};

    fn loop_key() -> PatternKey {
        PatternKey::new(ConstructKind::Loop, NamingBucket::ShortLoopVariable)
    }

    #[test]
    fn duplicates_accumulate_support() {
        let mut table = PatternTable::new();
        table.record(loop_key(), "Iterate over {name}.".into(), SeenAt::new(0, 0));
        table.record(loop_key(), "iterate  over {name}".into(), SeenAt::new(0, 1));
        assert_eq!(table.template_count(), 1);
        assert_eq!(table.support(loop_key(), "Iterate over {name}"), 2);
    }

    #[test]
    fn merge_keeps_earliest_text_in_any_order() {
        let mut a = PatternTable::new();
        a.record(loop_key(), "Walk {name}".into(), SeenAt::new(3, 0));
        let mut b = PatternTable::new();
        b.record(loop_key(), "walk {name}.".into(), SeenAt::new(1, 4));

        let ab = a.clone().merge(b.clone()).finalize(8, 1);
        let ba = b.merge(a).finalize(8, 1);
        assert_eq!(ab, ba);
        let entries = ab.get(loop_key());
        assert_eq!(entries[0].template, "walk {name}.");
        assert_eq!(entries[0].support, 2);
    }

    #[test]
    fn finalize_ranks_caps_and_filters() {
        let mut table = PatternTable::new();
        for i in 0..3 {
            table.record(loop_key(), "common".into(), SeenAt::new(0, i));
        }
        table.record(loop_key(), "rare one".into(), SeenAt::new(0, 10));
        table.record(loop_key(), "rare two".into(), SeenAt::new(0, 11));

        let model = table.clone().finalize(2, 1);
        let names: Vec<_> = model.get(loop_key()).iter().map(|e| e.template.as_str()).collect();
        assert_eq!(names, vec!["common", "rare one"]);

        let strict = table.finalize(8, 2);
        assert_eq!(strict.get(loop_key()).len(), 1);
    }

    #[test]
    fn keys_with_nothing_left_are_omitted() {
        let mut table = PatternTable::new();
        table.record(loop_key(), "once".into(), SeenAt::default());
        assert!(table.finalize(8, 5).is_empty());
    }
}
