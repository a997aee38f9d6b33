//! The persisted pattern model.
//!
//! On disk it is a JSON object mapping `"<kind>:<bucket>"` to a list of
//! `{template, support}` ordered by descending support. Loading validates
//! every key and template; a hand-edited model that breaks the shape is
//! rejected rather than half-used.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use commentator_core::errors::ModelError;

use super::key::PatternKey;
use super::template::{is_slot_only, normalize_for_dedup};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub template: String,
    pub support: u32,
}

/// Finalized, read-only pattern model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternModel {
    entries: BTreeMap<PatternKey, Vec<PatternEntry>>,
}

impl PatternModel {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: PatternKey, entries: Vec<PatternEntry>) {
        self.entries.insert(key, entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn template_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Templates for a key, highest support first. Empty if unknown.
    pub fn get(&self, key: PatternKey) -> &[PatternEntry] {
        self.entries.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Sum of support over every template under `key`.
    pub fn total_support(&self, key: PatternKey) -> u64 {
        self.get(key).iter().map(|e| u64::from(e.support)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternKey, &[PatternEntry])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let wire: BTreeMap<String, &Vec<PatternEntry>> =
            self.entries.iter().map(|(k, v)| (k.to_string(), v)).collect();
        serde_json::to_string_pretty(&wire)
    }

    /// Parse and validate a persisted model. `path` is only used in errors.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ModelError> {
        let wire: BTreeMap<String, Vec<PatternEntry>> =
            serde_json::from_str(text).map_err(|e| ModelError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut model = Self::empty();
        for (raw_key, mut entries) in wire {
            let key: PatternKey = raw_key.parse().map_err(|_| ModelError::InvalidKey {
                path: path.to_path_buf(),
                key: raw_key.clone(),
            })?;
            let mut seen = Vec::with_capacity(entries.len());
            for entry in &entries {
                let invalid = |message: &str| ModelError::InvalidTemplate {
                    path: path.to_path_buf(),
                    key: raw_key.clone(),
                    message: message.to_string(),
                };
                if entry.template.trim().is_empty() {
                    return Err(invalid("empty template"));
                }
                if is_slot_only(&entry.template) {
                    return Err(invalid(&format!("'{}' has no text besides slots", entry.template)));
                }
                if entry.support == 0 {
                    return Err(invalid(&format!("'{}' has zero support", entry.template)));
                }
                let normalized = normalize_for_dedup(&entry.template);
                if seen.contains(&normalized) {
                    return Err(invalid(&format!("'{}' is listed twice", entry.template)));
                }
                seen.push(normalized);
            }
            // Stable: an already ordered list is untouched.
            entries.sort_by(|a, b| b.support.cmp(&a.support));
            if !entries.is_empty() {
                model.insert(key, entries);
            }
        }
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let model = Self::from_json(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            keys = model.key_count(),
            templates = model.template_count(),
            "pattern model loaded"
        );
        Ok(model)
    }

    /// Load if the file exists, otherwise an empty model.
    pub fn load_optional(path: &Path) -> Result<Self, ModelError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no pattern model found, continuing without patterns");
            Ok(Self::empty())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let json = self.to_json().map_err(|e| ModelError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| ModelError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!(
            path = %path.display(),
            keys = self.key_count(),
            templates = self.template_count(),
            "pattern model saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ConstructKind, NamingBucket};

    fn sample() -> PatternModel {
        let mut model = PatternModel::empty();
        model.insert(
            PatternKey::new(ConstructKind::Loop, NamingBucket::ShortLoopVariable),
            vec![
                PatternEntry { template: "Walk every {name}".into(), support: 4 },
                PatternEntry { template: "Loop over items".into(), support: 1 },
            ],
        );
        model
    }

    #[test]
    fn json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let list = &value["loop:short-loop-variable"];
        assert_eq!(list[0]["template"], "Walk every {name}");
        assert_eq!(list[0]["support"], 4);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comment_patterns.json");
        let model = sample();
        model.save(&path).unwrap();
        assert_eq!(PatternModel::load(&path).unwrap(), model);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PatternModel::from_json(r#"{"loop:nope": []}"#, Path::new("m.json")).unwrap_err();
        assert!(matches!(err, ModelError::InvalidKey { .. }));
    }

    #[test]
    fn rejects_bad_templates() {
        for body in [
            r#"{"loop:unnamed": [{"template": "", "support": 1}]}"#,
            r#"{"loop:unnamed": [{"template": "{name}", "support": 1}]}"#,
            r#"{"loop:unnamed": [{"template": "walk", "support": 0}]}"#,
            r#"{"loop:unnamed": [{"template": "walk", "support": 2}, {"template": "Walk.", "support": 1}]}"#,
        ] {
            let err = PatternModel::from_json(body, Path::new("m.json")).unwrap_err();
            assert!(matches!(err, ModelError::InvalidTemplate { .. }), "{body}");
        }
    }

    #[test]
    fn rejects_malformed_json() {
        let err = PatternModel::from_json("[1, 2", Path::new("m.json")).unwrap_err();
        assert!(matches!(err, ModelError::Corrupt { .. }));
    }

    #[test]
    fn unsorted_lists_are_ranked_on_load() {
        let model = PatternModel::from_json(
            r#"{"conditional:single-word": [{"template": "b", "support": 1}, {"template": "a", "support": 3}]}"#,
            Path::new("m.json"),
        )
        .unwrap();
        let key = PatternKey::new(ConstructKind::Conditional, NamingBucket::SingleWord);
        assert_eq!(model.get(key)[0].template, "a");
        assert_eq!(model.total_support(key), 4);
    }

    #[test]
    fn missing_model_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let model = PatternModel::load_optional(&dir.path().join("absent.json")).unwrap();
        assert!(model.is_empty());
    }
}
