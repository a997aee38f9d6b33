//! Pattern learning configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the pattern learning engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LearningConfig {
    /// Templates kept per (kind, bucket) key after ranking. Default: 8.
    pub max_templates_per_key: Option<usize>,
    /// Minimum support for a template to be persisted. Default: 1.
    pub min_support: Option<u32>,
}

impl LearningConfig {
    /// Returns the effective top-N bound, defaulting to 8.
    pub fn effective_max_templates_per_key(&self) -> usize {
        self.max_templates_per_key.unwrap_or(8)
    }

    /// Returns the effective minimum support, defaulting to 1.
    pub fn effective_min_support(&self) -> u32 {
        self.min_support.unwrap_or(1).max(1)
    }
}
