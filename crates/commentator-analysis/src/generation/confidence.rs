//! Confidence scoring.
//!
//! `pattern_weight * share * evidence + bonus`, clamped to `[0, 1]`, where
//! `share` is the template's fraction of its key's support and `evidence`
//! is `support / (support + prior)`. A single supporting comment therefore
//! scores less than a template seen many times.

use commentator_core::config::{FusionMode, GenerationConfig};

/// Resolved generation knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub pattern_weight: f64,
    pub dictionary_bonus: f64,
    pub fuzzy_bonus: f64,
    pub structural_confidence: f64,
    pub support_prior: f64,
    pub fusion_mode: FusionMode,
    pub structural_fallback: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for GenerationSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            pattern_weight: config.effective_pattern_weight(),
            dictionary_bonus: config.effective_dictionary_bonus(),
            fuzzy_bonus: config.effective_fuzzy_bonus(),
            structural_confidence: config.effective_structural_confidence(),
            support_prior: config.effective_support_prior(),
            fusion_mode: config.effective_fusion_mode(),
            structural_fallback: config.effective_structural_fallback(),
        }
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Pattern contribution for a template with `support` under a key whose
/// templates total `key_support`.
pub fn pattern_score(support: u32, key_support: u64, settings: &GenerationSettings) -> f64 {
    if support == 0 || key_support == 0 {
        return 0.0;
    }
    let support = f64::from(support);
    let share = support / key_support as f64;
    let prior = settings.support_prior.max(0.0);
    let evidence = support / (support + prior);
    settings.pattern_weight * share.min(1.0) * evidence
}

/// Bonus for dictionary evidence: exact beats fuzzy, none is zero.
pub fn dictionary_bonus(has_exact: bool, has_fuzzy: bool, settings: &GenerationSettings) -> f64 {
    if has_exact {
        settings.dictionary_bonus
    } else if has_fuzzy {
        settings.fuzzy_bonus
    } else {
        0.0
    }
}
