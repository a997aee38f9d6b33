//! Generation (signal fusion and confidence) configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a dictionary hit and a pattern hit combine when both exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FusionMode {
    /// Pattern phrasing, dictionary meanings fill its slots, both signals score.
    #[default]
    Fuse,
    /// A dictionary hit supplies the text; confidence is the stronger of the
    /// two signals.
    DictionaryFirst,
    /// A usable pattern supplies the text; confidence is the stronger of the
    /// two signals.
    PatternFirst,
}

impl FusionMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fuse => "fuse",
            Self::DictionaryFirst => "dictionary-first",
            Self::PatternFirst => "pattern-first",
        }
    }
}

impl fmt::Display for FusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FusionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuse" => Ok(Self::Fuse),
            "dictionary-first" => Ok(Self::DictionaryFirst),
            "pattern-first" => Ok(Self::PatternFirst),
            other => Err(format!("unknown fusion mode '{other}'")),
        }
    }
}

/// Configuration for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GenerationConfig {
    /// Weight of the normalized pattern-support signal. Default: 0.6.
    pub pattern_weight: Option<f64>,
    /// Confidence added by an exact dictionary hit. Default: 0.4.
    pub dictionary_bonus: Option<f64>,
    /// Confidence added by a fuzzy (substring) dictionary hit. Default: 0.2.
    pub fuzzy_bonus: Option<f64>,
    /// Fixed confidence of structural-only suggestions. Default: 0.15.
    pub structural_confidence: Option<f64>,
    /// Pseudo-count damping the support signal for thin evidence. Default: 1.0.
    pub support_prior: Option<f64>,
    /// Dictionary/pattern precedence. Default: fuse.
    pub fusion_mode: Option<FusionMode>,
    /// Match dictionary terms inside identifiers. Default: false.
    pub fuzzy_identifier_match: Option<bool>,
    /// Emit heuristic suggestions when no other signal exists. Default: false.
    pub structural_fallback: Option<bool>,
}

impl GenerationConfig {
    pub fn effective_pattern_weight(&self) -> f64 {
        self.pattern_weight.unwrap_or(0.6)
    }

    pub fn effective_dictionary_bonus(&self) -> f64 {
        self.dictionary_bonus.unwrap_or(0.4)
    }

    pub fn effective_fuzzy_bonus(&self) -> f64 {
        self.fuzzy_bonus.unwrap_or(0.2)
    }

    pub fn effective_structural_confidence(&self) -> f64 {
        self.structural_confidence.unwrap_or(0.15)
    }

    pub fn effective_support_prior(&self) -> f64 {
        self.support_prior.unwrap_or(1.0)
    }

    pub fn effective_fusion_mode(&self) -> FusionMode {
        self.fusion_mode.unwrap_or_default()
    }

    pub fn effective_fuzzy_identifier_match(&self) -> bool {
        self.fuzzy_identifier_match.unwrap_or(false)
    }

    pub fn effective_structural_fallback(&self) -> bool {
        self.structural_fallback.unwrap_or(false)
    }
}
