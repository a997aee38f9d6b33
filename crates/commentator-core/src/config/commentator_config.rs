//! Top-level commentator configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    FusionMode, GenerationConfig, LearningConfig, PathsConfig, ReportConfig, ScanConfig,
};
use crate::errors::ConfigError;

/// Project config file name, looked up in the source root.
pub const PROJECT_CONFIG_FILE: &str = "commentator.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`COMMENTATOR_*`)
/// 3. Project config (`commentator.toml` in the source root)
/// 4. User config (`~/.commentator/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CommentatorConfig {
    pub scan: ScanConfig,
    pub learning: LearningConfig,
    pub generation: GenerationConfig,
    pub report: ReportConfig,
    pub paths: PathsConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub exclude: Option<Vec<String>>,
    pub threads: Option<usize>,
    pub dictionary: Option<PathBuf>,
    pub patterns: Option<PathBuf>,
    pub min_confidence: Option<f64>,
    pub report_format: Option<String>,
    pub fusion_mode: Option<FusionMode>,
}

impl CommentatorConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
                tracing::debug!(path = %user_config_path.display(), "merged user config");
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
            tracing::debug!(path = %project_config_path.display(), "merged project config");
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CommentatorConfig) -> Result<(), ConfigError> {
        let unit_fields = [
            ("generation.pattern_weight", config.generation.pattern_weight),
            ("generation.dictionary_bonus", config.generation.dictionary_bonus),
            ("generation.fuzzy_bonus", config.generation.fuzzy_bonus),
            (
                "generation.structural_confidence",
                config.generation.structural_confidence,
            ),
            ("report.min_confidence", config.report.min_confidence),
        ];
        for (field, value) in unit_fields {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0.0 and 1.0".to_string(),
                    });
                }
            }
        }
        if let Some(prior) = config.generation.support_prior {
            if !prior.is_finite() || prior < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "generation.support_prior".to_string(),
                    message: "must be a non-negative number".to_string(),
                });
            }
        }
        if config.learning.max_templates_per_key == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "learning.max_templates_per_key".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(format) = &config.report.format {
            if format != "markdown" && format != "json" {
                return Err(ConfigError::InvalidValue {
                    field: "report.format".to_string(),
                    message: format!("unknown format '{format}' (expected markdown or json)"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.commentator/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".commentator").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut CommentatorConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CommentatorConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut CommentatorConfig, other: &CommentatorConfig) {
        // Scan
        if !other.scan.exclude.is_empty() {
            base.scan.exclude = other.scan.exclude.clone();
        }
        if !other.scan.extensions.is_empty() {
            base.scan.extensions = other.scan.extensions.clone();
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.include_hidden.is_some() {
            base.scan.include_hidden = other.scan.include_hidden;
        }

        // Learning
        if other.learning.max_templates_per_key.is_some() {
            base.learning.max_templates_per_key = other.learning.max_templates_per_key;
        }
        if other.learning.min_support.is_some() {
            base.learning.min_support = other.learning.min_support;
        }

        // Generation
        let g = &other.generation;
        if g.pattern_weight.is_some() {
            base.generation.pattern_weight = g.pattern_weight;
        }
        if g.dictionary_bonus.is_some() {
            base.generation.dictionary_bonus = g.dictionary_bonus;
        }
        if g.fuzzy_bonus.is_some() {
            base.generation.fuzzy_bonus = g.fuzzy_bonus;
        }
        if g.structural_confidence.is_some() {
            base.generation.structural_confidence = g.structural_confidence;
        }
        if g.support_prior.is_some() {
            base.generation.support_prior = g.support_prior;
        }
        if g.fusion_mode.is_some() {
            base.generation.fusion_mode = g.fusion_mode;
        }
        if g.fuzzy_identifier_match.is_some() {
            base.generation.fuzzy_identifier_match = g.fuzzy_identifier_match;
        }
        if g.structural_fallback.is_some() {
            base.generation.structural_fallback = g.structural_fallback;
        }

        // Report
        if other.report.min_confidence.is_some() {
            base.report.min_confidence = other.report.min_confidence;
        }
        if other.report.format.is_some() {
            base.report.format = other.report.format.clone();
        }

        // Paths
        if other.paths.dictionary.is_some() {
            base.paths.dictionary = other.paths.dictionary.clone();
        }
        if other.paths.patterns.is_some() {
            base.paths.patterns = other.paths.patterns.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `COMMENTATOR_SCAN_THREADS`, `COMMENTATOR_REPORT_MIN_CONFIDENCE`, etc.
    fn apply_env_overrides(config: &mut CommentatorConfig) {
        if let Ok(val) = std::env::var("COMMENTATOR_SCAN_EXCLUDE") {
            config.scan.exclude = split_list(&val);
        }
        if let Ok(val) = std::env::var("COMMENTATOR_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMMENTATOR_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMMENTATOR_LEARNING_MAX_TEMPLATES") {
            if let Ok(v) = val.parse::<usize>() {
                config.learning.max_templates_per_key = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMMENTATOR_GENERATION_FUSION_MODE") {
            if let Ok(v) = val.parse::<FusionMode>() {
                config.generation.fusion_mode = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMMENTATOR_REPORT_MIN_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.report.min_confidence = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COMMENTATOR_DICTIONARY") {
            config.paths.dictionary = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("COMMENTATOR_PATTERNS") {
            config.paths.patterns = Some(PathBuf::from(val));
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CommentatorConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.exclude {
            config.scan.exclude = v.clone();
        }
        if let Some(v) = cli.threads {
            config.scan.threads = Some(v);
        }
        if let Some(ref v) = cli.dictionary {
            config.paths.dictionary = Some(v.clone());
        }
        if let Some(ref v) = cli.patterns {
            config.paths.patterns = Some(v.clone());
        }
        if let Some(v) = cli.min_confidence {
            config.report.min_confidence = Some(v);
        }
        if let Some(ref v) = cli.report_format {
            config.report.format = Some(v.clone());
        }
        if let Some(v) = cli.fusion_mode {
            config.generation.fusion_mode = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Split a comma-separated list, trimming blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
