//! Input artifact locations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default dictionary file name, looked up in the source root.
pub const DEFAULT_DICTIONARY_FILE: &str = "domain.json";

/// Default pattern model file name, looked up in the source root.
pub const DEFAULT_PATTERNS_FILE: &str = "comment_patterns.json";

/// Paths to the dictionary and pattern model.
///
/// An explicitly configured path must exist; the defaults are optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    pub dictionary: Option<PathBuf>,
    pub patterns: Option<PathBuf>,
}
