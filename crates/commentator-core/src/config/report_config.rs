//! Report configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the report assembler.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Suggestions below this confidence are left out. Default: 0.0.
    pub min_confidence: Option<f64>,
    /// Output format: "markdown" or "json". Default: markdown.
    pub format: Option<String>,
}

impl ReportConfig {
    pub fn effective_min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(0.0)
    }

    pub fn effective_format(&self) -> &str {
        self.format.as_deref().unwrap_or("markdown")
    }
}
