//! Reporters: output formats for suggestion runs.

pub mod json;
pub mod markdown;

use std::fs;
use std::path::Path;

use commentator_core::errors::ReportError;

use crate::generation::{GenerationStats, Suggestion};

/// Default report file for the suggest command.
pub const DEFAULT_REPORT_FILE: &str = "comment_suggestions_report.md";

/// The suggestions a reporter renders, after the confidence floor.
#[derive(Debug, Clone)]
pub struct SuggestionReport<'a> {
    /// Scanned root, as displayed.
    pub root: String,
    pub files_scanned: usize,
    pub min_confidence: f64,
    pub stats: &'a GenerationStats,
    /// Source order: file, then line.
    pub suggestions: Vec<&'a Suggestion>,
}

impl<'a> SuggestionReport<'a> {
    pub fn new(
        root: impl Into<String>,
        files_scanned: usize,
        suggestions: &'a [Suggestion],
        stats: &'a GenerationStats,
        min_confidence: f64,
    ) -> Self {
        Self {
            root: root.into(),
            files_scanned,
            min_confidence,
            stats,
            suggestions: suggestions
                .iter()
                .filter(|s| s.confidence >= min_confidence)
                .collect(),
        }
    }

    /// Suggestions below the floor.
    pub fn filtered_out(&self) -> usize {
        self.stats.suggested.saturating_sub(self.suggestions.len())
    }

    /// Consecutive runs of suggestions sharing a file.
    pub fn by_file(&self) -> Vec<(&'a str, Vec<&'a Suggestion>)> {
        let mut groups: Vec<(&'a str, Vec<&'a Suggestion>)> = Vec::new();
        for &s in &self.suggestions {
            if let Some((file, list)) = groups.last_mut() {
                if *file == s.file() {
                    list.push(s);
                    continue;
                }
            }
            groups.push((s.file(), vec![s]));
        }
        groups
    }
}

/// Trait for report generation.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, report: &SuggestionReport<'_>) -> Result<String, ReportError>;
}

/// Create a reporter by format name.
pub fn create_reporter(format: &str) -> Option<Box<dyn Reporter>> {
    match format {
        "markdown" | "md" => Some(Box::new(markdown::MarkdownReporter)),
        "json" => Some(Box::new(json::JsonReporter)),
        _ => None,
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["markdown", "json"]
}

pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
