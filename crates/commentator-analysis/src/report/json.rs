//! JSON reporter: machine-readable suggestion list.

use serde::Serialize;

use commentator_core::errors::ReportError;

use super::{Reporter, SuggestionReport};
use crate::generation::Signal;
use crate::structure::ConstructKind;

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a str,
    files_scanned: usize,
    min_confidence: f64,
    constructs: usize,
    pre_commented: usize,
    suggestions: Vec<JsonSuggestion<'a>>,
}

#[derive(Serialize)]
struct JsonSuggestion<'a> {
    id: &'a str,
    file: &'a str,
    line: u32,
    line_end: u32,
    kind: ConstructKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<&'a str>,
    comment: &'a str,
    confidence: f64,
    signals: &'a [Signal],
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    meanings: Vec<&'a str>,
}

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, report: &SuggestionReport<'_>) -> Result<String, ReportError> {
        let body = JsonReport {
            root: &report.root,
            files_scanned: report.files_scanned,
            min_confidence: report.min_confidence,
            constructs: report.stats.constructs,
            pre_commented: report.stats.pre_commented,
            suggestions: report
                .suggestions
                .iter()
                .map(|s| JsonSuggestion {
                    id: &s.id,
                    file: s.file(),
                    line: s.construct.location.line_start,
                    line_end: s.construct.location.line_end,
                    kind: s.construct.kind,
                    identifier: s.construct.identifier(),
                    comment: &s.text,
                    confidence: s.confidence,
                    signals: &s.provenance.signals,
                    template: s.provenance.pattern.as_ref().map(|p| p.template.as_str()),
                    meanings: s.provenance.dictionary.iter().map(|h| h.meaning.as_str()).collect(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&body).map_err(|e| ReportError::Render(e.to_string()))
    }
}
