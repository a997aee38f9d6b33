//! Markdown reporter: one section per file, one entry per suggestion.

use std::fmt::Write;

use commentator_core::errors::ReportError;

use super::{Reporter, SuggestionReport};

pub struct MarkdownReporter;

impl Reporter for MarkdownReporter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn generate(&self, report: &SuggestionReport<'_>) -> Result<String, ReportError> {
        render(report).map_err(|e| ReportError::Render(e.to_string()))
    }
}

fn render(report: &SuggestionReport<'_>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# Comment Suggestions Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Scanned {} files under `{}`: {} suggestions (confidence >= {:.2}).",
        report.files_scanned,
        report.root,
        report.suggestions.len(),
        report.min_confidence
    )?;
    let stats = report.stats;
    writeln!(out)?;
    writeln!(out, "- Constructs analyzed: {}", stats.constructs)?;
    writeln!(out, "- Already commented: {}", stats.pre_commented)?;
    writeln!(out, "- Phrased from learned patterns: {}", stats.from_patterns)?;
    writeln!(out, "- Using the domain dictionary: {}", stats.from_dictionary)?;
    if stats.structural_only > 0 {
        writeln!(out, "- Structural heuristics only: {}", stats.structural_only)?;
    }
    if report.filtered_out() > 0 {
        writeln!(out, "- Below confidence floor: {}", report.filtered_out())?;
    }

    for (file, suggestions) in report.by_file() {
        writeln!(out)?;
        writeln!(out, "## File: `{file}`")?;
        writeln!(out)?;
        for s in suggestions {
            let c = &s.construct;
            match c.identifier() {
                Some(name) => write!(out, "- Line {}: {} `{}`", c.location.line_start, c.kind, name)?,
                None => write!(out, "- Line {}: {}", c.location.line_start, c.kind)?,
            }
            writeln!(out, " (confidence {:.2}, {})", s.confidence, s.provenance.label())?;
            writeln!(out, "  `// {}`", s.text)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::generation::{GenerationSettings, GenerationStats, SuggestionEngine};
    use crate::patterns::PatternModel;
    use crate::pipeline::suggest_source;

    #[test]
    fn groups_by_file_with_entries() {
        let dict = Dictionary::from_entries([("0xA000", "Terrain Height Base"), ("count", "Item count")]);
        let model = PatternModel::empty();
        let engine = SuggestionEngine::new(&model, &dict, GenerationSettings::default());
        let (mut all, mut stats) = suggest_source(&engine, "a.cpp", "int base = 0xA000;\n");
        let (more, more_stats) = suggest_source(&engine, "b.cpp", "\n\nint count = 0;\n");
        all.extend(more);
        stats += more_stats;

        let report = SuggestionReport::new("src", 2, &all, &stats, 0.0);
        let text = MarkdownReporter.generate(&report).unwrap();
        assert!(text.starts_with("# Comment Suggestions Report\n"));
        assert!(text.contains("## File: `a.cpp`\n\n- Line 1: variable-declaration `base` (confidence 0.40, dictionary)\n  `// Terrain Height Base`\n"));
        assert!(text.contains("## File: `b.cpp`"));
        assert!(text.contains("- Line 3: variable-declaration `count`"));
    }

    #[test]
    fn floor_filters_entries() {
        let stats = GenerationStats::default();
        let report = SuggestionReport::new("src", 0, &[], &stats, 0.5);
        let text = MarkdownReporter.generate(&report).unwrap();
        assert!(!text.contains("## File:"));
        assert!(text.contains("0 suggestions (confidence >= 0.50)"));
    }
}
