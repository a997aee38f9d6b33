use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use tracing::info;

use commentator_analysis::pipeline::{load_dictionary, load_model, suggest_corpus};
use commentator_analysis::report::{
    available_formats, create_reporter, write_report, SuggestionReport, DEFAULT_REPORT_FILE,
};
use commentator_core::config::FusionMode;
use commentator_core::PipelineError;

use super::{load_config, SourceArgs};

#[derive(Debug, Args)]
pub struct SuggestCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Report path (default: comment_suggestions_report.md, or .json for JSON)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Learned pattern model (default: comment_patterns.json if present)
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Drop suggestions below this confidence
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Report format: markdown or json
    #[arg(long)]
    pub format: Option<String>,

    /// How pattern and dictionary signals combine: fuse, pattern-first, dictionary-first
    #[arg(long)]
    pub fusion_mode: Option<FusionMode>,
}

impl SuggestCommand {
    pub fn execute(self) -> Result<()> {
        let mut overrides = self.source.overrides();
        overrides.patterns = self.patterns.clone();
        overrides.min_confidence = self.min_confidence;
        overrides.report_format = self.format.clone();
        overrides.fusion_mode = self.fusion_mode;

        let root = &self.source.source;
        let config = load_config(root, &overrides)?;
        let dictionary = load_dictionary(&config).map_err(PipelineError::from)?;
        let model = load_model(&config).map_err(PipelineError::from)?;

        let outcome = suggest_corpus(root, &config, &model, &dictionary)
            .with_context(|| format!("scanning {}", root.display()))?;

        let format = config.report.effective_format();
        let reporter = create_reporter(format).ok_or_else(|| {
            anyhow!(
                "unknown report format '{format}' (expected one of: {})",
                available_formats().join(", ")
            )
        })?;
        let report = SuggestionReport::new(
            root.display().to_string(),
            outcome.files,
            &outcome.suggestions,
            &outcome.stats,
            config.report.effective_min_confidence(),
        );
        let content = reporter.generate(&report).map_err(PipelineError::from)?;

        let output = self.output.unwrap_or_else(|| {
            let path = PathBuf::from(DEFAULT_REPORT_FILE);
            if reporter.name() == "json" {
                path.with_extension("json")
            } else {
                path
            }
        });
        write_report(&output, &content)
            .map_err(PipelineError::from)
            .with_context(|| format!("writing report to {}", output.display()))?;

        info!(
            output = %output.display(),
            format = reporter.name(),
            reported = report.suggestions.len(),
            below_floor = report.filtered_out(),
            "report written"
        );
        println!(
            "{} suggestions for {} files -> {}",
            report.suggestions.len(),
            outcome.files,
            output.display()
        );
        Ok(())
    }
}
