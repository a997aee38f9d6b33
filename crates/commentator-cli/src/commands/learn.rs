use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use commentator_analysis::pipeline::{learn_corpus, load_dictionary};
use commentator_core::config::paths_config::DEFAULT_PATTERNS_FILE;
use commentator_core::PipelineError;

use super::{load_config, SourceArgs};

#[derive(Debug, Args)]
pub struct LearnCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Where to write the pattern model
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl LearnCommand {
    pub fn execute(self) -> Result<()> {
        let overrides = self.source.overrides();
        let config = load_config(&self.source.source, &overrides)?;
        let dictionary = load_dictionary(&config).map_err(PipelineError::from)?;

        let outcome = learn_corpus(&self.source.source, &config, &dictionary)
            .with_context(|| format!("learning from {}", self.source.source.display()))?;

        let output = self
            .output
            .or_else(|| config.paths.patterns.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATTERNS_FILE));
        outcome
            .model
            .save(&output)
            .map_err(PipelineError::from)
            .with_context(|| format!("saving pattern model to {}", output.display()))?;

        info!(
            output = %output.display(),
            keys = outcome.model.key_count(),
            templates = outcome.model.template_count(),
            "pattern model written"
        );
        println!(
            "Learned {} templates across {} keys from {} files -> {}",
            outcome.model.template_count(),
            outcome.model.key_count(),
            outcome.stats.files,
            output.display()
        );
        Ok(())
    }
}
