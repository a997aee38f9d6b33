//! Learn pipeline: commented reference corpus → pattern model.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use commentator_core::config::CommentatorConfig;
use commentator_core::errors::{PipelineError, ScanError};

use crate::corpus::{read_source, CorpusWalker};
use crate::dictionary::Dictionary;
use crate::patterns::{LearnStats, PatternLearner, PatternModel, PatternTable};

#[derive(Debug, Clone)]
pub struct LearnOutcome {
    pub model: PatternModel,
    pub stats: LearnStats,
}

pub fn learn_corpus(
    root: &Path,
    config: &CommentatorConfig,
    dictionary: &Dictionary,
) -> Result<LearnOutcome, PipelineError> {
    let start = Instant::now();
    let files = CorpusWalker::new(root, &config.scan).walk()?;
    let learner = PatternLearner::new(dictionary);

    let (table, stats) = super::with_threads(config.scan.effective_threads(), || {
        files
            .par_iter()
            .enumerate()
            .map(|(index, file)| -> Result<(PatternTable, LearnStats), ScanError> {
                let source = read_source(&file.path)?;
                Ok(learner.learn_source(index as u32, &file.relative, &source))
            })
            .try_reduce(
                || (PatternTable::new(), LearnStats::default()),
                |(table_a, mut stats_a), (table_b, stats_b)| {
                    stats_a += stats_b;
                    Ok((table_a.merge(table_b), stats_a))
                },
            )
    })?;

    let model = table.finalize(
        config.learning.effective_max_templates_per_key(),
        config.learning.effective_min_support(),
    );

    info!(
        root = %root.display(),
        files = stats.files,
        constructs = stats.constructs,
        commented = stats.commented,
        templates_recorded = stats.templates_recorded,
        skipped_code = stats.skipped_code,
        skipped_slot_only = stats.skipped_slot_only,
        flat_files = stats.flat_files,
        keys = model.key_count(),
        templates = model.template_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "learning complete"
    );

    Ok(LearnOutcome { model, stats })
}
