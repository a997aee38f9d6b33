//! Suggest pipeline: source tree → ordered suggestions.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use commentator_core::config::CommentatorConfig;
use commentator_core::errors::{PipelineError, ScanError};

use crate::corpus::{read_source, CorpusWalker};
use crate::dictionary::Dictionary;
use crate::generation::{GenerationSettings, GenerationStats, Suggestion, SuggestionEngine};
use crate::lexer::Tokenizer;
use crate::patterns::PatternModel;
use crate::structure::ConstructStream;

#[derive(Debug, Clone)]
pub struct SuggestOutcome {
    /// Ordered by file, then line.
    pub suggestions: Vec<Suggestion>,
    pub stats: GenerationStats,
    pub files: usize,
}

/// Suggestions for one source unit, in source order.
pub fn suggest_source(engine: &SuggestionEngine<'_>, file: &str, source: &str) -> (Vec<Suggestion>, GenerationStats) {
    let lexed = Tokenizer::new(source).tokenize();
    let mut stream = ConstructStream::new(file, &lexed);
    let mut stats = GenerationStats::default();
    let mut suggestions = Vec::new();
    for construct in stream.by_ref() {
        let outcome = engine.evaluate(&construct);
        stats.record(&outcome);
        if let Some(s) = outcome.into_suggestion() {
            suggestions.push(s);
        }
    }
    let (_, scan) = stream.finish();
    if let Some(line) = scan.flat_from_line {
        tracing::debug!(file, line, "function detection disabled after unmatched brace");
    }
    (suggestions, stats)
}

pub fn suggest_corpus(
    root: &Path,
    config: &CommentatorConfig,
    model: &PatternModel,
    dictionary: &Dictionary,
) -> Result<SuggestOutcome, PipelineError> {
    let start = Instant::now();
    let files = CorpusWalker::new(root, &config.scan).walk()?;
    let engine = SuggestionEngine::new(model, dictionary, GenerationSettings::from(&config.generation));

    let per_file = super::with_threads(config.scan.effective_threads(), || {
        files
            .par_iter()
            .map(|file| -> Result<(Vec<Suggestion>, GenerationStats), ScanError> {
                let source = read_source(&file.path)?;
                Ok(suggest_source(&engine, &file.relative, &source))
            })
            .collect::<Result<Vec<_>, ScanError>>()
    })?;

    let mut suggestions = Vec::new();
    let mut stats = GenerationStats::default();
    for (file_suggestions, file_stats) in per_file {
        suggestions.extend(file_suggestions);
        stats += file_stats;
    }

    info!(
        root = %root.display(),
        files = files.len(),
        constructs = stats.constructs,
        pre_commented = stats.pre_commented,
        suggested = stats.suggested,
        from_patterns = stats.from_patterns,
        from_dictionary = stats.from_dictionary,
        structural_only = stats.structural_only,
        no_signal = stats.no_signal,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "suggestion run complete"
    );

    Ok(SuggestOutcome {
        suggestions,
        stats,
        files: files.len(),
    })
}
