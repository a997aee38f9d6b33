//! Pipelines: corpus walk → per-file scan → learn or suggest.
//!
//! Files are processed in parallel. Learning folds per-file partial tables
//! into one; suggestion collects per-file results in walk order so output
//! is identical across runs and thread counts.

pub mod learn;
pub mod suggest;

use std::path::Path;

use commentator_core::config::paths_config::{DEFAULT_DICTIONARY_FILE, DEFAULT_PATTERNS_FILE};
use commentator_core::config::CommentatorConfig;
use commentator_core::errors::{DictionaryError, ModelError};

use crate::dictionary::Dictionary;
use crate::patterns::PatternModel;

pub use learn::{learn_corpus, LearnOutcome};
pub use suggest::{suggest_corpus, suggest_source, SuggestOutcome};

/// Dictionary named by the config (must exist), else the default file if
/// present, else empty.
pub fn load_dictionary(config: &CommentatorConfig) -> Result<Dictionary, DictionaryError> {
    let dictionary = match &config.paths.dictionary {
        Some(path) => Dictionary::load(path)?,
        None => Dictionary::load_optional(Path::new(DEFAULT_DICTIONARY_FILE))?,
    };
    Ok(if config.generation.effective_fuzzy_identifier_match() {
        dictionary.with_fuzzy_matching()
    } else {
        dictionary
    })
}

/// Pattern model named by the config (must exist), else the default file if
/// present, else empty.
pub fn load_model(config: &CommentatorConfig) -> Result<PatternModel, ModelError> {
    match &config.paths.patterns {
        Some(path) => PatternModel::load(path),
        None => PatternModel::load_optional(Path::new(DEFAULT_PATTERNS_FILE)),
    }
}

/// Run `work` on a dedicated pool when a thread count is configured.
pub(crate) fn with_threads<T: Send>(threads: usize, work: impl FnOnce() -> T + Send) -> T {
    if threads == 0 {
        return work();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(work),
        Err(e) => {
            tracing::warn!(threads, error = %e, "cannot build thread pool, using the global pool");
            work()
        }
    }
}
