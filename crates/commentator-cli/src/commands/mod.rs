pub mod learn;
pub mod suggest;

pub use learn::LearnCommand;
pub use suggest::SuggestCommand;

use std::path::PathBuf;

use clap::Args;

use commentator_core::config::commentator_config::split_list;
use commentator_core::config::{CliOverrides, CommentatorConfig};
use commentator_core::PipelineError;

/// Arguments shared by every subcommand that walks a source tree.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Root directory to scan
    #[arg(short, long, default_value = ".")]
    pub source: PathBuf,

    /// Comma-separated folder names to skip (default: vendor,build,third_party)
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// Domain dictionary (JSON object of term to meaning)
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

impl SourceArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            exclude: self.exclude.as_deref().map(split_list),
            threads: self.threads,
            dictionary: self.dictionary.clone(),
            ..Default::default()
        }
    }
}

/// Resolve the layered config rooted at the source directory.
pub fn load_config(source: &std::path::Path, overrides: &CliOverrides) -> Result<CommentatorConfig, PipelineError> {
    Ok(CommentatorConfig::load(source, Some(overrides))?)
}
