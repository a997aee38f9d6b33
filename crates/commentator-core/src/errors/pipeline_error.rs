//! Pipeline errors: the only errors that reach the process boundary.

use super::error_code::ErrorCode;
use super::{ConfigError, DictionaryError, ModelError, ReportError, ScanError};

/// Errors that abort a learn or suggest run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pattern model error: {0}")]
    Model(#[from] ModelError),

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl PipelineError {
    /// Process exit status for this failure.
    ///
    /// `1` for I/O on the source tree or the output path, `2` for load-time
    /// integrity failures of config, model, or dictionary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Scan(_) | Self::Report(_) | Self::Model(ModelError::Write { .. }) => 1,
            Self::Config(_) | Self::Model(_) | Self::Dictionary(_) => 2,
        }
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::Dictionary(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
        }
    }
}
