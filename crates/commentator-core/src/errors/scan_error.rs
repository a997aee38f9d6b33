//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors that can occur while discovering and reading source files.
///
/// Structural anomalies inside a file are never errors; only I/O and
/// non-text input surface here.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source root does not exist or is not a directory: {path}")]
    SourceRootMissing { path: PathBuf },

    #[error("Not a text file: {path}")]
    NotText { path: PathBuf },

    #[error("Directory walk failed under {path}: {message}")]
    WalkFailed { path: PathBuf, message: String },
}

impl ErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SourceRootMissing { .. } => error_code::SOURCE_ROOT_MISSING,
            Self::NotText { .. } => error_code::NOT_TEXT,
            _ => error_code::SCAN_ERROR,
        }
    }
}
