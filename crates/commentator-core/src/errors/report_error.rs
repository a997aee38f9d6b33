//! Report output errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors rendering or writing a suggestion report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Cannot write report to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report rendering failed: {0}")]
    Render(String),

    #[error("Unknown report format: {0}")]
    UnknownFormat(String),
}

impl ErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Write { .. } => error_code::REPORT_WRITE,
            _ => error_code::REPORT_RENDER,
        }
    }
}
