//! Domain dictionary errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors loading the domain dictionary.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("IO error on dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt dictionary {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Unsupported dictionary format for {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },
}

impl ErrorCode for DictionaryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::DICTIONARY_IO,
            _ => error_code::DICTIONARY_CORRUPT,
        }
    }
}
