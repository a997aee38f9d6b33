//! Persisted pattern model errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors loading or writing the learned pattern model.
/// A corrupt model is fatal: partial loads would skew every suggestion.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("IO error reading pattern model {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write pattern model to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt pattern model {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Invalid pattern key '{key}' in {path}")]
    InvalidKey { path: PathBuf, key: String },

    #[error("Invalid template under '{key}' in {path}: {message}")]
    InvalidTemplate {
        path: PathBuf,
        key: String,
        message: String,
    },
}

impl ErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::Write { .. } => error_code::MODEL_IO,
            _ => error_code::MODEL_CORRUPT,
        }
    }
}
