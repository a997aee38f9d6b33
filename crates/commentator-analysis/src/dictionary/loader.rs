//! Dictionary file loading (JSON or TOML flat tables).

use std::collections::BTreeMap;
use std::path::Path;

use commentator_core::errors::DictionaryError;

use super::Dictionary;

pub fn load(path: &Path) -> Result<Dictionary, DictionaryError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let format = match ext.as_deref() {
        Some("json") => Format::Json,
        Some("toml") => Format::Toml,
        _ => {
            return Err(DictionaryError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let content = std::fs::read_to_string(path).map_err(|e| DictionaryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dict = parse(&content, format).map_err(|message| DictionaryError::Corrupt {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(path = %path.display(), entries = dict.len(), "dictionary loaded");
    Ok(dict)
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn parse(content: &str, format: Format) -> Result<Dictionary, String> {
    let raw: BTreeMap<String, String> = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
    };
    if let Some((key, _)) = raw.iter().find(|(k, _)| k.trim().is_empty()) {
        return Err(format!("empty dictionary key '{key}'"));
    }
    Ok(Dictionary::from_entries(raw))
}
