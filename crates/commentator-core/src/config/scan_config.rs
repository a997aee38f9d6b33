//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Directory names skipped by default.
pub const DEFAULT_EXCLUDES: &[&str] = &["vendor", "build", "third_party"];

/// C/C++ source and header extensions scanned by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c", "h", "hpp", "hh", "hxx"];

/// Configuration for corpus discovery.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names to skip wherever they occur. Default: vendor, build, third_party.
    pub exclude: Vec<String>,
    /// File extensions to scan, without the dot.
    pub extensions: Vec<String>,
    /// Maximum file size in bytes. Default: 10MB.
    pub max_file_size: Option<u64>,
    /// Worker threads (0 = auto). Default: 0.
    pub threads: Option<usize>,
    /// Descend into dot-directories. Default: false.
    pub include_hidden: Option<bool>,
}

impl ScanConfig {
    /// Returns the effective exclude list.
    pub fn effective_exclude(&self) -> Vec<String> {
        if self.exclude.is_empty() {
            DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
        } else {
            self.exclude.clone()
        }
    }

    /// Returns the effective extension list.
    pub fn effective_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect()
        }
    }

    /// Returns the effective max file size, defaulting to 10MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(10 * 1024 * 1024)
    }

    /// Returns the effective thread count, defaulting to 0 (auto).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns whether hidden directories are walked, defaulting to false.
    pub fn effective_include_hidden(&self) -> bool {
        self.include_hidden.unwrap_or(false)
    }
}
