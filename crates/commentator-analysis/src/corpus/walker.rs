//! Source tree discovery using `ignore::WalkBuilder`.
//!
//! The walk is single-threaded and sorted so file indices are stable across
//! runs; reading and scanning happen later in parallel.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use commentator_core::config::ScanConfig;
use commentator_core::errors::ScanError;

/// A file selected for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Relative to the scan root, `/`-separated.
    pub relative: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct CorpusWalker {
    root: PathBuf,
    exclude: Vec<String>,
    extensions: Vec<String>,
    max_file_size: u64,
    include_hidden: bool,
}

impl CorpusWalker {
    pub fn new(root: &Path, config: &ScanConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            exclude: config.effective_exclude(),
            extensions: config.effective_extensions(),
            max_file_size: config.effective_max_file_size(),
            include_hidden: config.effective_include_hidden(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }

    /// Every source file under the root, sorted by relative path.
    pub fn walk(&self) -> Result<Vec<SourceFile>, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::SourceRootMissing {
                path: self.root.clone(),
            });
        }

        let root = self.root.clone();
        let exclude = self.exclude.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(!self.include_hidden)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                let relative = relative_path(&root, entry.path());
                !exclude.iter().any(|x| *x == name || *x == relative)
            })
            .build();

        let mut files = Vec::new();
        let mut skipped_large = 0usize;
        for entry in walker {
            let entry = entry.map_err(|e| ScanError::WalkFailed {
                path: self.root.clone(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if !self.has_source_extension(path) {
                continue;
            }
            let size = entry
                .metadata()
                .map_err(|e| ScanError::WalkFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
                .len();
            if size > self.max_file_size {
                tracing::debug!(path = %path.display(), size, "skipping oversized file");
                skipped_large += 1;
                continue;
            }
            files.push(SourceFile {
                path: path.to_path_buf(),
                relative: relative_path(&self.root, path),
                size,
            });
        }
        files.sort_by(|a, b| a.relative.cmp(&b.relative));

        tracing::debug!(
            root = %self.root.display(),
            files = files.len(),
            skipped_large,
            "corpus walk complete"
        );
        Ok(files)
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
