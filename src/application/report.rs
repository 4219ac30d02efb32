//! Aggregate outcome of a multi-file run

use crate::error::TagdocError;
use std::path::{Path, PathBuf};

/// A file that was left out of a run, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Which files were processed and which were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, path: &Path) {
        self.succeeded.push(path.to_path_buf());
    }

    /// Record a per-file failure. The path comes from the error when it
    /// carries one.
    pub fn record_skip(&mut self, fallback: &Path, error: &TagdocError) {
        let (path, reason) = match error {
            TagdocError::FileAccess { path, source } => (path.clone(), source.to_string()),
            other => (fallback.to_path_buf(), other.to_string()),
        };
        tracing::warn!(?path, %reason, "Skipping file");
        self.skipped.push(SkippedFile { path, reason });
    }

    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// One line per skipped file
    pub fn skipped_lines(&self) -> Vec<String> {
        self.skipped
            .iter()
            .map(|s| format!("{}: {}", s.path.display(), s.reason))
            .collect()
    }
}
