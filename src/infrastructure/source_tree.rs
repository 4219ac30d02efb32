//! Source file discovery

use crate::error::{Result, TagdocError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files to scan under a root path, in lexicographic order.
///
/// A file root yields itself regardless of extension. Directory roots skip
/// hidden directories and, when set, the excluded directory (typically the
/// documentation output inside the source tree).
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    recursive: bool,
    extensions: Vec<String>,
    exclude: Option<PathBuf>,
}

impl SourceTree {
    pub fn new(root: &Path, extensions: &[String]) -> Self {
        SourceTree {
            root: root.to_path_buf(),
            recursive: true,
            extensions: extensions.to_vec(),
            exclude: None,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Skip this directory while walking; ignored if it does not exist yet
    pub fn exclude(mut self, dir: &Path) -> Self {
        self.exclude = fs::canonicalize(dir).ok();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover files. Entries that cannot be accessed come back as
    /// [`TagdocError::FileAccess`] items so callers can skip and report them.
    pub fn files(&self) -> Result<Vec<Result<PathBuf>>> {
        let metadata = fs::metadata(&self.root)
            .map_err(|e| TagdocError::file_access(&self.root, e))?;
        if metadata.is_file() {
            return Ok(vec![Ok(self.root.clone())]);
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&self.root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let hidden = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with('.'));
                !hidden && !self.is_excluded(entry.path())
            });

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                        files.push(Ok(entry.into_path()));
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    let message = err.to_string();
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other(message));
                    tracing::warn!(?path, error = %source, "Cannot access path while walking");
                    files.push(Err(TagdocError::file_access(path, source)));
                }
            }
        }

        tracing::debug!(root = ?self.root, found = files.len(), "Walked source tree");
        Ok(files)
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        match &self.exclude {
            Some(excluded) => fs::canonicalize(dir).is_ok_and(|p| &p == excluded),
            None => false,
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Read a source file as UTF-8 text
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| TagdocError::file_access(path, e))
}
