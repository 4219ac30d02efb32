//! Writing generated files
//!
//! Pages are rendered into a staging directory inside the output root and only
//! moved into place once every page has been written and every destination
//! directory accepts files, so a failed check leaves no new pages behind.

use crate::domain::{DocumentSet, MarkdownPage};
use crate::error::{Result, TagdocError};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STAGING_PREFIX: &str = ".tagdoc-staging-";

/// Directory that receives generated documentation
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    root: PathBuf,
    front_matter: bool,
}

impl OutputDirectory {
    pub fn new(root: &Path) -> Self {
        OutputDirectory {
            root: root.to_path_buf(),
            front_matter: true,
        }
    }

    /// Whether pages start with a YAML front-matter header
    pub fn front_matter(mut self, enabled: bool) -> Self {
        self.front_matter = enabled;
        self
    }

    /// Verify the directory exists or can be created.
    ///
    /// The nearest existing ancestor must be a directory that accepts new
    /// files. Nothing is left on disk by the check.
    pub fn check_writable(&self) -> Result<()> {
        for ancestor in self.root.ancestors() {
            let ancestor = if ancestor.as_os_str().is_empty() {
                Path::new(".")
            } else {
                ancestor
            };

            match fs::metadata(ancestor) {
                Ok(meta) if !meta.is_dir() => {
                    return Err(TagdocError::output_write(
                        &self.root,
                        io::Error::other(format!("{} is not a directory", ancestor.display())),
                    ));
                }
                Ok(_) => {
                    return ensure_accepts_files(ancestor)
                        .map_err(|e| TagdocError::output_write(&self.root, e));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(TagdocError::output_write(&self.root, e)),
            }
        }
        Ok(())
    }

    /// Write every page of a document set, all or nothing.
    ///
    /// Returns the final paths in page order.
    pub fn write_all(&self, set: &DocumentSet) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.root).map_err(|e| TagdocError::output_write(&self.root, e))?;
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|e| TagdocError::output_write(&self.root, e))?;

        let mut pages = Vec::new();
        for page in set.pages() {
            write_text(
                &staging.path().join(page.path()),
                &page.render_with(self.front_matter),
            )?;
            pages.push(page.path().to_path_buf());
        }

        self.prepare_destinations(&pages)?;

        let mut written = Vec::with_capacity(pages.len());
        for page in &pages {
            let target = self.root.join(page);
            fs::rename(staging.path().join(page), &target)
                .map_err(|e| TagdocError::output_write(&target, e))?;
            written.push(target);
        }

        tracing::info!(root = ?self.root, pages = written.len(), "Wrote documentation");
        Ok(written)
    }

    /// Make sure every page can be moved into place before any is.
    fn prepare_destinations(&self, pages: &[PathBuf]) -> Result<()> {
        let mut dirs = BTreeSet::new();
        for page in pages {
            let target = self.root.join(page);
            if target.is_dir() {
                return Err(TagdocError::output_write(
                    &target,
                    io::Error::other("a directory is in the way"),
                ));
            }
            if let Some(parent) = target.parent() {
                dirs.insert(parent.to_path_buf());
            }
        }

        for dir in &dirs {
            if let Ok(meta) = fs::metadata(dir) {
                if !meta.is_dir() {
                    return Err(TagdocError::output_write(
                        dir,
                        io::Error::new(io::ErrorKind::AlreadyExists, "File exists"),
                    ));
                }
            }
        }

        for dir in &dirs {
            fs::create_dir_all(dir).map_err(|e| TagdocError::output_write(dir, e))?;
            ensure_accepts_files(dir).map_err(|e| TagdocError::output_write(dir, e))?;
        }
        Ok(())
    }
}

/// Create and drop an anonymous file to confirm `dir` accepts new files
fn ensure_accepts_files(dir: &Path) -> io::Result<()> {
    tempfile::tempfile_in(dir).map(drop)
}

/// Write `content` to `path`, creating parent directories
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TagdocError::output_write(parent, e))?;
    }
    fs::write(path, content).map_err(|e| TagdocError::output_write(path, e))
}
