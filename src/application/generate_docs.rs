//! Documentation generation use case
//!
//! Orchestrates the full workflow: check the output location, walk the source
//! tree, extract every file, render pages, write them.

use super::report::RunReport;
use super::Command;
use crate::domain::{BlockAssembler, DocumentGenerator};
use crate::error::Result;
use crate::infrastructure::{read_source, Config, OutputDirectory, SourceTree};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Results of a generation run
#[derive(Debug)]
pub struct GenerationOutcome {
    pub report: RunReport,
    /// Every file written, documents first, top-level index last
    pub written: Vec<PathBuf>,
    /// Number of (category, file) documents
    pub documents: usize,
    /// Category keys that received documents, in category order
    pub categories: Vec<String>,
    pub output_dir: PathBuf,
}

/// Generate categorized markdown documentation for a source tree
pub struct GenerateDocsCommand<'c> {
    config: &'c Config,
    source_root: PathBuf,
    output_dir: PathBuf,
    site_title: Option<String>,
    front_matter: bool,
    generated_at: DateTime<Utc>,
}

impl<'c> GenerateDocsCommand<'c> {
    pub fn new(config: &'c Config, source_root: PathBuf, output_dir: PathBuf) -> Self {
        GenerateDocsCommand {
            config,
            source_root,
            output_dir,
            site_title: None,
            front_matter: true,
            generated_at: Utc::now(),
        }
    }

    /// Override the configured site title
    pub fn with_site_title(mut self, title: Option<String>) -> Self {
        self.site_title = title;
        self
    }

    pub fn front_matter(mut self, enabled: bool) -> Self {
        self.front_matter = enabled;
        self
    }

    /// Fix the timestamp written into front-matter
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    fn site_title(&self) -> &str {
        self.site_title.as_deref().unwrap_or(&self.config.site_title)
    }
}

impl Command for GenerateDocsCommand<'_> {
    type Output = GenerationOutcome;

    fn invoke(&self) -> Result<GenerationOutcome> {
        let output = OutputDirectory::new(&self.output_dir).front_matter(self.front_matter);

        // A bad output location aborts before any file is read
        output.check_writable()?;

        let tree = SourceTree::new(&self.source_root, &self.config.extensions)
            .exclude(&self.output_dir);

        let mut report = RunReport::new();
        let mut results = Vec::new();

        for file in tree.files()? {
            let path = match file {
                Ok(path) => path,
                Err(err) => {
                    report.record_skip(&self.source_root, &err);
                    continue;
                }
            };

            match read_source(&path) {
                Ok(content) => {
                    results.push(BlockAssembler::assemble(
                        &self.config.grammar,
                        &content,
                        &path,
                    ));
                    report.record_success(&path);
                }
                Err(err) => report.record_skip(&path, &err),
            }
        }

        let root = display_root(&self.source_root);
        let set =
            DocumentGenerator::new(&self.config.grammar, self.site_title(), self.generated_at)
                .generate(&results, root);

        tracing::info!(
            files = report.succeeded.len(),
            skipped = report.skipped.len(),
            documents = set.documents.len(),
            "Rendered documentation"
        );

        let written = output.write_all(&set)?;

        Ok(GenerationOutcome {
            report,
            written,
            documents: set.documents.len(),
            categories: set.categories().into_iter().map(str::to_string).collect(),
            output_dir: self.output_dir.clone(),
        })
    }
}

/// Root that generated source paths are shown relative to. A single-file
/// source is shown by its file name.
fn display_root(source_root: &Path) -> &Path {
    if source_root.is_file() {
        source_root.parent().unwrap_or(source_root)
    } else {
        source_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn source_tree(temp: &TempDir) -> PathBuf {
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("pkg")).unwrap();
        fs::write(
            src.join("main.py"),
            "#EDU first line\n#EDU second line\ndef foo():\n    pass\n#NOTE unrelated\n",
        )
        .unwrap();
        fs::write(src.join("pkg/util.py"), "#OPTIMIZE cache this\n").unwrap();
        fs::write(src.join("plain.py"), "x = 1\n").unwrap();
        src
    }

    #[test]
    fn test_generates_documents_and_indices() {
        let temp = TempDir::new().unwrap();
        let src = source_tree(&temp);
        let out = temp.path().join("docs");

        let config = Config::default();
        let outcome = GenerateDocsCommand::new(&config, src, out.clone())
            .invoke()
            .unwrap();

        assert_eq!(outcome.documents, 3);
        assert_eq!(outcome.categories, vec!["educational", "notes", "performance"]);
        assert_eq!(outcome.report.succeeded.len(), 3);
        assert!(out.join("educational/main.py.md").is_file());
        assert!(out.join("notes/main.py.md").is_file());
        assert!(out.join("performance/pkg__util.py.md").is_file());
        assert!(out.join("performance/index.md").is_file());
        assert!(out.join("index.md").is_file());
        assert_eq!(outcome.written.last().unwrap(), &out.join("index.md"));
    }

    #[test]
    fn test_site_title_override() {
        let temp = TempDir::new().unwrap();
        let src = source_tree(&temp);
        let out = temp.path().join("docs");

        let config = Config::default();
        GenerateDocsCommand::new(&config, src, out.clone())
            .with_site_title(Some("Jarvis".to_string()))
            .invoke()
            .unwrap();

        let index = fs::read_to_string(out.join("index.md")).unwrap();
        assert!(index.contains("# Jarvis\n"));
    }

    #[test]
    fn test_output_inside_source_is_not_rescanned() {
        let temp = TempDir::new().unwrap();
        let src = source_tree(&temp);
        let out = src.join("docs");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.py"), "#EDU should not be documented\n").unwrap();

        let config = Config::default();
        let outcome = GenerateDocsCommand::new(&config, src, out.clone())
            .invoke()
            .unwrap();
        assert_eq!(outcome.documents, 3);
        assert!(!out.join("educational/docs__stale.py.md").exists());
    }

    #[test]
    fn test_fixed_timestamp_reproduces_output() {
        let temp = TempDir::new().unwrap();
        let src = source_tree(&temp);
        let at = Utc.with_ymd_and_hms(2025, 1, 17, 12, 0, 0).unwrap();
        let config = Config::default();

        let first = temp.path().join("one");
        let second = temp.path().join("two");
        GenerateDocsCommand::new(&config, src.clone(), first.clone())
            .generated_at(at)
            .invoke()
            .unwrap();
        GenerateDocsCommand::new(&config, src, second.clone())
            .generated_at(at)
            .invoke()
            .unwrap();

        for page in ["index.md", "educational/main.py.md", "notes/index.md"] {
            assert_eq!(
                fs::read_to_string(first.join(page)).unwrap(),
                fs::read_to_string(second.join(page)).unwrap()
            );
        }
    }

    #[test]
    fn test_blocked_category_aborts_without_partial_output() {
        let temp = TempDir::new().unwrap();
        let src = source_tree(&temp);
        let out = temp.path().join("docs");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("notes"), "in the way").unwrap();

        let config = Config::default();
        let err = GenerateDocsCommand::new(&config, src, out.clone())
            .invoke()
            .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(!out.join("educational").exists());
        assert!(!out.join("index.md").exists());
    }

    #[test]
    fn test_unwritable_output_aborts_before_writing() {
        let temp = TempDir::new().unwrap();
        let src = source_tree(&temp);
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let config = Config::default();
        let err = GenerateDocsCommand::new(&config, src, blocker.join("docs"))
            .invoke()
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
