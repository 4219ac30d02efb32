//! Extraction use case

use super::report::RunReport;
use super::Command;
use crate::domain::{BlockAssembler, ExtractionResult};
use crate::error::Result;
use crate::infrastructure::{read_source, Config, SourceTree};
use std::path::{Path, PathBuf};

/// Results of an extraction run
#[derive(Debug)]
pub struct ExtractOutcome {
    /// One entry per file, in path order
    pub results: Vec<ExtractionResult>,
    pub report: RunReport,
}

/// Extract comment blocks from a file or directory
pub struct ExtractCommand<'c> {
    config: &'c Config,
    path: PathBuf,
    recursive: bool,
    tags: Option<Vec<String>>,
}

impl<'c> ExtractCommand<'c> {
    pub fn new(config: &'c Config, path: PathBuf, recursive: bool) -> Self {
        ExtractCommand {
            config,
            path,
            recursive,
            tags: None,
        }
    }

    /// Only report blocks with these tags
    pub fn with_tags(mut self, tags: Option<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }
}

impl Command for ExtractCommand<'_> {
    type Output = ExtractOutcome;

    /// A single file is always reported, even without blocks, and failing to
    /// read it is an error. In a directory, unreadable files are skipped and
    /// files without blocks are left out.
    fn invoke(&self) -> Result<ExtractOutcome> {
        let grammar = &self.config.grammar;
        let filter = match &self.tags {
            Some(names) => Some(grammar.parse_tag_set(names.as_slice())?),
            None => None,
        };
        let assemble = |content: &str, path: &Path| {
            let mut result = BlockAssembler::assemble(grammar, content, path);
            if let Some(tags) = &filter {
                result.retain_tags(tags);
            }
            result
        };
        let mut report = RunReport::new();

        if self.path.is_file() {
            let content = read_source(&self.path)?;
            report.record_success(&self.path);
            return Ok(ExtractOutcome {
                results: vec![assemble(&content, &self.path)],
                report,
            });
        }

        let tree = SourceTree::new(&self.path, &self.config.extensions).recursive(self.recursive);
        let mut results = Vec::new();

        for file in tree.files()? {
            let path = match file {
                Ok(path) => path,
                Err(err) => {
                    report.record_skip(&self.path, &err);
                    continue;
                }
            };

            match read_source(&path) {
                Ok(content) => {
                    report.record_success(&path);
                    let result = assemble(&content, &path);
                    if !result.is_empty() {
                        results.push(result);
                    }
                }
                Err(err) => report.record_skip(&path, &err),
            }
        }

        tracing::debug!(
            files = report.succeeded.len(),
            with_blocks = results.len(),
            "Extraction done"
        );
        Ok(ExtractOutcome { results, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_single_file_without_blocks_is_reported() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.py");
        fs::write(&file, "x = 1\n").unwrap();

        let config = Config::default();
        let outcome = ExtractCommand::new(&config, file.clone(), false)
            .invoke()
            .unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.results[0].is_empty());
        assert_eq!(outcome.results[0].file_path(), file.as_path());
    }

    #[test]
    fn test_directory_skips_empty_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "#EDU hello\n").unwrap();
        fs::write(temp.path().join("b.py"), "x = 1\n").unwrap();
        fs::create_dir(temp.path().join("pkg")).unwrap();
        fs::write(temp.path().join("pkg/c.py"), "#TODO nested\n").unwrap();

        let config = Config::default();
        let flat = ExtractCommand::new(&config, temp.path().to_path_buf(), false)
            .invoke()
            .unwrap();
        assert_eq!(flat.results.len(), 1);
        assert_eq!(flat.report.succeeded.len(), 2);

        let deep = ExtractCommand::new(&config, temp.path().to_path_buf(), true)
            .invoke()
            .unwrap();
        let tags: Vec<&str> = deep
            .results
            .iter()
            .map(|r| r.blocks()[0].tag.as_str())
            .collect();
        assert_eq!(tags, vec!["EDU", "TODO"]);
    }

    #[test]
    fn test_unreadable_file_is_skipped_in_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("good.py"), "#NOTE fine\n").unwrap();
        fs::write(temp.path().join("binary.py"), [0xff, 0xfe, 0x00]).unwrap();

        let config = Config::default();
        let outcome = ExtractCommand::new(&config, temp.path().to_path_buf(), false)
            .invoke()
            .unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert!(outcome.report.skipped[0].path.ends_with("binary.py"));
    }

    #[test]
    fn test_tag_filter() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "#EDU hello\n").unwrap();
        fs::write(temp.path().join("b.py"), "#TODO later\nx = 1\n#EDU again\n").unwrap();

        let config = Config::default();
        let outcome = ExtractCommand::new(&config, temp.path().to_path_buf(), false)
            .with_tags(Some(vec!["todo".to_string()]))
            .invoke()
            .unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.results[0].file_path().ends_with("b.py"));
        assert_eq!(outcome.results[0].block_count(), 1);
    }

    #[test]
    fn test_unknown_tag_filter_is_rejected() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let err = ExtractCommand::new(&config, temp.path().to_path_buf(), false)
            .with_tags(Some(vec!["BOGUS".to_string()]))
            .invoke()
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let err = ExtractCommand::new(&config, temp.path().join("nope.py"), false)
            .invoke()
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
