//! Comment stripping use case
//!
//! Strips a single file, or every matching file below a directory into a
//! mirrored output tree.

use super::report::RunReport;
use super::Command;
use crate::domain::{CommentStripper, StrippedSource};
use crate::error::{Result, TagdocError};
use crate::infrastructure::{read_source, write_text, Config, SourceTree};
use std::fs;
use std::path::{Path, PathBuf};

/// One stripped file and where it went
#[derive(Debug)]
pub struct StrippedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stripped: StrippedSource,
}

/// What a strip run did
#[derive(Debug)]
pub struct StripOutcome {
    /// In path order
    pub files: Vec<StrippedFile>,
    pub report: RunReport,
    /// Nothing was written
    pub dry_run: bool,
}

impl StripOutcome {
    pub fn blocks_removed(&self) -> usize {
        self.files.iter().map(|f| f.stripped.blocks_removed).sum()
    }

    pub fn lines_removed(&self) -> usize {
        self.files.iter().map(|f| f.stripped.lines_removed()).sum()
    }

    pub fn original_lines(&self) -> usize {
        self.files.iter().map(|f| f.stripped.original_lines).sum()
    }
}

/// Remove tagged comment blocks from a source file or directory
pub struct StripCommand<'c> {
    config: &'c Config,
    input: PathBuf,
    output: Option<PathBuf>,
    tags: Option<Vec<String>>,
    recursive: bool,
    in_place: bool,
    dry_run: bool,
}

impl<'c> StripCommand<'c> {
    pub fn new(config: &'c Config, input: PathBuf, output: Option<PathBuf>) -> Self {
        StripCommand {
            config,
            input,
            output,
            tags: None,
            recursive: false,
            in_place: false,
            dry_run: false,
        }
    }

    /// Strip these tags instead of the configured default set
    pub fn with_tags(mut self, tags: Option<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }

    /// Descend into subdirectories of a directory input
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Allow the output to be the input file or directory
    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn target(&self) -> Result<PathBuf> {
        let output = match (&self.output, self.in_place) {
            (Some(output), _) => output.clone(),
            (None, true) => return Ok(self.input.clone()),
            (None, false) => {
                return Err(TagdocError::Configuration(
                    "No output path given (use --output or --in-place)".to_string(),
                ))
            }
        };

        if !self.in_place && same_file(&self.input, &output) {
            return Err(TagdocError::SameInputOutput(output));
        }
        Ok(output)
    }

    fn strip_file(
        &self,
        stripper: &CommentStripper<'_>,
        input: &Path,
        output: PathBuf,
        content: &str,
    ) -> Result<StrippedFile> {
        let stripped = stripper.strip(content, input);
        if !self.dry_run {
            write_text(&output, &stripped.content)?;
            tracing::info!(?input, ?output, "Wrote stripped file");
        }
        Ok(StrippedFile {
            input: input.to_path_buf(),
            output,
            stripped,
        })
    }

    fn strip_directory(
        &self,
        stripper: &CommentStripper<'_>,
        output: &Path,
    ) -> Result<StripOutcome> {
        let tree = SourceTree::new(&self.input, &self.config.extensions)
            .recursive(self.recursive)
            .exclude(output);

        let mut report = RunReport::new();
        let mut files = Vec::new();

        for file in tree.files()? {
            let path = match file {
                Ok(path) => path,
                Err(err) => {
                    report.record_skip(&self.input, &err);
                    continue;
                }
            };

            let content = match read_source(&path) {
                Ok(content) => content,
                Err(err) => {
                    report.record_skip(&path, &err);
                    continue;
                }
            };

            let relative = path.strip_prefix(&self.input).unwrap_or(&path);
            files.push(self.strip_file(stripper, &path, output.join(relative), &content)?);
            report.record_success(&path);
        }

        Ok(StripOutcome {
            files,
            report,
            dry_run: self.dry_run,
        })
    }
}

impl Command for StripCommand<'_> {
    type Output = StripOutcome;

    fn invoke(&self) -> Result<StripOutcome> {
        // Validate everything before reading or writing
        let strip_set = self.config.resolve_strip_set(self.tags.as_deref())?;
        let output = self.target()?;
        let stripper = CommentStripper::new(&self.config.grammar, strip_set);

        if self.dry_run {
            tracing::info!(input = ?self.input, "Dry run, nothing written");
        }

        if self.input.is_dir() {
            return self.strip_directory(&stripper, &output);
        }

        let content = read_source(&self.input)?;
        let file = self.strip_file(&stripper, &self.input, output, &content)?;
        let mut report = RunReport::new();
        report.record_success(&self.input);

        Ok(StripOutcome {
            files: vec![file],
            report,
            dry_run: self.dry_run,
        })
    }
}

/// Whether two paths name the same file. The output may not exist yet, so
/// its parent is resolved instead.
fn same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = fs::canonicalize(input) else {
        return false;
    };
    resolve(output).is_some_and(|output| output == input)
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|p| p.join(name))
}
