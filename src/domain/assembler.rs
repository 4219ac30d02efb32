//! Block assembly - groups scanned lines into comment blocks

use super::grammar::TagGrammar;
use super::scanner::{CommentScanner, LineKind, ScannedLine};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A maximal run of comment lines sharing one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentBlock {
    pub tag: String,

    /// Content lines with the `#` and tag prefix removed
    pub lines: Vec<String>,

    /// 1-based line number of the first line of the block
    pub line_number: usize,

    /// 1-based line number of the last line of the block
    pub end_line: usize,

    pub file_path: PathBuf,

    /// Name of the outermost function/class declaration still in scope
    pub context: Option<String>,
}

impl CommentBlock {
    /// Content lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// `path:line` locator of the first line
    pub fn locator(&self) -> String {
        format!("{}:{}", self.file_path.display(), self.line_number)
    }

    pub fn contains_line(&self, number: usize) -> bool {
        (self.line_number..=self.end_line).contains(&number)
    }
}

/// All comment blocks found in one source file, in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    file_path: PathBuf,
    block_count: usize,
    blocks: Vec<CommentBlock>,
    untagged_comments: Vec<String>,
}

impl ExtractionResult {
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn blocks(&self) -> &[CommentBlock] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Non-empty comments that appeared outside any tagged block
    pub fn untagged_comments(&self) -> &[String] {
        &self.untagged_comments
    }

    /// Keep only blocks whose tag is in `tags`
    pub fn retain_tags(&mut self, tags: &BTreeSet<String>) {
        self.blocks.retain(|b| tags.contains(&b.tag));
        self.block_count = self.blocks.len();
    }

    /// Blocks grouped by tag, each group in file order
    pub fn blocks_by_tag(&self) -> BTreeMap<&str, Vec<&CommentBlock>> {
        let mut grouped: BTreeMap<&str, Vec<&CommentBlock>> = BTreeMap::new();
        for block in &self.blocks {
            grouped.entry(block.tag.as_str()).or_default().push(block);
        }
        grouped
    }
}

/// A block still receiving lines
#[derive(Debug)]
struct OpenBlock {
    tag: String,
    lines: Vec<String>,
    start: usize,
    end: usize,
    context: Option<String>,
}

impl OpenBlock {
    fn start(line: &ScannedLine<'_>, tag: &str, remainder: &str) -> Self {
        let mut lines = Vec::new();
        if !remainder.is_empty() {
            lines.push(remainder.to_string());
        }
        OpenBlock {
            tag: tag.to_string(),
            lines,
            start: line.number,
            end: line.number,
            context: line.context.map(str::to_string),
        }
    }

    fn push(&mut self, number: usize, text: &str) {
        self.lines.push(text.to_string());
        self.end = number;
    }

    fn finish(mut self, file_path: &Path) -> CommentBlock {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        let leading = self.lines.iter().take_while(|l| l.is_empty()).count();
        self.lines.drain(..leading);

        CommentBlock {
            tag: self.tag,
            lines: self.lines,
            line_number: self.start,
            end_line: self.end,
            file_path: file_path.to_path_buf(),
            context: self.context,
        }
    }
}

pub struct BlockAssembler;

impl BlockAssembler {
    /// Extract the comment blocks of one file.
    ///
    /// The result depends only on `content` and `grammar`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagdoc::domain::{BlockAssembler, TagGrammar};
    /// use std::path::Path;
    ///
    /// let source = "#EDU first line\n#EDU second line\ndef foo():\n    pass\n#NOTE unrelated\n";
    /// let result = BlockAssembler::assemble(&TagGrammar::builtin(), source, Path::new("foo.py"));
    ///
    /// assert_eq!(result.block_count(), 2);
    /// assert_eq!(result.blocks()[0].lines, vec!["first line", "second line"]);
    /// assert_eq!(result.blocks()[1].line_number, 5);
    /// assert_eq!(result.blocks()[1].context.as_deref(), Some("foo"));
    /// ```
    pub fn assemble(grammar: &TagGrammar, content: &str, file_path: &Path) -> ExtractionResult {
        let mut blocks = Vec::new();
        let mut untagged_comments = Vec::new();
        let mut current: Option<OpenBlock> = None;

        for line in CommentScanner::new(grammar, content) {
            match line.kind {
                LineKind::Tag(m) => match current.as_mut() {
                    Some(open) if open.tag == m.tag => {
                        if m.remainder.is_empty() {
                            open.end = line.number;
                        } else {
                            open.push(line.number, m.remainder);
                        }
                    }
                    _ => {
                        if let Some(open) = current.take() {
                            blocks.push(open.finish(file_path));
                        }
                        current = Some(OpenBlock::start(&line, m.tag, m.remainder));
                    }
                },
                LineKind::Comment(text) => match current.as_mut() {
                    Some(open) => open.push(line.number, text),
                    None => {
                        if !text.is_empty() {
                            untagged_comments.push(text.to_string());
                        }
                    }
                },
                LineKind::Code | LineKind::Blank => {
                    if let Some(open) = current.take() {
                        blocks.push(open.finish(file_path));
                    }
                }
            }
        }

        if let Some(open) = current.take() {
            blocks.push(open.finish(file_path));
        }

        ExtractionResult {
            file_path: file_path.to_path_buf(),
            block_count: blocks.len(),
            blocks,
            untagged_comments,
        }
    }
}
