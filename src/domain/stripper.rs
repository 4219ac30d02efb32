//! Removal of tagged comment blocks from source text
//!
//! Uses the same block boundaries as extraction, so a block that is documented
//! is exactly the block that gets stripped.

use super::assembler::BlockAssembler;
use super::grammar::TagGrammar;
use std::collections::BTreeSet;
use std::path::Path;

/// Stripped text plus statistics about what was removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedSource {
    pub content: String,
    pub original_lines: usize,
    pub output_lines: usize,
    pub blocks_removed: usize,
}

impl StrippedSource {
    pub fn lines_removed(&self) -> usize {
        self.original_lines - self.output_lines
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_lines == 0 {
            0.0
        } else {
            self.lines_removed() as f64 / self.original_lines as f64 * 100.0
        }
    }
}

/// Removes blocks whose tag is in the strip set
pub struct CommentStripper<'g> {
    grammar: &'g TagGrammar,
    strip: BTreeSet<String>,
}

impl<'g> CommentStripper<'g> {
    /// `strip` must only name tags registered in `grammar`.
    pub fn new(grammar: &'g TagGrammar, strip: BTreeSet<String>) -> Self {
        CommentStripper { grammar, strip }
    }

    /// Strip `content`, keeping every other line verbatim.
    ///
    /// Blank lines directly following a removed block are dropped when the
    /// kept output already ends in a blank line (or is empty), so removal never
    /// widens a gap. The output is always a subsequence of the input lines, and
    /// stripping the output again changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagdoc::domain::{CommentStripper, TagGrammar};
    /// use std::collections::BTreeSet;
    /// use std::path::Path;
    ///
    /// let grammar = TagGrammar::builtin();
    /// let stripper = CommentStripper::new(&grammar, BTreeSet::from(["EDU".to_string()]));
    /// let out = stripper.strip("#EDU explain\ndef foo():\n    pass\n", Path::new("foo.py"));
    /// assert_eq!(out.content, "def foo():\n    pass\n");
    /// ```
    pub fn strip(&self, content: &str, file_path: &Path) -> StrippedSource {
        let extraction = BlockAssembler::assemble(self.grammar, content, file_path);
        let removed_blocks: Vec<_> = extraction
            .blocks()
            .iter()
            .filter(|b| self.strip.contains(&b.tag))
            .collect();

        let mut output = String::with_capacity(content.len());
        let mut original_lines = 0;
        let mut output_lines = 0;
        let mut last_kept_blank: Option<bool> = None;
        let mut swallow_blanks = false;
        let mut blocks = removed_blocks.iter().peekable();

        for (index, raw) in content.split_inclusive('\n').enumerate() {
            let number = index + 1;
            original_lines += 1;

            while blocks.peek().is_some_and(|b| b.end_line < number) {
                blocks.next();
            }
            if blocks.peek().is_some_and(|b| b.contains_line(number)) {
                swallow_blanks = last_kept_blank.unwrap_or(true);
                continue;
            }

            let blank = raw.trim().is_empty();
            if blank && swallow_blanks {
                continue;
            }
            swallow_blanks = false;

            output.push_str(raw);
            output_lines += 1;
            last_kept_blank = Some(blank);
        }

        tracing::debug!(
            path = %file_path.display(),
            blocks = removed_blocks.len(),
            removed = original_lines - output_lines,
            "Stripped tagged comments"
        );

        StrippedSource {
            content: output,
            original_lines,
            output_lines,
            blocks_removed: removed_blocks.len(),
        }
    }
}
