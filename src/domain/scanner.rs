//! Line-level scanner for tagged comments
//!
//! Classifies every line of a source file as a tag line, a plain comment line,
//! code, or blank, and tracks the enclosing function/class declaration.
//! Only lines whose first non-whitespace character is `#` are treated as
//! comments; string literals are not tracked.

use super::grammar::{TagGrammar, TagMatch};
use regex::Regex;
use std::sync::OnceLock;

/// Matches `def name`, `async def name` and `class name` declarations
fn declaration_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*(?:async\s+)?(?:def|class)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap()
    })
}

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A recognized tag line
    Tag(TagMatch<'a>),
    /// A `#` comment without a recognized tag; holds the text after the `#`
    Comment(&'a str),
    /// Anything else that is not whitespace only
    Code,
    Blank,
}

/// A classified line together with its position and enclosing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// The line as it appears in the source, including its terminator
    pub raw: &'a str,
    pub kind: LineKind<'a>,
    /// Name of the outermost-scoped declaration in effect at this line
    pub context: Option<&'a str>,
}

/// Single-pass iterator over the lines of a source text
pub struct CommentScanner<'g, 'a> {
    grammar: &'g TagGrammar,
    lines: std::iter::Enumerate<std::str::SplitInclusive<'a, char>>,
    context: Option<&'a str>,
    /// Indentation of the declaration that set `context`
    context_indent: usize,
}

impl<'g, 'a> CommentScanner<'g, 'a> {
    pub fn new(grammar: &'g TagGrammar, content: &'a str) -> Self {
        CommentScanner {
            grammar,
            lines: content.split_inclusive('\n').enumerate(),
            context: None,
            context_indent: 0,
        }
    }

    fn classify(&self, line: &'a str) -> LineKind<'a> {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if let Some(rest) = trimmed.strip_prefix('#') {
            return match self.grammar.match_tag_line(line) {
                Some(tag) => LineKind::Tag(tag),
                None => LineKind::Comment(rest.trim()),
            };
        }
        LineKind::Code
    }
}

impl<'a> Iterator for CommentScanner<'_, 'a> {
    type Item = ScannedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, raw) = self.lines.next()?;
        let line = raw.trim_end_matches(&['\n', '\r'][..]);
        let kind = self.classify(line);

        // A declaration replaces the label only at the same or a broader scope,
        // so nested methods keep reporting their class.
        if kind == LineKind::Code {
            if let Some(captures) = declaration_regex().captures(line) {
                let indent = line.len() - line.trim_start().len();
                if self.context.is_none() || indent <= self.context_indent {
                    self.context = captures.get(1).map(|m| m.as_str());
                    self.context_indent = indent;
                }
            }
        }

        Some(ScannedLine {
            number: index + 1,
            raw,
            kind,
            context: self.context,
        })
    }
}
