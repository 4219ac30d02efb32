//! Tag grammar - the vocabulary of recognized tags and their categories

use crate::error::{Result, TagdocError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Matches `#TAG rest`, with exactly one leading `#`.
///
/// The tag token is captured greedily so `#EDUCATION` yields `EDUCATION`, which
/// then fails the registry lookup instead of matching `EDU`.
fn tag_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*#[ \t]*([A-Z][A-Z0-9_]*)(?:[\s:]+(.*?))?\s*$").unwrap()
    })
}

fn tag_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap())
}

/// A documentation section that tags map to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Directory name under the output root
    pub key: String,
    pub title: String,
    pub description: String,
}

impl Category {
    pub fn new(key: &str, title: &str, description: &str) -> Self {
        Category {
            key: key.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// A registered tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub name: String,
    /// Key of the category this tag's blocks are documented under
    pub category: String,
    /// Whether `strip` removes this tag when no explicit tag set is given
    pub strip_by_default: bool,
}

impl TagDefinition {
    pub fn new(name: &str, category: &str, strip_by_default: bool) -> Self {
        TagDefinition {
            name: name.to_string(),
            category: category.to_string(),
            strip_by_default,
        }
    }
}

/// A tag line split into its tag and free-text remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'a> {
    pub tag: &'a str,
    pub remainder: &'a str,
}

/// The set of recognized tags and the categories they map to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGrammar {
    tags: Vec<TagDefinition>,
    categories: Vec<Category>,
}

impl Default for TagGrammar {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TagGrammar {
    /// Build a grammar, rejecting malformed or duplicate tag names and tags
    /// pointing at undeclared categories.
    pub fn new(tags: Vec<TagDefinition>, categories: Vec<Category>) -> Result<Self> {
        let mut seen_categories = BTreeSet::new();
        for category in &categories {
            if category.key.trim().is_empty() {
                return Err(TagdocError::Configuration(
                    "Category key must not be empty".to_string(),
                ));
            }
            if !seen_categories.insert(category.key.as_str()) {
                return Err(TagdocError::Configuration(format!(
                    "Duplicate category: {}",
                    category.key
                )));
            }
        }

        let mut seen_tags = BTreeSet::new();
        for tag in &tags {
            if !tag_name_regex().is_match(&tag.name) {
                return Err(TagdocError::Configuration(format!(
                    "Invalid tag name '{}': tags are uppercase letters, digits and underscores",
                    tag.name
                )));
            }
            if !seen_tags.insert(tag.name.as_str()) {
                return Err(TagdocError::Configuration(format!(
                    "Duplicate tag: {}",
                    tag.name
                )));
            }
            if !seen_categories.contains(tag.category.as_str()) {
                return Err(TagdocError::Configuration(format!(
                    "Unknown category '{}' for tag {}",
                    tag.category, tag.name
                )));
            }
        }

        Ok(TagGrammar { tags, categories })
    }

    /// The default vocabulary
    pub fn builtin() -> Self {
        let categories = vec![
            Category::new(
                "educational",
                "Learning Notes",
                "Learning notes about computer science topics in general",
            ),
            Category::new(
                "review",
                "Code Review",
                "Code sections that need review and validation",
            ),
            Category::new(
                "important",
                "Important Information",
                "Important information for understanding and using the system",
            ),
            Category::new(
                "notes",
                "Implementation Notes",
                "Important implementation details and considerations",
            ),
            Category::new(
                "fixme",
                "Known Issues",
                "Known bugs and issues that need to be fixed",
            ),
            Category::new(
                "todo",
                "Future Improvements",
                "Planned features and improvements for future development",
            ),
            Category::new(
                "hack",
                "Workarounds",
                "Temporary solutions and workarounds that need proper implementation",
            ),
            Category::new(
                "debug",
                "Debug Information",
                "Debugging aids and diagnostic information",
            ),
            Category::new(
                "performance",
                "Performance Notes",
                "Performance considerations and optimization opportunities",
            ),
        ];

        let tags = vec![
            TagDefinition::new("EDU", "educational", true),
            TagDefinition::new("NOTE", "notes", false),
            TagDefinition::new("IMPORTANT", "important", false),
            TagDefinition::new("TODO", "todo", false),
            TagDefinition::new("FIXME", "fixme", false),
            TagDefinition::new("HACK", "hack", false),
            TagDefinition::new("DEBUG", "debug", false),
            TagDefinition::new("REVIEW", "review", true),
            TagDefinition::new("OPTIMIZE", "performance", false),
        ];

        TagGrammar { tags, categories }
    }

    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn lookup(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Category a tag's blocks are documented under
    pub fn category_for(&self, tag: &str) -> Option<&Category> {
        self.lookup(tag).and_then(|t| self.category(&t.category))
    }

    /// Position of a category in the declared order, used for index listings
    pub fn category_rank(&self, key: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.key == key)
    }

    /// Tags flagged as strip-by-default
    pub fn default_strip_set(&self) -> BTreeSet<String> {
        self.tags
            .iter()
            .filter(|t| t.strip_by_default)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Add a category, or replace the title and description of an existing one
    pub fn upsert_category(&mut self, category: Category) -> Result<()> {
        if category.key.trim().is_empty() {
            return Err(TagdocError::Configuration(
                "Category key must not be empty".to_string(),
            ));
        }
        match self.categories.iter_mut().find(|c| c.key == category.key) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
        Ok(())
    }

    /// Register a tag, or redefine an existing one
    pub fn upsert_tag(&mut self, tag: TagDefinition) -> Result<()> {
        if !tag_name_regex().is_match(&tag.name) {
            return Err(TagdocError::Configuration(format!(
                "Invalid tag name '{}': tags are uppercase letters, digits and underscores",
                tag.name
            )));
        }
        if self.category(&tag.category).is_none() {
            return Err(TagdocError::Configuration(format!(
                "Unknown category '{}' for tag {}",
                tag.category, tag.name
            )));
        }
        match self.tags.iter_mut().find(|t| t.name == tag.name) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
        Ok(())
    }

    /// Point an already registered tag at another category
    pub fn remap(&mut self, tag: &str, category: &str) -> Result<()> {
        if self.category(category).is_none() {
            return Err(TagdocError::Configuration(format!(
                "Unknown category '{}' for tag {}",
                category, tag
            )));
        }
        let definition = self
            .tags
            .iter_mut()
            .find(|t| t.name == tag)
            .ok_or_else(|| TagdocError::Configuration(format!("Unknown tag: {}", tag)))?;
        definition.category = category.to_string();
        Ok(())
    }

    /// Resolve user-supplied tag names (case-insensitive) into a validated set.
    ///
    /// Any unknown name rejects the whole set.
    pub fn parse_tag_set<S: AsRef<str>>(&self, names: &[S]) -> Result<BTreeSet<String>> {
        let mut set = BTreeSet::new();
        for name in names {
            let normalized = name.as_ref().trim().trim_start_matches('#').to_uppercase();
            if normalized.is_empty() {
                continue;
            }
            if !self.is_registered(&normalized) {
                return Err(TagdocError::Configuration(format!(
                    "Unknown tag: {}",
                    name.as_ref().trim()
                )));
            }
            set.insert(normalized);
        }
        Ok(set)
    }

    /// Recognize a tag line.
    ///
    /// Only the first tag token is honored; anything after it, including other
    /// tags, is returned verbatim in the remainder. Lines inside string literals
    /// are not distinguished from real comments.
    ///
    /// Matching is case-sensitive: `#edu` is a plain comment, not an `EDU` line.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagdoc::domain::TagGrammar;
    ///
    /// let grammar = TagGrammar::builtin();
    /// let m = grammar.match_tag_line("    #EDU #NOTE mixed").unwrap();
    /// assert_eq!(m.tag, "EDU");
    /// assert_eq!(m.remainder, "#NOTE mixed");
    /// assert!(grammar.match_tag_line("##EDU heading").is_none());
    /// assert!(grammar.match_tag_line("#edu lowercase").is_none());
    /// ```
    pub fn match_tag_line<'a>(&self, line: &'a str) -> Option<TagMatch<'a>> {
        let captures = tag_line_regex().captures(line)?;
        let tag = captures.get(1)?.as_str();
        if !self.is_registered(tag) {
            return None;
        }
        let remainder = captures.get(2).map_or("", |m| m.as_str());
        Some(TagMatch { tag, remainder })
    }
}
