//! Configuration management
//!
//! A [`Config`] is built once from the built-in defaults plus an optional
//! `tagdoc.toml`, validated, and then passed explicitly to every command.

use crate::domain::{Category, TagDefinition, TagGrammar};
use crate::error::{Result, TagdocError};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// File looked up in the current directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "tagdoc.toml";

pub const DEFAULT_SITE_TITLE: &str = "Project Documentation";

/// On-disk shape of `tagdoc.toml`; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    site_title: Option<String>,
    extensions: Option<Vec<String>>,
    strip: Option<Vec<String>>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    tags: Vec<TagEntry>,
    #[serde(default)]
    mapping: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TagEntry {
    name: String,
    category: String,
    #[serde(default)]
    strip: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub grammar: TagGrammar,
    pub site_title: String,
    /// File extensions (without the dot) scanned in directories
    pub extensions: Vec<String>,
    /// Tags stripped when `--tags` is not given
    pub strip: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        let grammar = TagGrammar::builtin();
        let strip = grammar.default_strip_set();
        Config {
            grammar,
            site_title: DEFAULT_SITE_TITLE.to_string(),
            extensions: vec!["py".to_string()],
            strip,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `tagdoc.toml` in the current
    /// directory is used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load_from_file(default_path)
                } else {
                    tracing::debug!("No tagdoc.toml found, using built-in configuration");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TagdocError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(?path, tags = config.grammar.tags().len(), "Loaded config");
        Ok(config)
    }

    /// Parse and validate configuration, layered over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let mut config = Config::default();

        if let Some(title) = file.site_title {
            if title.trim().is_empty() {
                return Err(TagdocError::Configuration(
                    "site_title must not be empty".to_string(),
                ));
            }
            config.site_title = title;
        }

        if let Some(extensions) = file.extensions {
            config.extensions = extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect();
            if config.extensions.is_empty() {
                return Err(TagdocError::Configuration(
                    "extensions must name at least one file extension".to_string(),
                ));
            }
        }

        for category in file.categories {
            config.grammar.upsert_category(category)?;
        }

        for entry in file.tags {
            config.grammar.upsert_tag(TagDefinition {
                name: entry.name,
                category: entry.category,
                strip_by_default: entry.strip,
            })?;
        }

        for (tag, category) in &file.mapping {
            config.grammar.remap(tag, category)?;
        }

        config.strip = match file.strip {
            Some(names) => config.grammar.parse_tag_set(names.as_slice())?,
            None => config.grammar.default_strip_set(),
        };

        Ok(config)
    }

    /// Strip set for a run: the explicit tags when given, else the configured
    /// default. Unknown tags are rejected.
    pub fn resolve_strip_set(&self, tags: Option<&[String]>) -> Result<BTreeSet<String>> {
        match tags {
            Some(names) => self.grammar.parse_tag_set(names),
            None => Ok(self.strip.clone()),
        }
    }
}
