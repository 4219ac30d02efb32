//! Markdown document generation from extracted comment blocks
//!
//! Blocks are grouped by category, then by source file. Each (category, file)
//! pair becomes one document; every category with documents gets an index, and
//! a top-level index lists everything. Rendering is deterministic apart from
//! the `date:` front-matter field.

use super::assembler::{CommentBlock, ExtractionResult};
use super::grammar::{Category, TagGrammar};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

/// Heading used for blocks without an enclosing declaration
pub const GENERAL_CONTEXT: &str = "general";

/// Name of the index file written at the output root and in each category
pub const INDEX_FILE: &str = "index.md";

/// YAML front-matter header of a generated page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub tags: Vec<String>,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl FrontMatter {
    pub fn render(&self) -> String {
        format!(
            "---\ntitle: {}\ntags: [{}]\ndescription: {}\ndate: {}\n---\n\n",
            yaml_quote(&self.title),
            self.tags.join(", "),
            yaml_quote(&self.description),
            self.date.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// A markdown file to be written under the output directory
pub trait MarkdownPage {
    /// Path relative to the output directory
    fn path(&self) -> &Path;

    fn front_matter(&self) -> &FrontMatter;

    /// Everything after the front-matter
    fn body(&self) -> &str;

    fn render(&self) -> String {
        self.render_with(true)
    }

    /// Render with or without the front-matter header
    fn render_with(&self, front_matter: bool) -> String {
        if !front_matter {
            return self.body().to_string();
        }
        let mut out = self.front_matter().render();
        out.push_str(self.body());
        out
    }
}

/// Documentation of one category's blocks from one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    /// Category key
    pub category: String,
    /// Source file relative to the source root, `/`-separated
    pub source_file: String,
    /// Output file name inside the category directory
    pub file_name: String,
    pub block_count: usize,
    pub path: PathBuf,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl MarkdownPage for GeneratedDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    fn body(&self) -> &str {
        &self.body
    }
}

/// A listing page (category index or top-level index)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub path: PathBuf,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl MarkdownPage for IndexPage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    fn body(&self) -> &str {
        &self.body
    }
}

/// Everything produced by one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    /// Ordered by category, then source path
    pub documents: Vec<GeneratedDocument>,
    pub category_indices: Vec<IndexPage>,
    pub index: IndexPage,
}

impl DocumentSet {
    /// All pages in write order: documents, category indices, top-level index
    pub fn pages(&self) -> impl Iterator<Item = &dyn MarkdownPage> {
        self.documents
            .iter()
            .map(|d| d as &dyn MarkdownPage)
            .chain(self.category_indices.iter().map(|p| p as &dyn MarkdownPage))
            .chain(std::iter::once(&self.index as &dyn MarkdownPage))
    }

    /// Category keys that received at least one document, in category order
    pub fn categories(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for doc in &self.documents {
            if keys.last() != Some(&doc.category.as_str()) {
                keys.push(&doc.category);
            }
        }
        keys
    }
}

/// Renders extraction results into markdown pages
pub struct DocumentGenerator<'g> {
    grammar: &'g TagGrammar,
    site_title: String,
    generated_at: DateTime<Utc>,
}

impl<'g> DocumentGenerator<'g> {
    pub fn new(grammar: &'g TagGrammar, site_title: &str, generated_at: DateTime<Utc>) -> Self {
        DocumentGenerator {
            grammar,
            site_title: site_title.to_string(),
            generated_at,
        }
    }

    /// Build every page for the given results.
    ///
    /// Source paths are shown relative to `source_root`. The output does not
    /// depend on the order of `results`.
    pub fn generate(&self, results: &[ExtractionResult], source_root: &Path) -> DocumentSet {
        let file_names = assign_file_names(
            results
                .iter()
                .filter(|r| !r.is_empty())
                .map(|r| relative_display(r.file_path(), source_root)),
        );
        let mut groups: BTreeMap<(usize, String), Vec<&CommentBlock>> = BTreeMap::new();

        for result in results {
            let source = relative_display(result.file_path(), source_root);
            for block in result.blocks() {
                let Some(rank) = self
                    .grammar
                    .lookup(&block.tag)
                    .and_then(|t| self.grammar.category_rank(&t.category))
                else {
                    tracing::debug!(tag = %block.tag, "Tag has no category, skipping block");
                    continue;
                };
                groups
                    .entry((rank, source.clone()))
                    .or_default()
                    .push(block);
            }
        }

        let documents: Vec<GeneratedDocument> = groups
            .iter()
            .map(|((rank, source), blocks)| {
                self.render_document(
                    &self.grammar.categories()[*rank],
                    source,
                    &file_names[source],
                    blocks,
                )
            })
            .collect();

        let category_indices = self
            .grammar
            .categories()
            .iter()
            .filter_map(|category| {
                let docs: Vec<&GeneratedDocument> = documents
                    .iter()
                    .filter(|d| d.category == category.key)
                    .collect();
                (!docs.is_empty()).then(|| self.render_category_index(category, &docs))
            })
            .collect();

        let index = self.render_main_index(&documents);

        DocumentSet {
            documents,
            category_indices,
            index,
        }
    }

    fn render_document(
        &self,
        category: &Category,
        source: &str,
        file_name: &str,
        blocks: &[&CommentBlock],
    ) -> GeneratedDocument {
        let title = file_title(source);

        let mut tags: Vec<String> = Vec::new();
        for definition in self.grammar.tags() {
            if blocks.iter().any(|b| b.tag == definition.name) {
                tags.push(definition.name.to_lowercase());
            }
        }
        tags.push("auto-generated".to_string());

        let file_name = source.rsplit('/').next().unwrap_or(source);
        let front_matter = FrontMatter {
            title: format!("{}: {}", category.title, title),
            tags,
            description: format!("{} from {}", category.title, file_name),
            date: self.generated_at,
        };

        let mut lines = vec![
            format!("# {}: {}", category.title, title),
            String::new(),
            format!("**Source File**: `{}`", source),
            String::new(),
            format!("**Category**: {}", category.description),
            String::new(),
            "---".to_string(),
            String::new(),
        ];

        for block in blocks {
            lines.push(format!(
                "## {}",
                block.context.as_deref().unwrap_or(GENERAL_CONTEXT)
            ));
            lines.push(String::new());
            if !block.lines.is_empty() {
                lines.push(block.text());
                lines.push(String::new());
            }
            lines.push(format!("*Source: {}:{}*", source, block.line_number));
            lines.push(String::new());
            lines.push("---".to_string());
            lines.push(String::new());
        }

        GeneratedDocument {
            category: category.key.clone(),
            source_file: source.to_string(),
            file_name: file_name.to_string(),
            block_count: blocks.len(),
            path: Path::new(&category.key).join(file_name),
            front_matter,
            body: lines.join("\n"),
        }
    }

    fn render_category_index(&self, category: &Category, docs: &[&GeneratedDocument]) -> IndexPage {
        let mut lines = vec![
            format!("# {}", category.title),
            String::new(),
            category.description.clone(),
            String::new(),
            "---".to_string(),
            String::new(),
            "## Documentation Files".to_string(),
            String::new(),
        ];
        for doc in docs {
            lines.push(format!("- [{}]({})", doc.source_file, doc.file_name));
        }
        lines.push(String::new());

        IndexPage {
            path: Path::new(&category.key).join(INDEX_FILE),
            front_matter: FrontMatter {
                title: category.title.clone(),
                tags: vec![category.key.clone(), "index".to_string()],
                description: category.description.clone(),
                date: self.generated_at,
            },
            body: lines.join("\n"),
        }
    }

    fn render_main_index(&self, documents: &[GeneratedDocument]) -> IndexPage {
        let mut lines = vec![
            format!("# {}", self.site_title),
            String::new(),
            "This documentation is automatically generated from code comments.".to_string(),
            String::new(),
            "---".to_string(),
            String::new(),
            "## Documentation Categories".to_string(),
            String::new(),
        ];

        if documents.is_empty() {
            lines.push("*No tagged comments found.*".to_string());
            lines.push(String::new());
        }

        for category in self.grammar.categories() {
            let docs: Vec<&GeneratedDocument> = documents
                .iter()
                .filter(|d| d.category == category.key)
                .collect();
            if docs.is_empty() {
                continue;
            }

            lines.push(format!(
                "### [{}]({}/{})",
                category.title, category.key, INDEX_FILE
            ));
            lines.push(String::new());
            lines.push(category.description.clone());
            lines.push(String::new());
            lines.push(format!("**{} document(s)**", docs.len()));
            lines.push(String::new());
            for doc in docs {
                lines.push(format!(
                    "- [{}]({}/{})",
                    doc.source_file, category.key, doc.file_name
                ));
            }
            lines.push(String::new());
        }

        IndexPage {
            path: PathBuf::from(INDEX_FILE),
            front_matter: FrontMatter {
                title: self.site_title.clone(),
                tags: vec!["index".to_string(), "home".to_string()],
                description: "Auto-generated documentation from code comments".to_string(),
                date: self.generated_at,
            },
            body: lines.join("\n"),
        }
    }
}

/// `/`-separated path of `path` relative to `root` (or `path` itself when it
/// is not under `root`)
pub fn relative_display(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return path.to_string_lossy().into_owned();
    }
    parts.join("/")
}

/// Output file name for a source path: directories flattened with `__`
fn document_file_name(source: &str) -> String {
    format!("{}.md", source.replace('/', "__"))
}

/// File name per source path. Flattening can map two sources to one name
/// (`a/b.py` and `a__b.py`); the lexicographically later source then gets a
/// numeric suffix, so names do not depend on scan order.
fn assign_file_names(sources: impl Iterator<Item = String>) -> BTreeMap<String, String> {
    let sources: BTreeSet<String> = sources.collect();
    let mut taken = BTreeSet::new();
    let mut names = BTreeMap::new();

    for source in sources {
        let mut name = document_file_name(&source);
        let mut n = 2;
        while taken.contains(&name) {
            name = format!("{}-{}.md", source.replace('/', "__"), n);
            n += 1;
        }
        if n > 2 {
            tracing::warn!(%source, file = %name, "Document name collision, using suffixed name");
        }
        taken.insert(name.clone());
        names.insert(source, name);
    }
    names
}

/// Human title from a source path: `button_layout.py` becomes `Button Layout`
fn file_title(source: &str) -> String {
    let name = source.rsplit('/').next().unwrap_or(source);
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);

    let words: Vec<String> = stem
        .split(&['_', '-', ' '][..])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        stem.to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlockAssembler;
    use chrono::TimeZone;

    fn timestamp(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 17, hour, 0, 0).unwrap()
    }

    fn extract(grammar: &TagGrammar, path: &str, content: &str) -> ExtractionResult {
        BlockAssembler::assemble(grammar, content, Path::new(path))
    }

    #[test]
    fn test_front_matter_render() {
        let fm = FrontMatter {
            title: "Say \"hi\"".to_string(),
            tags: vec!["edu".to_string(), "auto-generated".to_string()],
            description: "desc".to_string(),
            date: timestamp(9),
        };
        assert_eq!(
            fm.render(),
            "---\ntitle: \"Say \\\"hi\\\"\"\ntags: [edu, auto-generated]\ndescription: \"desc\"\ndate: 2025-01-17T09:00:00Z\n---\n\n"
        );
    }

    #[test]
    fn test_one_document_per_category_and_file() {
        let grammar = TagGrammar::builtin();
        let results = vec![
            extract(
                &grammar,
                "src/app/main.py",
                "#EDU first line\n#EDU second line\ndef foo():\n    pass\n#NOTE unrelated\n",
            ),
            extract(&grammar, "src/util.py", "#EDU util note\n"),
        ];

        let generator = DocumentGenerator::new(&grammar, "Docs", timestamp(9));
        let set = generator.generate(&results, Path::new("src"));

        let paths: Vec<&Path> = set.documents.iter().map(|d| d.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("educational/app__main.py.md"),
                Path::new("educational/util.py.md"),
                Path::new("notes/app__main.py.md"),
            ]
        );
        assert_eq!(set.categories(), vec!["educational", "notes"]);
        assert_eq!(set.category_indices.len(), 2);
        assert_eq!(set.pages().count(), 6);
    }

    #[test]
    fn test_document_body_layout() {
        let grammar = TagGrammar::builtin();
        let results = vec![extract(
            &grammar,
            "root/button_layout.py",
            "#EDU first line\n#EDU second line\ndef foo():\n    #EDU inside\n    pass\n",
        )];
        let set = DocumentGenerator::new(&grammar, "Docs", timestamp(9))
            .generate(&results, Path::new("root"));
        let doc = &set.documents[0];

        assert_eq!(doc.front_matter.title, "Learning Notes: Button Layout");
        assert_eq!(doc.front_matter.tags, vec!["edu", "auto-generated"]);
        assert_eq!(doc.block_count, 2);
        assert!(doc.body.starts_with("# Learning Notes: Button Layout\n"));
        assert!(doc.body.contains("**Source File**: `button_layout.py`"));
        assert!(doc
            .body
            .contains("## general\n\nfirst line\nsecond line\n\n*Source: button_layout.py:1*"));
        assert!(doc
            .body
            .contains("## foo\n\ninside\n\n*Source: button_layout.py:4*"));
        assert!(doc.render().starts_with("---\ntitle: \"Learning Notes: Button Layout\""));
    }

    #[test]
    fn test_shared_category_merges_tags() {
        let mut grammar = TagGrammar::builtin();
        grammar.remap("DEBUG", "notes").unwrap();
        let results = vec![extract(&grammar, "a.py", "#NOTE n\nx\n#DEBUG d\n")];
        let set = DocumentGenerator::new(&grammar, "Docs", timestamp(9))
            .generate(&results, Path::new(""));

        assert_eq!(set.documents.len(), 1);
        assert_eq!(
            set.documents[0].front_matter.tags,
            vec!["note", "debug", "auto-generated"]
        );
        assert_eq!(set.documents[0].block_count, 2);
    }

    #[test]
    fn test_untagged_files_produce_no_documents() {
        let grammar = TagGrammar::builtin();
        let results = vec![extract(&grammar, "plain.py", "# nothing here\nx = 1\n")];
        let set = DocumentGenerator::new(&grammar, "Docs", timestamp(9))
            .generate(&results, Path::new(""));

        assert!(set.documents.is_empty());
        assert!(set.category_indices.is_empty());
        assert!(set.index.body.contains("*No tagged comments found.*"));
    }

    #[test]
    fn test_bodies_are_deterministic_and_order_independent() {
        let grammar = TagGrammar::builtin();
        let a = extract(&grammar, "a.py", "#EDU a\n#TODO later\n");
        let b = extract(&grammar, "b.py", "#EDU b\n");

        let first = DocumentGenerator::new(&grammar, "Docs", timestamp(9))
            .generate(&[a.clone(), b.clone()], Path::new(""));
        let second = DocumentGenerator::new(&grammar, "Docs", timestamp(17))
            .generate(&[b, a], Path::new(""));

        let bodies = |set: &DocumentSet| -> Vec<(PathBuf, String)> {
            set.pages()
                .map(|p| (p.path().to_path_buf(), p.body().to_string()))
                .collect()
        };
        assert_eq!(bodies(&first), bodies(&second));
        assert_ne!(first.index.render(), second.index.render());
    }

    #[test]
    fn test_main_index_lists_documents() {
        let grammar = TagGrammar::builtin();
        let results = vec![
            extract(&grammar, "pkg/z.py", "#OPTIMIZE cache this\n"),
            extract(&grammar, "pkg/a.py", "#OPTIMIZE batch\n#EDU learn\n"),
        ];
        let set = DocumentGenerator::new(&grammar, "Jarvis", timestamp(9))
            .generate(&results, Path::new("pkg"));

        let body = &set.index.body;
        assert!(body.starts_with("# Jarvis\n"));
        let edu = body.find("### [Learning Notes](educational/index.md)").unwrap();
        let perf = body.find("### [Performance Notes](performance/index.md)").unwrap();
        assert!(edu < perf);
        assert!(body.contains("**2 document(s)**"));
        let a = body.find("- [a.py](performance/a.py.md)").unwrap();
        let z = body.find("- [z.py](performance/z.py.md)").unwrap();
        assert!(a < z);

        let perf_index = set
            .category_indices
            .iter()
            .find(|p| p.path == Path::new("performance/index.md"))
            .unwrap();
        assert!(perf_index.body.contains("- [a.py](a.py.md)\n- [z.py](z.py.md)"));
    }

    #[test]
    fn test_flattened_name_collision_is_disambiguated() {
        let grammar = TagGrammar::builtin();
        let results = vec![
            extract(&grammar, "a__b.py", "#EDU top level\n"),
            extract(&grammar, "a/b.py", "#EDU nested\n"),
        ];
        let set = DocumentGenerator::new(&grammar, "Docs", timestamp(9))
            .generate(&results, Path::new(""));

        let paths: Vec<PathBuf> = set.documents.iter().map(|d| d.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("educational/a__b.py.md"),
                PathBuf::from("educational/a__b.py-2.md"),
            ]
        );
        assert!(set
            .index
            .body
            .contains("- [a/b.py](educational/a__b.py.md)\n- [a__b.py](educational/a__b.py-2.md)"));
    }

    #[test]
    fn test_render_without_front_matter() {
        let grammar = TagGrammar::builtin();
        let results = vec![extract(&grammar, "a.py", "#EDU hi\n")];
        let set = DocumentGenerator::new(&grammar, "Docs", timestamp(9))
            .generate(&results, Path::new(""));

        let page = set.documents[0].render_with(false);
        assert!(page.starts_with("# Learning Notes: A\n"));
        assert!(!page.contains("date: "));
    }

    #[test]
    fn test_relative_display() {
        assert_eq!(
            relative_display(Path::new("src/pkg/mod.py"), Path::new("src")),
            "pkg/mod.py"
        );
        assert_eq!(
            relative_display(Path::new("./lib/x.py"), Path::new(".")),
            "lib/x.py"
        );
        assert_eq!(
            relative_display(Path::new("other/x.py"), Path::new("src")),
            "other/x.py"
        );
    }

    #[test]
    fn test_file_title() {
        assert_eq!(file_title("jarvis/actions/actions.py"), "Actions");
        assert_eq!(file_title("__init__.py"), "Init");
        assert_eq!(file_title("button_layout-v2.py"), "Button Layout V2");
    }
}
