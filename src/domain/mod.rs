//! Domain layer - tag grammar, scanning, block assembly, rendering and stripping

pub mod assembler;
pub mod document;
pub mod grammar;
pub mod scanner;
pub mod stripper;

pub use assembler::{BlockAssembler, CommentBlock, ExtractionResult};
pub use document::{DocumentGenerator, DocumentSet, GeneratedDocument, IndexPage, MarkdownPage};
pub use grammar::{Category, TagDefinition, TagGrammar, TagMatch};
pub use scanner::{CommentScanner, LineKind, ScannedLine};
pub use stripper::{CommentStripper, StrippedSource};
