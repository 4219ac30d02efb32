//! Infrastructure layer - configuration, file discovery and output

pub mod config;
pub mod output;
pub mod source_tree;

pub use config::Config;
pub use output::{write_text, OutputDirectory};
pub use source_tree::{read_source, SourceTree};
