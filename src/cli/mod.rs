//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::{format_extraction_summary, format_generation, format_run_report, format_strip_outcome};
