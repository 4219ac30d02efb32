//! CLI command definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagdoc")]
#[command(about = "Extract tagged comments into documentation and strip them from source", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: tagdoc.toml in the current directory, if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract tagged comment blocks from a file or directory
    Extract {
        /// Source file or directory
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Only report these tags, comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Generate categorized markdown documentation from a source tree
    GenerateDocs {
        /// Root of the source tree
        source_root: PathBuf,

        /// Directory that receives the documentation
        #[arg(short, long)]
        output: PathBuf,

        /// Title of the top-level index (overrides site_title from config)
        #[arg(short, long)]
        title: Option<String>,

        /// Write pages without the YAML front-matter header
        #[arg(long)]
        no_frontmatter: bool,
    },

    /// Write a copy of a source file or directory without tagged comment blocks
    Strip {
        /// Source file or directory to strip
        path: PathBuf,

        /// Where to write the stripped copy (a directory for directory input)
        #[arg(short, long, required_unless_present = "in_place")]
        output: Option<PathBuf>,

        /// Descend into subdirectories of a directory input
        #[arg(short, long)]
        recursive: bool,

        /// Tags to strip, comma separated (default: configured strip set)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Overwrite the input file or directory
        #[arg(long)]
        in_place: bool,

        /// Report what would be removed without writing
        #[arg(long)]
        dry_run: bool,
    },
}

/// How `extract` prints its results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}
