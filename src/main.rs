use clap::Parser;
use tagdoc::application::{Command, ExtractCommand, GenerateDocsCommand, StripCommand};
use tagdoc::cli::{
    format_extraction_summary, format_generation, format_run_report, format_strip_outcome, Cli,
    Commands, OutputFormat,
};
use tagdoc::error::TagdocError;
use tagdoc::infrastructure::Config;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            eprintln!("Aborted.");
            std::process::exit(e.exit_code());
        }
    }
}

/// Default level for `-v` counts; `RUST_LOG` directives still apply
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("tagdoc={}", log_level(verbose)).parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<(), TagdocError> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            path,
            recursive,
            format,
            tags,
        } => {
            let outcome = ExtractCommand::new(&config, path, recursive)
                .with_tags(tags)
                .invoke()?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&outcome.results)?)
                }
                OutputFormat::Summary => {
                    print!("{}", format_extraction_summary(&outcome.results));
                    if outcome.report.has_skips() {
                        print!("{}", format_run_report(&outcome.report));
                    }
                }
            }
            Ok(())
        }
        Commands::GenerateDocs {
            source_root,
            output,
            title,
            no_frontmatter,
        } => {
            let outcome = GenerateDocsCommand::new(&config, source_root, output)
                .with_site_title(title)
                .front_matter(!no_frontmatter)
                .invoke()?;
            print!("{}", format_generation(&outcome));
            Ok(())
        }
        Commands::Strip {
            path,
            output,
            recursive,
            tags,
            in_place,
            dry_run,
        } => {
            let outcome = StripCommand::new(&config, path, output)
                .with_tags(tags)
                .recursive(recursive)
                .in_place(in_place)
                .dry_run(dry_run)
                .invoke()?;
            print!("{}", format_strip_outcome(&outcome));
            Ok(())
        }
    }
}
