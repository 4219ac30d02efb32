//! Output formatting utilities

use crate::application::{GenerationOutcome, RunReport, StripOutcome};
use crate::domain::ExtractionResult;

/// Format extraction results as a human-readable listing
pub fn format_extraction_summary(results: &[ExtractionResult]) -> String {
    if results.iter().all(|r| r.is_empty()) {
        return "No tagged comments found\n".to_string();
    }

    let mut output = String::new();
    for result in results {
        output.push_str(&format!(
            "{} ({} block(s))\n",
            result.file_path().display(),
            result.block_count()
        ));
        for block in result.blocks() {
            let context = block
                .context
                .as_deref()
                .map(|c| format!(" in {}", c))
                .unwrap_or_default();
            let first = block.lines.first().map(String::as_str).unwrap_or("");
            output.push_str(&format!(
                "  {:>5}  #{}{}: {}\n",
                block.line_number, block.tag, context, first
            ));
        }
    }

    let total: usize = results.iter().map(|r| r.block_count()).sum();
    output.push_str(&format!("\n{} block(s) in {} file(s)\n", total, results.len()));
    output
}

/// Format which files were processed and which were skipped
pub fn format_run_report(report: &RunReport) -> String {
    let mut output = format!(
        "Processed {} file(s), skipped {}\n",
        report.succeeded.len(),
        report.skipped.len()
    );
    for line in report.skipped_lines() {
        output.push_str(&format!("  skipped {}\n", line));
    }
    output
}

pub fn format_generation(outcome: &GenerationOutcome) -> String {
    let mut output = format_run_report(&outcome.report);
    output.push_str(&format!(
        "Generated {} document(s) in {} categor{} under {}\n",
        outcome.documents,
        outcome.categories.len(),
        if outcome.categories.len() == 1 { "y" } else { "ies" },
        outcome.output_dir.display()
    ));
    for category in &outcome.categories {
        output.push_str(&format!("  {}\n", category));
    }
    output
}

pub fn format_strip_outcome(outcome: &StripOutcome) -> String {
    let action = if outcome.dry_run {
        "Would write"
    } else {
        "Wrote"
    };

    let mut output = String::new();
    for file in &outcome.files {
        let stats = &file.stripped;
        output.push_str(&format!(
            "{} {} ({} block(s), {} of {} lines removed, {:.1}%)\n",
            action,
            file.output.display(),
            stats.blocks_removed,
            stats.lines_removed(),
            stats.original_lines,
            stats.reduction_percent()
        ));
    }

    if outcome.files.len() > 1 {
        output.push_str(&format!(
            "{} block(s), {} of {} lines removed across {} file(s)\n",
            outcome.blocks_removed(),
            outcome.lines_removed(),
            outcome.original_lines(),
            outcome.files.len()
        ));
    }
    if outcome.report.has_skips() {
        output.push_str(&format_run_report(&outcome.report));
    }
    output
}
