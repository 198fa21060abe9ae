//! User-facing output for pdfstitch.
//!
//! This module handles everything printed for a person at a terminal:
//! - Formatted status messages
//! - Quiet and verbose modes
//! - Summaries of a merge plan, load and write results
//!
//! Diagnostic logging goes through `tracing` instead.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::document::MergeStatistics;
use crate::io::{LoadStatistics, WriteStatistics};
use crate::validation::MergePlan;

/// Display a merge plan as a numbered list.
pub fn display_merge_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section(&format!("Merge plan for {}:", plan.output));

    for (index, result) in plan.summary.results.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &format!(
                "{} ({} page(s), {})",
                result.name,
                result.page_count,
                crate::utils::format_file_size(result.size)
            ),
        );
        formatter.detail("PDF version", &result.version);
        if let Some((width, height)) = result.page_dimensions {
            formatter.detail("First page", &format!("{width} x {height} pt"));
        }
    }

    formatter.blank_line();
    formatter.info(&format!(
        "Would merge {} document(s): {} pages, {}",
        plan.summary.documents,
        plan.summary.total_pages,
        plan.summary.format_total_size()
    ));
}

/// Display load statistics.
pub fn display_load_statistics(formatter: &OutputFormatter, stats: &LoadStatistics) {
    if stats.failure_count > 0 {
        formatter.warning(&format!("{} file(s) failed to load", stats.failure_count));
    }

    formatter.debug(&format!(
        "Loaded {} file(s) in {:.2}s: {}",
        stats.success_count,
        stats.total_time.as_secs_f64(),
        stats.format_total_size()
    ));
}

/// Display the result of a merge.
pub fn display_merge_statistics(
    formatter: &OutputFormatter,
    merge: &MergeStatistics,
    write: &WriteStatistics,
) {
    formatter.success(&format!(
        "Merged {} document(s) ({} pages) into {}",
        merge.documents_merged,
        merge.total_pages,
        write.output_path.display()
    ));
    formatter.detail("Input size", &merge.format_input_size());
    formatter.detail("Output size", &write.format_file_size());
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", merge.merge_time.as_secs_f64()),
    );
}
