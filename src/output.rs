//! Output formatting and styling module.
//!
//! Provides a centralized interface for all user-facing output of a run:
//! per-file outcome lines, error reports, the category summary and the
//! completion message. Diagnostic events (timings, skipped entries) go through
//! `tracing` instead.

use crate::file_organizer::Outcome;
use crate::orchestrator::{RunSummary, TaskReport};
use colored::*;
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗, on stderr)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Dry-run notices (yellow, prefixed)
/// - Summary tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use filesort::output::OutputFormatter;
    /// OutputFormatter::success("Processing complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints one task report as it arrives.
    ///
    /// Directories produce no line; everything else produces exactly one.
    pub fn task_report(report: &TaskReport) {
        match report {
            Ok(processed) => match &processed.outcome {
                Outcome::SkippedDirectory => {}
                Outcome::WouldMove { category, .. } => {
                    Self::dry_run_notice(&format!(
                        "Would move {:?} to {}/",
                        processed.name, category
                    ));
                }
                Outcome::Moved { category, .. } => {
                    Self::success(&format!("Moved {:?} to {}/", processed.name, category));
                }
            },
            Err(failure) => Self::error(&format!("Error processing file: {}", failure)),
        }
    }

    /// Prints the per-category table and the failure count of a run.
    pub fn run_summary(summary: &RunSummary, dry_run: bool) {
        let files = summary.moved + summary.previewed;
        if files > 0 {
            Self::summary_table(&summary.by_category, files);
        }
        if dry_run && files > 0 {
            Self::dry_run_notice("No files were modified.");
        }
        if !summary.is_clean() {
            Self::warning(&format!(
                "{} of {} entries could not be processed. Please review errors above.",
                summary.failures.len(),
                summary.total
            ));
        }
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// ```no_run
    /// use filesort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Docs".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_column_width(category_counts);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural_files(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files),
            width = width
        );
    }
}

fn category_column_width(category_counts: &BTreeMap<String, usize>) -> usize {
    category_counts
        .keys()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len())
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
