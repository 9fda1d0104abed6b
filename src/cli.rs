//! Command-line interface module for filesort.
//!
//! This module handles all CLI-related functionality:
//! - Argument parsing
//! - Scanning the target directory
//! - Running the concurrent organization pass
//! - Streaming per-file reports and the final summary

use crate::config::OrganizerConfig;
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::output::OutputFormatter;
use crate::scanner::{ScanError, scan_dir_report};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Version line printed by `--version`.
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Sort the files of a directory into category subdirectories by extension.
#[derive(Parser, Debug, Clone)]
#[command(name = "filesort", about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Show version
    #[arg(long, action = ArgAction::SetTrue)]
    pub version: bool,

    /// Directory to organize
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Preview changes without moving files
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

/// Organizes `dir_path` with the built-in categories.
///
/// # Examples
///
/// ```no_run
/// use filesort::cli::run_cli;
/// use std::path::Path;
///
/// match run_cli(Path::new("/path/to/directory"), true) {
///     Ok(summary) => println!("{} files would move", summary.previewed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(dir_path: &Path, dry_run: bool) -> Result<RunSummary, ScanError> {
    run_cli_with_config(dir_path, dry_run, &OrganizerConfig::default())
}

/// Organizes `dir_path` with an explicit configuration.
///
/// This function:
/// 1. Scans the directory (a failure here aborts the run)
/// 2. Reports entries that had to be skipped
/// 3. Processes every entry concurrently, printing reports as they arrive
/// 4. Prints the summary and the completion message
///
/// Individual file failures are printed and counted in the returned summary;
/// they do not make the run fail.
pub fn run_cli_with_config(
    dir_path: &Path,
    dry_run: bool,
    config: &OrganizerConfig,
) -> Result<RunSummary, ScanError> {
    if dry_run {
        OutputFormatter::info(&format!(
            "DRY RUN: Analyzing contents of: {}",
            dir_path.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", dir_path.display()));
    }

    let scan = scan_dir_report(dir_path, &config.table)?;
    if !scan.skipped.is_empty() {
        OutputFormatter::warning(&format!(
            "{} {} could not be read and will be left alone",
            scan.skipped.len(),
            if scan.skipped.len() == 1 { "entry" } else { "entries" }
        ));
    }

    let summary = Orchestrator::new(config.concurrency).run(
        scan.records,
        dry_run,
        OutputFormatter::task_report,
    );

    OutputFormatter::run_summary(&summary, dry_run);
    OutputFormatter::success("Processing complete!");

    Ok(summary)
}
