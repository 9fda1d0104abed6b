//! filesort - sort a directory's files into category subdirectories
//!
//! This library scans one directory level, classifies every entry by its
//! extension, and moves files into sibling directories named after their
//! category. Each entry is processed by its own concurrent task; failures are
//! reported per file and never stop the rest of the run. A dry run reports the
//! same plan without touching the filesystem.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod record;
pub mod scanner;

pub use config::{CategoryConfig, ConfigError, OrganizerConfig};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{Outcome, ProcessError, process_file};
pub use orchestrator::{Concurrency, FileFailure, Orchestrator, RunSummary, TaskReport};
pub use record::{FileRecord, ValidationError};
pub use scanner::{DirScan, ScanError, scan_dir, scan_dir_report};

pub use cli::{run_cli, run_cli_with_config};
