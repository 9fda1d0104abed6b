/// Moving files into their category directories.
///
/// The category directory of a file is a sibling of the file, named after the
/// category label: `/downloads/report.pdf` goes to `/downloads/Docs/report.pdf`.
/// Directories are never moved, and nothing on disk changes in dry-run mode.
use crate::record::{FileRecord, ValidationError};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// What processing one record did, or would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record is a directory; left alone.
    SkippedDirectory,
    /// Dry run: the file would be moved to `destination`.
    WouldMove {
        category: String,
        destination: PathBuf,
    },
    /// The file now lives at `destination`.
    Moved {
        category: String,
        destination: PathBuf,
    },
}

impl Outcome {
    /// Category the file went (or would go) to. `None` for directories.
    pub fn category(&self) -> Option<&str> {
        match self {
            Outcome::SkippedDirectory => None,
            Outcome::WouldMove { category, .. } | Outcome::Moved { category, .. } => {
                Some(category)
            }
        }
    }
}

/// Errors that can occur while organizing a single file.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The record failed validation; nothing was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failed to create a category directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to move a file to its category directory.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file with the same name is already in the category directory.
    #[error("destination {} already exists", .path.display())]
    DestinationExists { path: PathBuf },

    /// No thread could be started to process the file.
    #[error("failed to start a task: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Processes one scanned record.
///
/// Directories are a no-op. Files are validated first; an invalid record never
/// touches the filesystem. With `dry_run` set the intended destination is
/// reported and nothing else happens. Otherwise the category directory is
/// created if needed (concurrent callers creating the same directory do not
/// fail) and the file is renamed into it under its original name.
///
/// The elapsed time of every call is logged, whatever the outcome.
///
/// # Examples
///
/// ```no_run
/// use filesort::file_category::CategoryTable;
/// use filesort::file_organizer::process_file;
/// use filesort::scanner::scan_dir;
/// use std::path::Path;
///
/// let table = CategoryTable::default();
/// for record in scan_dir(Path::new("/path/to/downloads"), &table)? {
///     match process_file(&record, true) {
///         Ok(outcome) => println!("{}: {:?}", record.name(), outcome),
///         Err(e) => eprintln!("{}: {}", record.name(), e),
///     }
/// }
/// # Ok::<(), filesort::scanner::ScanError>(())
/// ```
pub fn process_file(record: &FileRecord, dry_run: bool) -> ProcessResult<Outcome> {
    let start = Instant::now();
    let result = organize(record, dry_run);
    tracing::info!(
        file = %record.name(),
        elapsed = ?start.elapsed(),
        ok = result.is_ok(),
        "processed"
    );
    result
}

fn organize(record: &FileRecord, dry_run: bool) -> ProcessResult<Outcome> {
    if record.is_dir() {
        return Ok(Outcome::SkippedDirectory);
    }

    record.validate()?;

    let category = record.category().label().to_string();
    let category_path = category_dir(record.path(), &category);
    let destination = category_path.join(file_name(record));

    if dry_run {
        return Ok(Outcome::WouldMove {
            category,
            destination,
        });
    }

    fs::create_dir_all(&category_path).map_err(|source| ProcessError::CreateDir {
        path: category_path.clone(),
        source,
    })?;

    // rename() silently replaces an existing file on most platforms.
    if fs::symlink_metadata(&destination).is_ok() {
        return Err(ProcessError::DestinationExists { path: destination });
    }

    fs::rename(record.path(), &destination).map_err(|source| ProcessError::Move {
        from: record.path().to_path_buf(),
        to: destination.clone(),
        source,
    })?;

    tracing::debug!(
        from = %record.path().display(),
        to = %destination.display(),
        "moved"
    );

    Ok(Outcome::Moved {
        category,
        destination,
    })
}

/// The category directory next to `file_path`.
fn category_dir(file_path: &Path, category: &str) -> PathBuf {
    file_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(category)
}

/// Prefer the on-disk name so non-UTF-8 names survive the move unchanged.
fn file_name(record: &FileRecord) -> &OsStr {
    record
        .path()
        .file_name()
        .unwrap_or_else(|| OsStr::new(record.name()))
}
