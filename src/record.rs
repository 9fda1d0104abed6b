//! Scanned directory entries and their validation.

use crate::file_category::{Category, CategoryTable};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a record is refused before any filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("filename cannot be empty")]
    EmptyName,
    #[error("file size must be positive")]
    NonPositiveSize,
}

/// One entry observed while scanning a directory.
///
/// The extension and category are derived when the record is created and
/// never change afterwards.
#[derive(Debug, Clone)]
pub struct FileRecord {
    name: String,
    path: PathBuf,
    size: u64,
    modified: DateTime<Local>,
    is_dir: bool,
    extension: String,
    category: Category,
}

impl FileRecord {
    /// Creates a record and classifies it against `table`.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        size: u64,
        modified: DateTime<Local>,
        is_dir: bool,
        table: &CategoryTable,
    ) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        let category = table.classify(&extension, is_dir);
        Self {
            name,
            path: path.into(),
            size,
            modified,
            is_dir,
            extension,
            category,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes. Only meaningful for files.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> DateTime<Local> {
        self.modified
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Lowercase extension with its leading dot, or an empty string.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Checks that a file record is safe to move.
    ///
    /// Directories always pass. Files need a name with at least one
    /// non-whitespace character and a size above zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_dir {
            return Ok(());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.size == 0 {
            return Err(ValidationError::NonPositiveSize);
        }
        Ok(())
    }
}

/// Derives the classification key of a file name: everything from the last
/// `.` onwards, lowercased.
///
/// A name without a dot has no extension. A leading dot counts, so
/// `.bashrc` yields `.bashrc`.
///
/// ```
/// use filesort::record::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), ".pdf");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    name.rfind('.')
        .map(|idx| name[idx..].to_lowercase())
        .unwrap_or_default()
}
