//! Single-level directory scanning.
//!
//! A scan lists the immediate children of one directory and turns each into a
//! classified [`FileRecord`]. Failing to open the directory is fatal; failing
//! to read one entry's metadata only skips that entry.

use crate::file_category::CategoryTable;
use crate::record::FileRecord;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name reported for entries whose directory listing item could not be read.
const UNREADABLE_ENTRY: &str = "<unreadable entry>";

/// The directory itself could not be listed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An entry left out of the scan because its metadata was unreadable.
#[derive(Debug)]
pub struct SkippedEntry {
    pub name: String,
    pub error: io::Error,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skipping {}: {}", self.name, self.error)
    }
}

/// Result of a scan that kept going past unreadable entries.
#[derive(Debug, Default)]
pub struct DirScan {
    /// Readable entries, sorted by name.
    pub records: Vec<FileRecord>,
    /// Entries that were dropped, in listing order.
    pub skipped: Vec<SkippedEntry>,
}

/// Scans `dir_path` and returns one record per readable direct child.
///
/// Unreadable entries are logged and left out. See [`scan_dir_report`] to
/// inspect them.
///
/// # Errors
///
/// Returns [`ScanError::ReadDir`] when the directory cannot be opened.
///
/// # Examples
///
/// ```no_run
/// use filesort::file_category::CategoryTable;
/// use filesort::scanner::scan_dir;
/// use std::path::Path;
///
/// let records = scan_dir(Path::new("/path/to/downloads"), &CategoryTable::default())?;
/// for record in &records {
///     println!("{} -> {}", record.name(), record.category());
/// }
/// # Ok::<(), filesort::scanner::ScanError>(())
/// ```
pub fn scan_dir(dir_path: &Path, table: &CategoryTable) -> Result<Vec<FileRecord>, ScanError> {
    scan_dir_report(dir_path, table).map(|scan| scan.records)
}

/// Scans `dir_path`, returning both the records and the skipped entries.
pub fn scan_dir_report(dir_path: &Path, table: &CategoryTable) -> Result<DirScan, ScanError> {
    let entries = fs::read_dir(dir_path).map_err(|source| ScanError::ReadDir {
        path: dir_path.to_path_buf(),
        source,
    })?;

    let raw = entries.map(|entry| match entry {
        Ok(entry) => {
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = entry.metadata();
            (name, entry.path(), metadata)
        }
        Err(e) => (UNREADABLE_ENTRY.to_string(), dir_path.to_path_buf(), Err(e)),
    });

    let scan = collect_entries(raw, table);
    tracing::debug!(
        dir = %dir_path.display(),
        records = scan.records.len(),
        skipped = scan.skipped.len(),
        "scan finished"
    );
    Ok(scan)
}

/// Builds records from listed entries, skipping those whose metadata failed.
fn collect_entries<I>(entries: I, table: &CategoryTable) -> DirScan
where
    I: IntoIterator<Item = (String, PathBuf, io::Result<Metadata>)>,
{
    let mut scan = DirScan::default();

    for (name, path, metadata) in entries {
        match metadata.and_then(|meta| record_from_metadata(&name, &path, &meta, table)) {
            Ok(record) => scan.records.push(record),
            Err(error) => {
                tracing::warn!(entry = %name, error = %error, "skipping entry");
                scan.skipped.push(SkippedEntry { name, error });
            }
        }
    }

    scan.records.sort_by(|a, b| a.name().cmp(b.name()));
    scan
}

fn record_from_metadata(
    name: &str,
    path: &Path,
    metadata: &Metadata,
    table: &CategoryTable,
) -> io::Result<FileRecord> {
    let modified: DateTime<Local> = metadata.modified()?.into();
    Ok(FileRecord::new(
        name,
        path,
        metadata.len(),
        modified,
        metadata.is_dir(),
        table,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;
    use tempfile::TempDir;

    #[test]
    fn test_scan_builds_sorted_classified_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("b.jpg"), vec![0u8; 20]).expect("Failed to write file");
        fs::write(base.join("a.pdf"), vec![0u8; 10]).expect("Failed to write file");
        fs::create_dir(base.join("c")).expect("Failed to create dir");

        let records = scan_dir(base, &CategoryTable::default()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["a.pdf", "b.jpg", "c"]);

        assert_eq!(records[0].size(), 10);
        assert_eq!(records[0].path(), base.join("a.pdf"));
        assert_eq!(records[0].category(), &Category::Named("Docs".into()));
        assert_eq!(records[1].size(), 20);
        assert_eq!(records[1].category(), &Category::Named("Images".into()));
        assert!(records[2].is_dir());
        assert_eq!(records[2].category(), &Category::Folder);
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("nested")).expect("Failed to create dir");
        fs::write(base.join("nested").join("deep.pdf"), "x").expect("Failed to write file");

        let records = scan_dir(base, &CategoryTable::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "nested");
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let scan = scan_dir_report(temp_dir.path(), &CategoryTable::default()).unwrap();
        assert!(scan.records.is_empty());
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_fatal() {
        let result = scan_dir(
            Path::new("/non/existent/path"),
            &CategoryTable::default(),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("/non/existent/path"));
    }

    #[test]
    fn test_scan_of_a_file_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").expect("Failed to write file");

        assert!(scan_dir(&file, &CategoryTable::default()).is_err());
    }

    #[test]
    fn test_unreadable_metadata_is_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("one.txt"), "1").expect("Failed to write file");
        fs::write(base.join("two.mp3"), "22").expect("Failed to write file");
        let meta_one = fs::metadata(base.join("one.txt")).unwrap();
        let meta_two = fs::metadata(base.join("two.mp3")).unwrap();

        let entries = vec![
            ("two.mp3".to_string(), base.join("two.mp3"), Ok(meta_two)),
            (
                "gone.pdf".to_string(),
                base.join("gone.pdf"),
                Err(io::Error::from(io::ErrorKind::NotFound)),
            ),
            ("one.txt".to_string(), base.join("one.txt"), Ok(meta_one)),
            (
                "locked.png".to_string(),
                base.join("locked.png"),
                Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            ),
        ];

        let scan = collect_entries(entries, &CategoryTable::default());
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.skipped.len(), 2);
        assert_eq!(scan.records[0].name(), "one.txt");
        assert_eq!(scan.records[1].name(), "two.mp3");

        let skipped: Vec<_> = scan.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, ["gone.pdf", "locked.png"]);
        assert!(scan.skipped[0].to_string().starts_with("Skipping gone.pdf"));
    }
}
