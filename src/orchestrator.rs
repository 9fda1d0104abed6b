//! Concurrent processing of a scanned directory.
//!
//! Every record gets its own task. Tasks share nothing but the sending half of
//! one report channel; the calling thread drains the receiving half while the
//! tasks run, so outcomes and failures are observed as they happen. The
//! channel closes when the last task drops its sender, and the surrounding
//! thread scope joins every task before the summary is returned.

use crate::file_organizer::{Outcome, ProcessError, process_file};
use crate::record::FileRecord;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, Scope};
use thiserror::Error;

/// How tasks are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// One thread per record, all started at once.
    #[default]
    Unbounded,
    /// A pool of at most this many worker threads.
    Bounded(NonZeroUsize),
}

/// A record that was processed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub name: String,
    pub outcome: Outcome,
}

/// A record whose processing failed.
#[derive(Debug, Error)]
#[error("file {name:?}: {error}")]
pub struct FileFailure {
    pub name: String,
    pub path: PathBuf,
    #[source]
    pub error: ProcessError,
}

/// What one task sends back.
pub type TaskReport = Result<Processed, FileFailure>;

/// Totals for a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of reports received, one per record.
    pub total: usize,
    pub moved: usize,
    pub previewed: usize,
    pub directories: usize,
    /// Files moved (or that would be moved) per category label.
    pub by_category: BTreeMap<String, usize>,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    fn record(&mut self, report: TaskReport) {
        self.total += 1;
        match report {
            Ok(Processed { outcome, .. }) => {
                match &outcome {
                    Outcome::SkippedDirectory => self.directories += 1,
                    Outcome::WouldMove { .. } => self.previewed += 1,
                    Outcome::Moved { .. } => self.moved += 1,
                }
                if let Some(category) = outcome.category() {
                    *self.by_category.entry(category.to_string()).or_insert(0) += 1;
                }
            }
            Err(failure) => self.failures.push(failure),
        }
    }

    /// True when no task failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fans records out to concurrent tasks and collects their reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator {
    concurrency: Concurrency,
}

impl Orchestrator {
    pub fn new(concurrency: Concurrency) -> Self {
        Self { concurrency }
    }

    /// Processes every record and returns once all of them are done.
    ///
    /// `on_report` runs on the calling thread for each report as it arrives,
    /// in completion order. Failed records never stop the others; they are
    /// collected into [`RunSummary::failures`].
    pub fn run<F>(&self, records: Vec<FileRecord>, dry_run: bool, mut on_report: F) -> RunSummary
    where
        F: FnMut(&TaskReport),
    {
        tracing::info!(
            tasks = records.len(),
            dry_run,
            concurrency = ?self.concurrency,
            "starting tasks"
        );

        let (tx, rx) = mpsc::channel();
        let mut summary = RunSummary::default();

        thread::scope(|scope| {
            match self.concurrency {
                Concurrency::Unbounded => spawn_unbounded(scope, records, dry_run, tx),
                Concurrency::Bounded(workers) => {
                    spawn_bounded(scope, records, dry_run, tx, workers)
                }
            }

            // Ends once every task has dropped its sender.
            for report in rx {
                on_report(&report);
                summary.record(report);
            }
        });

        summary
    }
}

fn spawn_unbounded<'scope>(
    scope: &'scope Scope<'scope, '_>,
    records: Vec<FileRecord>,
    dry_run: bool,
    tx: Sender<TaskReport>,
) {
    for record in records {
        let name = record.name().to_string();
        let path = record.path().to_path_buf();
        let task_tx = tx.clone();

        let spawned = thread::Builder::new()
            .name("filesort-task".to_string())
            .spawn_scoped(scope, move || send(&task_tx, run_task(record, dry_run)));

        if let Err(source) = spawned {
            tracing::warn!(file = %name, error = %source, "could not start task");
            send(
                &tx,
                Err(FileFailure {
                    name,
                    path,
                    error: ProcessError::Spawn { source },
                }),
            );
        }
    }
}

fn spawn_bounded<'scope>(
    scope: &'scope Scope<'scope, '_>,
    records: Vec<FileRecord>,
    dry_run: bool,
    tx: Sender<TaskReport>,
    workers: NonZeroUsize,
) {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .thread_name(|idx| format!("filesort-worker-{idx}"))
        .build();

    match pool {
        Ok(pool) => {
            scope.spawn(move || {
                pool.install(|| {
                    records.into_par_iter().for_each_with(tx, |tx, record| {
                        send(tx, run_task(record, dry_run));
                    });
                });
            });
        }
        Err(e) => {
            tracing::warn!(error = %e, "worker pool unavailable, falling back to one thread per file");
            spawn_unbounded(scope, records, dry_run, tx);
        }
    }
}

fn run_task(record: FileRecord, dry_run: bool) -> TaskReport {
    match process_file(&record, dry_run) {
        Ok(outcome) => Ok(Processed {
            name: record.name().to_string(),
            outcome,
        }),
        Err(error) => Err(FileFailure {
            name: record.name().to_string(),
            path: record.path().to_path_buf(),
            error,
        }),
    }
}

fn send(tx: &Sender<TaskReport>, report: TaskReport) {
    // The receiver lives until every sender is gone, so this cannot fail.
    let _ = tx.send(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::CategoryTable;
    use crate::record::ValidationError;
    use crate::scanner::scan_dir;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn populate(base: &Path, count: usize) {
        for i in 0..count {
            let name = match i % 4 {
                0 => format!("photo_{i}.png"),
                1 => format!("doc_{i}.txt"),
                2 => format!("song_{i}.mp3"),
                _ => format!("blob_{i}.bin"),
            };
            fs::write(base.join(name), "content").expect("Failed to write test file");
        }
    }

    fn scan(base: &Path) -> Vec<FileRecord> {
        scan_dir(base, &CategoryTable::default()).expect("scan failed")
    }

    fn bounded(workers: usize) -> Concurrency {
        Concurrency::Bounded(NonZeroUsize::new(workers).unwrap())
    }

    #[test]
    fn test_unbounded_apply_moves_everything() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        populate(temp_dir.path(), 40);

        let summary = Orchestrator::default().run(scan(temp_dir.path()), false, |_| {});

        assert!(summary.is_clean(), "{:?}", summary.failures);
        assert_eq!(summary.total, 40);
        assert_eq!(summary.moved, 40);
        assert_eq!(summary.by_category["Images"], 10);
        assert_eq!(summary.by_category["Docs"], 10);
        assert_eq!(summary.by_category["Audio"], 10);
        assert_eq!(summary.by_category["Other"], 10);
        for dir in ["Images", "Docs", "Audio", "Other"] {
            assert_eq!(fs::read_dir(temp_dir.path().join(dir)).unwrap().count(), 10);
        }
    }

    #[test]
    fn test_bounded_matches_unbounded() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        populate(temp_dir.path(), 25);

        let summary = Orchestrator::new(bounded(3)).run(scan(temp_dir.path()), false, |_| {});

        assert!(summary.is_clean());
        assert_eq!(summary.moved, 25);
        let remaining: HashSet<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let expected: HashSet<_> = ["Images", "Docs", "Audio", "Other"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn test_every_record_is_reported_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        populate(temp_dir.path(), 12);
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        let records = scan(temp_dir.path());
        let expected: HashSet<_> = records.iter().map(|r| r.name().to_string()).collect();

        let mut seen = Vec::new();
        let summary = Orchestrator::default().run(records, true, |report| {
            let name = match report {
                Ok(processed) => processed.name.clone(),
                Err(failure) => failure.name.clone(),
            };
            seen.push(name);
        });

        assert_eq!(seen.len(), 13);
        assert_eq!(seen.into_iter().collect::<HashSet<_>>(), expected);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.previewed, 12);
    }

    #[test]
    fn test_failures_are_isolated() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("good.pdf"), "pdf").unwrap();
        fs::write(temp_dir.path().join("empty.pdf"), "").unwrap();
        fs::write(temp_dir.path().join("also_empty.png"), "").unwrap();
        fs::write(temp_dir.path().join("fine.png"), "png").unwrap();

        let summary = Orchestrator::default().run(scan(temp_dir.path()), false, |_| {});

        assert_eq!(summary.total, 4);
        assert_eq!(summary.moved, 2);
        assert_eq!(summary.failures.len(), 2);
        let failed: HashSet<_> = summary.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, HashSet::from(["empty.pdf", "also_empty.png"]));
        for failure in &summary.failures {
            assert!(matches!(
                failure.error,
                ProcessError::Validation(ValidationError::NonPositiveSize)
            ));
        }
        assert!(temp_dir.path().join("Docs").join("good.pdf").is_file());
        assert!(temp_dir.path().join("Images").join("fine.png").is_file());
        assert!(temp_dir.path().join("empty.pdf").is_file());
    }

    #[test]
    fn test_failure_message_names_the_file() {
        let failure = FileFailure {
            name: "a.pdf".to_string(),
            path: PathBuf::from("/x/a.pdf"),
            error: ProcessError::Validation(ValidationError::EmptyName),
        };
        assert_eq!(failure.to_string(), "file \"a.pdf\": filename cannot be empty");
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        populate(temp_dir.path(), 8);

        let summary = Orchestrator::new(bounded(2)).run(scan(temp_dir.path()), true, |_| {});

        assert_eq!(summary.previewed, 8);
        assert_eq!(summary.moved, 0);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 8);
    }

    #[test]
    fn test_no_records() {
        let summary = Orchestrator::default().run(Vec::new(), false, |_| {
            panic!("no report expected")
        });
        assert_eq!(summary.total, 0);
        assert!(summary.is_clean());
    }
}
