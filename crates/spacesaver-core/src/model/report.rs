/// The terminal output of one successful scan.
///
/// A `ScanReport` is assembled exactly once, when the walk finishes, and is
/// read-only afterwards: fields are private and only exposed through
/// accessors. The scanner keeps no reference to it once returned.
use super::entry::{Entry, UnreadableEntry};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Ranked sizes of the immediate children of a scan root.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    root: PathBuf,
    entries: Vec<Entry>,
    total_size: u64,
    files_scanned: u64,
    dirs_scanned: u64,
    unreadable: Vec<UnreadableEntry>,
    unreadable_count: u64,
    duration: Duration,
}

/// Counters accumulated by the walker and handed over to the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WalkTotals {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

impl ScanReport {
    /// Build the report, sorting `entries` by descending size.
    ///
    /// The sort is stable, so entries of equal size keep the order in which
    /// the filesystem enumerated them.
    pub(crate) fn new(
        root: PathBuf,
        mut entries: Vec<Entry>,
        totals: WalkTotals,
        unreadable: Vec<UnreadableEntry>,
        unreadable_count: u64,
        duration: Duration,
    ) -> Self {
        entries.sort_by(|a, b| b.size.cmp(&a.size));
        let total_size = entries.iter().map(|e| e.size).sum();
        Self {
            root,
            entries,
            total_size,
            files_scanned: totals.files,
            dirs_scanned: totals.dirs,
            unreadable,
            unreadable_count,
            duration,
        }
    }

    /// The directory that was scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries sorted by descending size.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Sum of all reported entry sizes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn files_scanned(&self) -> u64 {
        self.files_scanned
    }

    pub fn dirs_scanned(&self) -> u64 {
        self.dirs_scanned
    }

    /// Descendants that could not be read, up to the recording cap.
    pub fn unreadable(&self) -> &[UnreadableEntry] {
        &self.unreadable
    }

    /// Total number of unreadable descendants, including any beyond the cap.
    pub fn unreadable_count(&self) -> u64 {
        self.unreadable_count
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
