/// Subtree measurement: the depth-first accumulator behind `scan`.
///
/// Each immediate child directory of the root is walked with `jwalk`
/// (symlinks not followed, hidden files included). Results are consumed in
/// jwalk's depth-first order on the calling thread, so even when a rayon
/// pool reads directories ahead in parallel, totals and progress events are
/// produced serially and deterministically.
///
/// Every descendant failure is folded into the accumulator as a zero-byte
/// contribution: it is recorded, reported to the sink, and the walk moves on
/// to the next entry.
use crate::error::{ScanError, ScanResult};
use crate::model::report::WalkTotals;
use crate::model::{EntryKind, UnreadableEntry};
use crate::scanner::progress::{ProgressEvent, ProgressSink};
use crate::scanner::CancelToken;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum number of unreadable paths kept in the report.
///
/// A scan of a system directory as an unprivileged user can hit hundreds of
/// thousands of access-denied entries; past this cap only the count grows.
pub const MAX_RECORDED_UNREADABLE: usize = 1_000;

pub(crate) struct Walker<'a, S: ProgressSink + ?Sized> {
    sink: &'a mut S,
    cancel: &'a CancelToken,
    parallelism: jwalk::Parallelism,
    progress_interval: u64,
    visited: u64,
    totals: WalkTotals,
    unreadable: Vec<UnreadableEntry>,
    unreadable_count: u64,
}

/// Everything the walker accumulated, handed back once the scan is done.
pub(crate) struct WalkSummary {
    pub totals: WalkTotals,
    pub unreadable: Vec<UnreadableEntry>,
    pub unreadable_count: u64,
}

impl<'a, S: ProgressSink + ?Sized> Walker<'a, S> {
    pub fn new(
        sink: &'a mut S,
        cancel: &'a CancelToken,
        parallelism: jwalk::Parallelism,
        progress_interval: u64,
    ) -> Self {
        Self {
            sink,
            cancel,
            parallelism,
            progress_interval,
            visited: 0,
            totals: WalkTotals::default(),
            unreadable: Vec::new(),
            unreadable_count: 0,
        }
    }

    pub fn report(&mut self, event: ProgressEvent) {
        self.sink.report(event);
    }

    /// Sum the byte lengths of every regular file below `dir`.
    ///
    /// `dir` itself is counted as a visited directory. Returns
    /// `ScanError::Cancelled` as soon as cancellation is observed.
    pub fn measure_dir(&mut self, dir: &Path) -> ScanResult<u64> {
        self.totals.dirs += 1;
        let mut size: u64 = 0;

        let walker = jwalk::WalkDir::new(dir)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(self.parallelism.clone());

        for entry_result in walker {
            if self.cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            let mut entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    // jwalk errors are typically access-denied on directories.
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| dir.to_path_buf());
                    self.record_unreadable(path, err.to_string());
                    continue;
                }
            };

            // A directory whose listing failed still arrives as `Ok`; the
            // failure rides along on the entry. Covers `dir` itself too.
            if let Some(err) = entry.read_children_error.take() {
                self.record_unreadable(entry.path(), err.to_string());
            }

            // Depth 0 is `dir` itself, already counted.
            if entry.depth == 0 {
                continue;
            }

            let path = entry.path();
            match EntryKind::from_file_type(entry.file_type()) {
                EntryKind::Directory => self.totals.dirs += 1,
                EntryKind::File => {
                    if let Some(len) = self.file_len(&path) {
                        size += len;
                    }
                }
                // Never followed, never counted.
                EntryKind::Symlink | EntryKind::Other => {}
            }
            self.tick(&path);
        }

        Ok(size)
    }

    /// Byte length of a single regular file, or `None` (recorded as
    /// unreadable) if it cannot be stat'ed.
    pub fn file_len(&mut self, path: &Path) -> Option<u64> {
        match fs::symlink_metadata(path) {
            Ok(meta) => {
                let len = meta.len();
                self.totals.files += 1;
                self.totals.bytes += len;
                Some(len)
            }
            Err(err) => {
                self.record_unreadable(path.to_path_buf(), err.to_string());
                None
            }
        }
    }

    pub fn record_unreadable(&mut self, path: PathBuf, message: String) {
        debug!("skipping unreadable {}: {message}", path.display());
        self.unreadable_count += 1;
        if self.unreadable.len() < MAX_RECORDED_UNREADABLE {
            self.unreadable.push(UnreadableEntry {
                path: path.clone(),
                message: message.clone(),
            });
        }
        self.sink.report(ProgressEvent::Unreadable { path, message });
    }

    /// Count one visited entry and emit a running-total update on every
    /// `progress_interval`-th visit.
    fn tick(&mut self, current: &Path) {
        self.visited += 1;
        if self.visited.is_multiple_of(self.progress_interval) {
            self.sink.report(ProgressEvent::Update {
                current_path: current.to_path_buf(),
                files_found: self.totals.files,
                dirs_found: self.totals.dirs,
                bytes_scanned: self.totals.bytes,
            });
        }
    }

    pub fn finish(self) -> WalkSummary {
        WalkSummary {
            totals: self.totals,
            unreadable: self.unreadable,
            unreadable_count: self.unreadable_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::progress::NoProgress;

    fn write_bytes(path: &Path, n: usize) {
        fs::write(path, vec![0u8; n]).unwrap();
    }

    #[test]
    fn measures_nested_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let deep = tmp.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        write_bytes(&tmp.path().join("a").join("one.bin"), 10);
        write_bytes(&deep.join("two.bin"), 32);

        let cancel = CancelToken::new();
        let mut sink = NoProgress;
        let mut walker = Walker::new(&mut sink, &cancel, jwalk::Parallelism::Serial, 1_000);
        let size = walker.measure_dir(tmp.path()).unwrap();
        assert_eq!(size, 42);

        let summary = walker.finish();
        assert_eq!(summary.totals.files, 2);
        // tmp, a, b, c
        assert_eq!(summary.totals.dirs, 4);
        assert_eq!(summary.totals.bytes, 42);
        assert_eq!(summary.unreadable_count, 0);
    }

    #[test]
    fn updates_carry_non_decreasing_totals() {
        let tmp = tempfile::TempDir::new().unwrap();
        for i in 0..20 {
            write_bytes(&tmp.path().join(format!("f{i:02}.bin")), 100);
        }

        let cancel = CancelToken::new();
        let mut totals = Vec::new();
        let mut sink = |e: ProgressEvent| {
            if let ProgressEvent::Update { bytes_scanned, .. } = e {
                totals.push(bytes_scanned);
            }
        };
        let mut walker = Walker::new(&mut sink, &cancel, jwalk::Parallelism::Serial, 3);
        assert_eq!(walker.measure_dir(tmp.path()).unwrap(), 2_000);
        drop(walker);

        assert_eq!(totals.len(), 20 / 3);
        assert!(totals.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_bytes(&tmp.path().join("f.bin"), 1);

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut sink = NoProgress;
        let mut walker = Walker::new(&mut sink, &cancel, jwalk::Parallelism::Serial, 1);
        assert!(matches!(
            walker.measure_dir(tmp.path()),
            Err(ScanError::Cancelled)
        ));
    }

    #[test]
    fn unreadable_list_is_capped() {
        let cancel = CancelToken::new();
        let mut sink = NoProgress;
        let mut walker = Walker::new(&mut sink, &cancel, jwalk::Parallelism::Serial, 1);
        for i in 0..MAX_RECORDED_UNREADABLE + 5 {
            walker.record_unreadable(PathBuf::from(format!("/x/{i}")), "denied".into());
        }
        let summary = walker.finish();
        assert_eq!(summary.unreadable.len(), MAX_RECORDED_UNREADABLE);
        assert_eq!(summary.unreadable_count, (MAX_RECORDED_UNREADABLE + 5) as u64);
    }

    #[test]
    fn missing_directory_contributes_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let gone = tmp.path().join("gone");
        let cancel = CancelToken::new();
        let mut events = Vec::new();
        let mut sink = |e: ProgressEvent| events.push(e);
        let mut walker = Walker::new(&mut sink, &cancel, jwalk::Parallelism::Serial, 1);
        let size = walker.measure_dir(&gone).unwrap();
        assert_eq!(size, 0);

        let summary = walker.finish();
        assert_eq!(summary.unreadable_count, 1);
        assert!(summary.unreadable[0].path.starts_with(&gone));
        assert!(matches!(
            events.as_slice(),
            [ProgressEvent::Unreadable { .. }]
        ));
    }

    /// A directory that cannot be listed is recorded and reported even
    /// though jwalk still yields it as a successful entry.
    #[cfg(unix)]
    #[test]
    fn unlistable_directory_is_recorded() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        write_bytes(&locked.join("hidden.bin"), 64);
        write_bytes(&tmp.path().join("visible.bin"), 8);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!(
                "skipping unlistable_directory_is_recorded: \
                 permission bits are not enforced for this user"
            );
            return;
        }

        for parallelism in [
            jwalk::Parallelism::Serial,
            jwalk::Parallelism::RayonNewPool(2),
        ] {
            let cancel = CancelToken::new();
            let mut unreadable_events = 0;
            let mut sink = |e: ProgressEvent| {
                if matches!(e, ProgressEvent::Unreadable { .. }) {
                    unreadable_events += 1;
                }
            };
            let mut walker = Walker::new(&mut sink, &cancel, parallelism, 1);
            // Both as a nested directory and as the walk root.
            assert_eq!(walker.measure_dir(tmp.path()).unwrap(), 8);
            assert_eq!(walker.measure_dir(&locked).unwrap(), 0);
            let summary = walker.finish();

            assert_eq!(summary.unreadable_count, 2);
            assert!(summary.unreadable.iter().all(|u| u.path == locked));
            assert_eq!(unreadable_events, 2);
        }

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
