/// Scanner module: measures the immediate children of a root directory.
///
/// Two entry points:
/// - [`scan`] runs synchronously on the caller's thread, reporting progress
///   to any [`ProgressSink`].
/// - [`start_scan`] runs the same scan on a background thread and delivers
///   progress plus exactly one terminal [`ScanMessage`] over a bounded
///   crossbeam channel, so an interactive frontend never blocks on the walk.
pub mod progress;
pub mod walk;

use crate::config::ScanOptions;
use crate::error::{ScanError, ScanResult};
use crate::model::{Entry, EntryKind, ScanReport, UnreadableEntry};
use compact_str::CompactString;
use crossbeam_channel::Receiver;
use progress::{ChannelSink, ProgressEvent, ProgressSink, ScanMessage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};
use walk::Walker;

/// Cooperative cancellation flag shared between a scan and its controller.
///
/// Checked before each immediate child and on every visited entry.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// An immediate child of the root as listed, before measurement.
struct RootChild {
    name: CompactString,
    path: PathBuf,
    kind: EntryKind,
}

/// Scan `root` and rank its immediate children by cumulative size.
///
/// Fails with [`ScanError::InvalidRoot`] before emitting any event if the
/// root is missing, not a directory, or cannot be listed. Errors below the
/// root never fail the scan; they are recorded in the report instead.
/// Returns [`ScanError::Cancelled`], and no partial report, once `cancel`
/// has been triggered.
pub fn scan<S>(
    root: &Path,
    options: &ScanOptions,
    sink: &mut S,
    cancel: &CancelToken,
) -> ScanResult<ScanReport>
where
    S: ProgressSink + ?Sized,
{
    let start = Instant::now();
    let (listed, listing_errors) = list_root(root)?;

    // Loose files directly under the root are left out unless asked for.
    let children: Vec<RootChild> = listed
        .into_iter()
        .filter(|child| match child.kind {
            EntryKind::Directory => true,
            EntryKind::File if options.include_root_files => true,
            kind => {
                debug!("not reporting top-level {kind:?} {}", child.path.display());
                false
            }
        })
        .collect();

    let parallelism = build_parallelism(options)?;
    info!(
        "Scanning {} ({} children, {} walker thread(s))",
        root.display(),
        children.len(),
        options.effective_threads()
    );

    let children_total = children.len();
    let mut walker = Walker::new(
        sink,
        cancel,
        parallelism,
        options.effective_progress_interval(),
    );
    walker.report(ProgressEvent::Started {
        root: root.to_path_buf(),
        children_total,
    });
    for err in listing_errors {
        walker.record_unreadable(err.path, err.message);
    }

    let entries =
        measure_children(&mut walker, children, options, cancel).inspect_err(|err| {
            if err.is_cancelled() {
                info!("Scan of {} cancelled", root.display());
            }
        })?;

    let summary = walker.finish();
    let duration = start.elapsed();
    info!(
        "Scan of {} complete: {} files, {} dirs, {} unreadable in {duration:?}",
        root.display(),
        summary.totals.files,
        summary.totals.dirs,
        summary.unreadable_count
    );

    Ok(ScanReport::new(
        root.to_path_buf(),
        entries,
        summary.totals,
        summary.unreadable,
        summary.unreadable_count,
        duration,
    ))
}

/// Measure each listed child in order, emitting `Entering`/`ChildFinished`
/// around it.
fn measure_children<S>(
    walker: &mut Walker<'_, S>,
    children: Vec<RootChild>,
    options: &ScanOptions,
    cancel: &CancelToken,
) -> ScanResult<Vec<Entry>>
where
    S: ProgressSink + ?Sized,
{
    let children_total = children.len();
    let mut entries = Vec::with_capacity(children_total);

    for (index, child) in children.into_iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        walker.report(ProgressEvent::Entering {
            name: child.name.clone(),
            index,
            children_total,
        });

        let size = match child.kind {
            EntryKind::Directory => Some(walker.measure_dir(&child.path)?),
            EntryKind::File => walker.file_len(&child.path),
            EntryKind::Symlink | EntryKind::Other => None,
        };
        debug!("{}: {size:?} bytes", child.name);

        walker.report(ProgressEvent::ChildFinished {
            name: child.name.clone(),
            size: size.unwrap_or(0),
            children_done: index + 1,
            children_total,
        });

        let entry = match (child.kind, size) {
            (EntryKind::Directory, Some(size)) => Entry::directory(child.name, size),
            (EntryKind::File, Some(size)) => Entry::file(child.name, size),
            _ => continue,
        };
        if options.skip_empty && entry.size == 0 {
            continue;
        }
        entries.push(entry);
    }

    // A cancel that lands after the last child still discards the report.
    if cancel.is_cancelled() {
        return Err(ScanError::Cancelled);
    }
    Ok(entries)
}

/// List the root's immediate children in filesystem enumeration order.
///
/// Per-entry listing failures are returned separately so they can be
/// reported once the scan has officially started.
fn list_root(root: &Path) -> ScanResult<(Vec<RootChild>, Vec<UnreadableEntry>)> {
    let meta = fs::metadata(root).map_err(|e| ScanError::invalid_root(root, e))?;
    if !meta.is_dir() {
        return Err(ScanError::invalid_root(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    let read_dir = fs::read_dir(root).map_err(|e| ScanError::invalid_root(root, e))?;

    let mut children = Vec::new();
    let mut errors = Vec::new();
    for item in read_dir {
        let dir_entry = match item {
            Ok(d) => d,
            Err(err) => {
                errors.push(UnreadableEntry {
                    path: root.to_path_buf(),
                    message: err.to_string(),
                });
                continue;
            }
        };
        let path = dir_entry.path();
        match dir_entry.file_type() {
            Ok(ft) => children.push(RootChild {
                name: CompactString::new(dir_entry.file_name().to_string_lossy()),
                path,
                kind: EntryKind::from_file_type(ft),
            }),
            Err(err) => errors.push(UnreadableEntry {
                path,
                message: err.to_string(),
            }),
        }
    }
    Ok((children, errors))
}

/// Pick the jwalk parallelism for `options`, building one rayon pool that
/// is shared by every child subtree of this scan.
fn build_parallelism(options: &ScanOptions) -> ScanResult<jwalk::Parallelism> {
    let threads = options.effective_threads();
    if threads <= 1 {
        return Ok(jwalk::Parallelism::Serial);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("spacesaver-walk-{i}"))
        .build()?;
    Ok(jwalk::Parallelism::RayonExistingPool {
        pool: Arc::new(pool),
        busy_timeout: None,
    })
}

/// Maximum number of messages that may queue up in the channel.
///
/// A frontend that drains once per frame (~60 fps) leaves the scanner
/// plenty of headroom. If it falls behind the scanner stalls briefly rather
/// than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan. Allows cancellation
/// and receiving progress updates.
pub struct ScanHandle {
    /// Receiver for progress and the terminal message from the scan thread.
    pub progress_rx: Receiver<ScanMessage>,
    cancel: CancelToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Block until the scan ends, discarding progress, and return its outcome.
    pub fn wait(mut self) -> ScanResult<ScanReport> {
        let outcome = loop {
            match self.progress_rx.recv() {
                Ok(ScanMessage::Progress(_)) => continue,
                Ok(ScanMessage::Complete(report)) => break Ok(report),
                Ok(ScanMessage::Failed(err)) => break Err(err),
                Ok(ScanMessage::Cancelled) => break Err(ScanError::Cancelled),
                Err(_) => break Err(ScanError::WorkerLost),
            }
        };
        self.join();
        outcome
    }

    /// Join the scan thread. Only blocks if the terminal message has not
    /// been sent yet.
    pub fn join(&mut self) {
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

/// Start a new scan on a background thread.
///
/// Returns a `ScanHandle` for receiving progress and requesting
/// cancellation. Dropping the handle's receiver also cancels the scan.
pub fn start_scan(root: PathBuf, options: ScanOptions) -> ScanResult<ScanHandle> {
    let (tx, progress_rx) = crossbeam_channel::bounded::<ScanMessage>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelToken::new();
    let cancel_clone = cancel.clone();

    let thread = thread::Builder::new()
        .name("spacesaver-scanner".into())
        .spawn(move || {
            let mut sink = ChannelSink {
                tx: tx.clone(),
                cancel: cancel_clone.clone(),
            };
            let terminal = match scan(&root, &options, &mut sink, &cancel_clone) {
                Ok(report) => ScanMessage::Complete(report),
                Err(ScanError::Cancelled) => ScanMessage::Cancelled,
                Err(err) => {
                    info!("Scan of {} failed: {err}", root.display());
                    ScanMessage::Failed(err)
                }
            };
            let _ = tx.send(terminal);
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel,
        thread: Some(thread),
    })
}
