/// Scan progress reporting: lightweight events emitted while the walk runs,
/// plus the message envelope used to carry them across the worker channel.
use crate::error::ScanError;
use crate::model::ScanReport;
use crate::scanner::CancelToken;
use compact_str::CompactString;
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// A transient notification of traversal progress.
///
/// Events arrive in the order subtrees are visited. `bytes_scanned` in
/// `Update` never decreases within one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The root was listed successfully and the walk is about to begin.
    Started {
        root: PathBuf,
        children_total: usize,
    },
    /// About to measure the immediate child at position `index`.
    Entering {
        name: CompactString,
        index: usize,
        children_total: usize,
    },
    /// Periodic update with running totals.
    Update {
        current_path: PathBuf,
        files_found: u64,
        dirs_found: u64,
        bytes_scanned: u64,
    },
    /// A descendant could not be read; it counts as zero bytes.
    Unreadable { path: PathBuf, message: String },
    /// An immediate child has been fully measured.
    ChildFinished {
        name: CompactString,
        size: u64,
        children_done: usize,
        children_total: usize,
    },
}

/// Receives progress events from a running scan.
///
/// Implemented for any `FnMut(ProgressEvent)` closure, for [`NoProgress`],
/// and (internally) for the worker channel used by `start_scan`.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Messages sent from the scan thread to the consumer.
///
/// The terminal variants (`Complete`, `Failed`, `Cancelled`) are always the
/// last message of a scan; the channel disconnects right after.
#[derive(Debug)]
pub enum ScanMessage {
    Progress(ProgressEvent),
    /// Scanning completed successfully.
    Complete(ScanReport),
    /// The root could not be scanned; no report was produced.
    Failed(ScanError),
    /// Scan was cancelled; partial results are discarded.
    Cancelled,
}

impl ScanMessage {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanMessage::Progress(_))
    }
}

/// Forwards events into the worker channel.
///
/// If the receiving side has gone away nobody is listening any more, so the
/// scan is cancelled instead of walking on for no one.
pub(crate) struct ChannelSink {
    pub tx: Sender<ScanMessage>,
    pub cancel: CancelToken,
}

impl ProgressSink for ChannelSink {
    fn report(&mut self, event: ProgressEvent) {
        if self.tx.send(ScanMessage::Progress(event)).is_err() {
            self.cancel.cancel();
        }
    }
}
