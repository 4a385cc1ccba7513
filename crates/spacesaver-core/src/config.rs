/// Scan configuration.
///
/// The core has no config file or environment variables; frontends build a
/// `ScanOptions` (or deserialise one from their own settings) and pass it in.
use serde::{Deserialize, Serialize};

/// Default number of visited entries between `ProgressEvent::Update` messages.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Report regular files that sit directly inside the root.
    ///
    /// Off by default: the analyser has always ranked only the root's
    /// subdirectories, and loose top-level files are left out of the report.
    pub include_root_files: bool,

    /// Drop zero-byte entries from the report.
    pub skip_empty: bool,

    /// Walker threads used inside each child subtree.
    /// `1` walks serially, `0` uses one thread per logical CPU.
    pub threads: usize,

    /// Visited entries between running-total progress updates.
    /// `0` is treated as `1`.
    pub progress_interval: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_root_files: false,
            skip_empty: false,
            threads: 1,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ScanOptions {
    /// Number of walker threads after resolving `0` to the CPU count.
    pub fn effective_threads(&self) -> usize {
        match self.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }

    pub(crate) fn effective_progress_interval(&self) -> u64 {
        self.progress_interval.max(1)
    }
}
