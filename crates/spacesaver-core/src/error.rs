/// Error types for the scanner.
///
/// Only conditions that end a scan live here. Failures on individual
/// descendants are recovered inside the walk and recorded as
/// [`UnreadableEntry`](crate::model::UnreadableEntry) values instead.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The root does not exist, is not a directory, or cannot be listed.
    #[error("cannot access selected directory {}: {source}", path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cancellation was requested before the scan finished.
    #[error("scan cancelled")]
    Cancelled,

    /// The background scanner thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),

    /// The scanner thread ended without sending a terminal message.
    #[error("scanner thread exited without a result")]
    WorkerLost,

    /// The walker's rayon pool could not be built.
    #[error("failed to build scanner thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    pub(crate) fn invalid_root(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScanError::InvalidRoot {
            path: path.into(),
            source,
        }
    }

    /// `true` for the cooperative-cancellation outcome, which callers
    /// usually treat as silent abandonment rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScanError::Cancelled)
    }
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
