/// SpaceSaver Core: directory size scanning and breakdown.
///
/// This crate contains all business logic with zero UI dependencies.
/// Frontends (the bundled terminal reporter, or any GUI) call the scanner
/// and render its output.
///
/// # Modules
///
/// - [`model`]: report entries, the finished report, size formatting.
/// - [`scanner`]: filesystem walking with progress reporting and cancellation.
/// - [`analysis`]: post-scan shaping of a report for charts.
/// - [`config`]: scan options.
/// - [`error`]: terminal scan errors.
pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod scanner;

pub use config::ScanOptions;
pub use error::{ScanError, ScanResult};
pub use model::{Entry, EntryKind, ScanReport};
pub use scanner::{scan, start_scan, CancelToken, ScanHandle};
