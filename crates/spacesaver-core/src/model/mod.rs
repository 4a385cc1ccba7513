/// Data model for SpaceSaver scan results.
///
/// Re-exports the per-child entry type, the finished report, and
/// size formatting helpers.
pub mod entry;
pub mod report;
pub mod size;

pub use entry::{Entry, EntryKind, UnreadableEntry};
pub use report::ScanReport;
