/// Analysis modules: post-scan shaping of a report for display.

pub mod breakdown;

pub use breakdown::{breakdown, Breakdown, Slice, DEFAULT_MIN_SLICE_PERCENT};
