//! Command-line interface definitions.
//!
//! Uses `clap` derive macros; every flag maps onto a field of
//! [`ScanOptions`] or onto how the report is printed.

use clap::Parser;
use spacesaver_core::analysis::DEFAULT_MIN_SLICE_PERCENT;
use spacesaver_core::ScanOptions;
use std::path::PathBuf;

/// Rank the folders inside a directory by the space they use.
#[derive(Parser, Debug)]
#[command(name = "spacesaver", version, about, long_about = None)]
pub struct Args {
    /// Directory to analyse
    #[arg(value_name = "DIRECTORY")]
    pub path: PathBuf,

    /// Walker threads per folder (1 = serial, 0 = one per CPU)
    #[arg(short = 't', long, default_value_t = 1)]
    pub threads: usize,

    /// Also rank loose files sitting directly inside DIRECTORY
    #[arg(long)]
    pub include_files: bool,

    /// Leave zero-byte entries out of the report
    #[arg(long)]
    pub skip_empty: bool,

    /// Hide the percentage of entries at or below this share of the total
    #[arg(long, value_name = "PERCENT", default_value_t = DEFAULT_MIN_SLICE_PERCENT)]
    pub min_percent: f32,

    /// Log per-folder sizes and skipped entries to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_root_files: self.include_files,
            skip_empty: self.skip_empty,
            threads: self.threads,
            ..Default::default()
        }
    }
}
