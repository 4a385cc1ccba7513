//! SpaceSaver: directory size analyser.
//!
//! Thin binary entry point. All scanning logic lives in the
//! `spacesaver-core` crate; this file only drives a background scan,
//! shows its progress, and prints the ranked result.

mod cli;
mod output;

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use spacesaver_core::analysis::breakdown;
use spacesaver_core::model::size::format_size;
use spacesaver_core::scanner::progress::{ProgressEvent, ScanMessage};
use spacesaver_core::start_scan;

/// INFO by default; `--verbose` adds per-folder and skipped-entry detail.
fn log_level(verbose: bool) -> tracing::Level {
    if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(log_level(args.verbose))
        .with_writer(std::io::stderr)
        .init();

    let handle = start_scan(args.path.clone(), args.scan_options())
        .context("failed to start scan")?;

    // Logs go to stderr; the bar lives on stdout so the two never share a line.
    let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut current = String::new();
    for message in handle.progress_rx.iter() {
        match message {
            ScanMessage::Progress(event) => match event {
                ProgressEvent::Started { children_total, .. } => {
                    pb.set_length(children_total as u64);
                }
                ProgressEvent::Entering { name, .. } => {
                    current = name.to_string();
                    pb.set_message(format!("Scanning: {current}"));
                }
                ProgressEvent::Update { bytes_scanned, .. } => {
                    pb.set_message(format!(
                        "Scanning: {current} ({} so far)",
                        format_size(bytes_scanned)
                    ));
                }
                ProgressEvent::Unreadable { .. } => {}
                ProgressEvent::ChildFinished { children_done, .. } => {
                    pb.set_position(children_done as u64);
                }
            },
            ScanMessage::Complete(report) => {
                pb.finish_and_clear();
                let chart = breakdown(&report, args.min_percent);
                let stdout = std::io::stdout();
                output::write_report(&mut stdout.lock(), &report, &chart)?;
                return Ok(());
            }
            ScanMessage::Failed(err) => {
                pb.abandon();
                return Err(err).context("cannot access selected directory");
            }
            ScanMessage::Cancelled => {
                pb.finish_and_clear();
                return Ok(());
            }
        }
    }

    bail!("scanner exited without a result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_start_and_end_are_logged_by_default() {
        assert_eq!(log_level(false), tracing::Level::INFO);
        assert_eq!(log_level(true), tracing::Level::DEBUG);
    }
}
