//! Plain-text rendering of a finished scan.

use spacesaver_core::analysis::Breakdown;
use spacesaver_core::model::size::format_size;
use spacesaver_core::ScanReport;
use std::io::{self, Write};

/// Write the ranked breakdown as a table.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &ScanReport,
    breakdown: &Breakdown,
) -> io::Result<()> {
    let root_name = report
        .root()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.root().display().to_string());

    if breakdown.is_empty() {
        writeln!(out, "No directories with size > 0 found in {root_name}")?;
        return Ok(());
    }

    writeln!(
        out,
        "Total size: {} - {root_name} ({} files in {:.2?})",
        format_size(breakdown.total_size),
        report.files_scanned(),
        report.duration()
    )?;
    writeln!(out)?;
    for slice in &breakdown.slices {
        let percent = if slice.show_percent {
            format!("{:.1}%", slice.percent)
        } else {
            String::new()
        };
        writeln!(out, "{:>12}  {percent:>6}  {}", format_size(slice.size), slice.name)?;
    }

    if report.unreadable_count() > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "{} entries could not be read and were counted as 0 B",
            report.unreadable_count()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacesaver_core::analysis::{breakdown, DEFAULT_MIN_SLICE_PERCENT};
    use spacesaver_core::scanner::progress::NoProgress;
    use spacesaver_core::{scan, CancelToken, ScanOptions};
    use std::fs;

    fn render(root: &std::path::Path) -> String {
        let report = scan(root, &ScanOptions::default(), &mut NoProgress, &CancelToken::new())
            .unwrap();
        let chart = breakdown(&report, DEFAULT_MIN_SLICE_PERCENT);
        let mut buf = Vec::new();
        write_report(&mut buf, &report, &chart).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn lists_directories_by_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("big")).unwrap();
        fs::create_dir_all(tmp.path().join("small")).unwrap();
        fs::write(tmp.path().join("big").join("x.bin"), vec![0u8; 2048]).unwrap();
        fs::write(tmp.path().join("small").join("y.bin"), vec![0u8; 10]).unwrap();

        let text = render(tmp.path());
        assert!(text.starts_with("Total size: 2.01 KB"));
        let rows: Vec<&str> = text.lines().skip(2).collect();
        assert!(rows[0].ends_with("  big"));
        assert!(rows[0].contains("99.5%"));
        assert!(rows[1].ends_with("  small"));
        assert!(!rows[1].contains('%'));
    }

    #[test]
    fn nothing_to_chart() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();
        fs::write(tmp.path().join("loose.txt"), b"top-level files are not ranked").unwrap();

        let text = render(tmp.path());
        assert!(text.starts_with("No directories with size > 0 found"));
    }
}
