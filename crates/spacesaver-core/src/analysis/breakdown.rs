/// Chart-ready breakdown of a scan report.
///
/// Turns the ranked entries into pie/bar slices: zero-byte entries are
/// dropped (they cannot be drawn), each slice gets its share of the total
/// and a two-line `name\nsize` label, and slices too thin to carry a
/// readable percentage are flagged so the renderer can leave it off.
use crate::model::size::format_size;
use crate::model::ScanReport;
use compact_str::CompactString;

/// Slices at or below this share of the total get no percentage label.
pub const DEFAULT_MIN_SLICE_PERCENT: f32 = 3.0;

/// One drawable share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub name: CompactString,
    pub size: u64,
    /// Share of [`Breakdown::total_size`], 0.0–100.0.
    pub percent: f32,
    /// `"<name>\n<human size>"`.
    pub label: String,
    /// Whether `percent` is large enough to print on the slice.
    pub show_percent: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Breakdown {
    /// Slices in report order (descending size).
    pub slices: Vec<Slice>,
    pub total_size: u64,
}

impl Breakdown {
    /// `true` when no entry had a non-zero size, i.e. there is nothing to
    /// chart.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Build the breakdown for `report`.
///
/// `min_percent` is the labelling threshold; negative or NaN values are
/// treated as zero.
pub fn breakdown(report: &ScanReport, min_percent: f32) -> Breakdown {
    let min_percent = if min_percent.is_nan() {
        0.0
    } else {
        min_percent.max(0.0)
    };
    let total_size = report.total_size();

    let slices = report
        .entries()
        .iter()
        .filter(|e| e.size > 0)
        .map(|e| {
            let percent = (e.size as f64 / total_size as f64 * 100.0) as f32;
            Slice {
                name: e.name.clone(),
                size: e.size,
                percent,
                label: format!("{}\n{}", e.name, format_size(e.size)),
                show_percent: percent > min_percent,
            }
        })
        .collect();

    Breakdown { slices, total_size }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::report::WalkTotals;
    use crate::model::Entry;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report(sizes: &[(&str, u64)]) -> ScanReport {
        let entries = sizes
            .iter()
            .map(|&(n, s)| Entry::directory(CompactString::new(n), s))
            .collect();
        ScanReport::new(
            PathBuf::from("/data"),
            entries,
            WalkTotals::default(),
            Vec::new(),
            0,
            Duration::ZERO,
        )
    }

    #[test]
    fn percentages_and_thresholds() {
        let r = report(&[("small", 10), ("big", 970), ("mid", 20), ("empty", 0)]);
        let b = breakdown(&r, DEFAULT_MIN_SLICE_PERCENT);

        assert_eq!(b.total_size, 1_000);
        let names: Vec<_> = b.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["big", "mid", "small"]);

        assert!((b.slices[0].percent - 97.0).abs() < 1e-3);
        assert!((b.slices[1].percent - 2.0).abs() < 1e-3);
        assert!(b.slices[0].show_percent);
        assert!(!b.slices[1].show_percent);
        assert!(!b.slices[2].show_percent);
    }

    #[test]
    fn label_has_name_and_size() {
        let r = report(&[("photos", 1_253_656)]);
        let b = breakdown(&r, 0.0);
        assert_eq!(b.slices[0].label, "photos\n1.20 MB");
        assert!(b.slices[0].show_percent);
    }

    #[test]
    fn all_zero_entries_give_empty_breakdown() {
        let r = report(&[("a", 0), ("b", 0)]);
        let b = breakdown(&r, DEFAULT_MIN_SLICE_PERCENT);
        assert!(b.is_empty());
        assert_eq!(b.total_size, 0);
    }

    #[test]
    fn nan_threshold_labels_everything() {
        let r = report(&[("a", 1), ("b", 999)]);
        let b = breakdown(&r, f32::NAN);
        assert!(b.slices.iter().all(|s| s.show_percent));
    }
}
