//! Workbook export models and per-export report.

use std::collections::BTreeMap;
use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// #region ExportConfiguration

/// Caller-supplied workbook labels.
///
/// The presentation layer owns the real values; the defaults only keep the
/// kernel usable standalone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWorkbookConfig {
    /// Sheet name (sanitized before use).
    pub sheet_name: String,
    /// Chart title.
    pub title_chart: String,
    /// Chart X axis label.
    pub label_axis_x: String,
    /// Chart Y axis label.
    pub label_axis_y: String,
}

impl Default for SpecWorkbookConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Profile Data".to_string(),
            title_chart: "Profile Comparison".to_string(),
            label_axis_x: "X".to_string(),
            label_axis_y: "Z".to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutPlan

/// One series' column allocation in the combined sheet.
///
/// Series `i` owns columns `2i` (X) and `2i + 1` (Z); pairs never overlap, so
/// the chart can address each series by column ranges alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnPairSlot {
    /// Series name (header label suffix and chart legend entry).
    pub name: String,
    /// Zero-based X column index.
    pub col_x: usize,
    /// Zero-based Z column index.
    pub col_z: usize,
    /// Number of data rows written beneath the header row.
    pub n_rows_data: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportReport

/// Per-export call report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecExportReport {
    /// Actual sheet name written to the workbook.
    pub sheet_name: String,
    /// Number of exported series.
    pub n_series: usize,
    /// Total data rows across all series.
    pub n_points_total: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecExportReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("n_series".to_string(), self.n_series as u64);
        dict_counts.insert("n_points_total".to_string(), self.n_points_total as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} sheet={:?} series={} points={} warnings={}",
            self.sheet_name,
            self.n_series,
            self.n_points_total,
            self.warning_count()
        )
    }
}

impl fmt::Display for SpecExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[XLSX]"))
    }
}

/// Finished export payload: workbook bytes plus the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWorkbookExport {
    /// XLSX workbook bytes.
    pub v_bytes: Vec<u8>,
    /// Per-call report.
    pub report: SpecExportReport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SpecExportReport;

    #[test]
    fn export_report_to_dict_and_format() {
        let mut report = SpecExportReport {
            sheet_name: "Profile Data".to_string(),
            n_series: 2,
            n_points_total: 3,
            warnings: vec![],
        };
        report.warn("w");

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["n_series"], 2);
        assert_eq!(dict_counts["n_points_total"], 3);
        assert_eq!(dict_counts["cnt_warnings"], 1);
        assert_eq!(
            report.to_string(),
            "[XLSX] sheet=\"Profile Data\" series=2 points=3 warnings=1"
        );
    }
}
