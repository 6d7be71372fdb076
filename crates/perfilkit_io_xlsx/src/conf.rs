//! Workbook constants and default preset factories.

use crate::spec::SpecWorkbookConfig;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Columns occupied by one series (X column, Z column).
pub const N_COLS_PER_SERIES: usize = 2;

/// Chart anchor row (cell A10).
pub const N_ROW_ANCHOR_CHART: u32 = 9;
/// Chart anchor column (cell A10).
pub const N_COL_ANCHOR_CHART: u16 = 0;
/// Chart width in pixels (2.5x the writer default).
pub const N_WIDTH_CHART: u32 = 1_200;
/// Chart height in pixels (2.5x the writer default).
pub const N_HEIGHT_CHART: u32 = 720;
/// Plotted line width in points.
pub const N_WIDTH_LINE_SERIES: f64 = 1.25;

/// Minimum column width in character units.
pub const N_WIDTH_CELL_MIN: usize = 8;
/// Width padding added after header-based inference.
pub const N_WIDTH_CELL_PADDING: usize = 2;

/// Build default workbook labels; callers override per export.
pub fn derive_default_workbook_config() -> SpecWorkbookConfig {
    SpecWorkbookConfig::default()
}
