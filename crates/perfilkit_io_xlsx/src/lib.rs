//! `perfilkit_io_xlsx` v1:
//! Rust-side workbook export kernel.
//!
//! - `conf`   : Excel limits, chart anchor/scale constants
//! - `spec`   : config/plan/report models
//! - `util`   : pure layout and sanitization helpers
//! - `writer` : workbook writer kernel
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_COLS_PER_SERIES, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
pub use spec::{
    SpecColumnPairSlot, SpecExportReport, SpecWorkbookConfig, SpecWorkbookExport,
};
pub use util::{
    derive_chart_row_bounds, derive_series_header_labels, plan_column_pairs, sanitize_sheet_name,
    validate_sheet_dimensions,
};
pub use writer::{export_workbook, export_workbook_from_ipc_parts, export_workbook_single};
