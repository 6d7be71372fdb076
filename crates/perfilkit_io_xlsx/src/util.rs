//! Stateless helpers used by the workbook writer kernel.

use perfilkit_profile::SpecSeriesCollection;

use crate::conf::{
    N_COLS_PER_SERIES, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::SpecColumnPairSlot;

////////////////////////////////////////////////////////////////////////////////
// #region LayoutPlanning

/// Allocate one non-overlapping column pair per series, in insertion order.
///
/// Explicit fold carrying a running column offset: series `i` lands at
/// columns `2i`/`2i + 1` regardless of how the collection is iterated later.
pub fn plan_column_pairs(collection: &SpecSeriesCollection) -> Vec<SpecColumnPairSlot> {
    let mut l_slots = Vec::with_capacity(collection.len());
    let mut n_col_offset = 0usize;

    for series in collection.iter() {
        l_slots.push(SpecColumnPairSlot {
            name: series.name.clone(),
            col_x: n_col_offset,
            col_z: n_col_offset + 1,
            n_rows_data: series.len(),
        });
        n_col_offset += N_COLS_PER_SERIES;
    }

    l_slots
}

/// Header labels for one series' column pair.
pub fn derive_series_header_labels(name: &str) -> (String, String) {
    (format!("X - {name}"), format!("Z - {name}"))
}

/// Inclusive chart data row bounds for one series.
///
/// Data starts at row 1; an empty series collapses to the blank first data
/// row so its chart entry stays a valid range.
pub fn derive_chart_row_bounds(n_rows_data: usize) -> (usize, usize) {
    (1, usize::max(n_rows_data, 1))
}

/// Reject collections that cannot fit a single worksheet.
pub fn validate_sheet_dimensions(l_slots: &[SpecColumnPairSlot]) -> Result<(), String> {
    for slot in l_slots {
        if slot.n_rows_data + 1 > N_NROWS_EXCEL_MAX {
            return Err(format!(
                "Series {:?} exceeds the Excel row limit: {} data rows.",
                slot.name, slot.n_rows_data
            ));
        }
    }
    if l_slots.len() * N_COLS_PER_SERIES > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Too many series for one sheet: {} (limit {}).",
            l_slots.len(),
            N_NCOLS_EXCEL_MAX / N_COLS_PER_SERIES
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasts

/// Cast a worksheet row index to the writer's row type.
pub fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

/// Cast a worksheet column index to the writer's column type.
pub fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
