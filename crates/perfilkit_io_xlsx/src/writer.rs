//! Workbook writer kernel.
//!
//! Lays every series out as adjacent column pairs on one sheet and embeds a
//! single combined line chart addressing those columns.

use rust_xlsxwriter::{Chart, ChartLine, ChartType, Format, Workbook, Worksheet, XlsxError};

use perfilkit_profile::{
    SpecProfileSeries, SpecSeriesCollection, derive_series_from_ipc_bytes,
};

use crate::conf::{
    N_COL_ANCHOR_CHART, N_HEIGHT_CHART, N_ROW_ANCHOR_CHART, N_WIDTH_CELL_MIN,
    N_WIDTH_CELL_PADDING, N_WIDTH_CHART, N_WIDTH_LINE_SERIES,
};
use crate::spec::{
    SpecColumnPairSlot, SpecExportReport, SpecWorkbookConfig, SpecWorkbookExport,
};
use crate::util::{
    cast_col_num, cast_row_num, derive_chart_row_bounds, derive_series_header_labels,
    plan_column_pairs, sanitize_sheet_name, validate_sheet_dimensions,
};

/// Export one series collection into a single-sheet workbook with a chart.
///
/// The workbook is buffered in memory; nothing touches the filesystem.
pub fn export_workbook(
    collection: &SpecSeriesCollection,
    config: &SpecWorkbookConfig,
) -> Result<SpecWorkbookExport, String> {
    let l_slots = plan_column_pairs(collection);
    validate_sheet_dimensions(&l_slots)?;

    let c_sheet_name = sanitize_sheet_name(&config.sheet_name, "_");
    let mut report = SpecExportReport {
        sheet_name: c_sheet_name.clone(),
        n_series: l_slots.len(),
        n_points_total: 0,
        warnings: vec![],
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&c_sheet_name)
        .map_err(derive_xlsx_error_text)?;

    let fmt_header = Format::new().set_bold();
    for (slot, series) in l_slots.iter().zip(collection.iter()) {
        write_series_columns(worksheet, slot, series, &fmt_header)?;
        report.n_points_total += slot.n_rows_data;
    }

    if l_slots.is_empty() {
        report.warn("Empty series collection: chart omitted.");
    } else {
        let chart = build_profile_chart(&l_slots, &c_sheet_name, config)?;
        worksheet
            .insert_chart(N_ROW_ANCHOR_CHART, N_COL_ANCHOR_CHART, &chart)
            .map_err(derive_xlsx_error_text)?;
    }

    tracing::debug!(
        sheet_name = %c_sheet_name,
        n_series = report.n_series,
        n_points = report.n_points_total,
        "exported workbook"
    );

    let v_bytes = workbook
        .save_to_buffer()
        .map_err(derive_xlsx_error_text)?;

    Ok(SpecWorkbookExport { v_bytes, report })
}

/// Export one named series; same algorithm as the batch path with a
/// one-entry collection.
pub fn export_workbook_single(
    series: &SpecProfileSeries,
    config: &SpecWorkbookConfig,
) -> Result<SpecWorkbookExport, String> {
    let collection = SpecSeriesCollection::from_series([series.clone()]);
    export_workbook(&collection, config)
}

/// Export from `(name, IPC bytes)` parts as handed over by the bridge.
///
/// Parts are assembled in order with last-write-wins on duplicate names.
pub fn export_workbook_from_ipc_parts(
    l_parts: &[(String, Vec<u8>)],
    config: &SpecWorkbookConfig,
) -> Result<SpecWorkbookExport, String> {
    let mut collection = SpecSeriesCollection::new();
    for (name, v_ipc) in l_parts {
        collection.insert(derive_series_from_ipc_bytes(v_ipc, name)?);
    }
    export_workbook(&collection, config)
}

fn write_series_columns(
    worksheet: &mut Worksheet,
    slot: &SpecColumnPairSlot,
    series: &SpecProfileSeries,
    fmt_header: &Format,
) -> Result<(), String> {
    let (c_label_x, c_label_z) = derive_series_header_labels(&slot.name);
    let n_col_x = cast_col_num(slot.col_x)?;
    let n_col_z = cast_col_num(slot.col_z)?;

    worksheet
        .write_string_with_format(0, n_col_x, &c_label_x, fmt_header)
        .map_err(derive_xlsx_error_text)?;
    worksheet
        .write_string_with_format(0, n_col_z, &c_label_z, fmt_header)
        .map_err(derive_xlsx_error_text)?;

    for (n_idx_point, point) in series.points.iter().enumerate() {
        let n_row = cast_row_num(n_idx_point + 1)?;
        worksheet
            .write_number(n_row, n_col_x, point.x)
            .map_err(derive_xlsx_error_text)?;
        worksheet
            .write_number(n_row, n_col_z, point.z)
            .map_err(derive_xlsx_error_text)?;
    }

    // Header-derived column widths.
    for (n_col, c_label) in [(n_col_x, &c_label_x), (n_col_z, &c_label_z)] {
        let n_width =
            usize::max(N_WIDTH_CELL_MIN, c_label.chars().count()) + N_WIDTH_CELL_PADDING;
        worksheet
            .set_column_width(n_col, n_width as f64)
            .map_err(derive_xlsx_error_text)?;
    }

    Ok(())
}

fn build_profile_chart(
    l_slots: &[SpecColumnPairSlot],
    sheet_name: &str,
    config: &SpecWorkbookConfig,
) -> Result<Chart, String> {
    let mut chart = Chart::new(ChartType::ScatterStraight);

    for slot in l_slots {
        let (n_row_first, n_row_last) = derive_chart_row_bounds(slot.n_rows_data);
        let n_row_first = cast_row_num(n_row_first)?;
        let n_row_last = cast_row_num(n_row_last)?;
        let n_col_x = cast_col_num(slot.col_x)?;
        let n_col_z = cast_col_num(slot.col_z)?;

        chart
            .add_series()
            .set_name(slot.name.as_str())
            .set_categories((sheet_name, n_row_first, n_col_x, n_row_last, n_col_x))
            .set_values((sheet_name, n_row_first, n_col_z, n_row_last, n_col_z))
            .set_format(ChartLine::new().set_width(N_WIDTH_LINE_SERIES));
    }

    chart.title().set_name(config.title_chart.as_str());
    chart.x_axis().set_name(config.label_axis_x.as_str());
    chart.y_axis().set_name(config.label_axis_y.as_str());
    chart.set_width(N_WIDTH_CHART);
    chart.set_height(N_HEIGHT_CHART);

    Ok(chart)
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};
    use perfilkit_profile::{SpecProfilePoint, SpecProfileSeries, SpecSeriesCollection};

    use super::{export_workbook, export_workbook_from_ipc_parts, export_workbook_single};
    use crate::conf::derive_default_workbook_config;
    use crate::spec::SpecWorkbookConfig;

    fn series_with_points(name: &str, l_points: &[(f64, f64)]) -> SpecProfileSeries {
        SpecProfileSeries {
            name: name.to_string(),
            points: l_points
                .iter()
                .map(|(x, z)| SpecProfilePoint { x: *x, z: *z })
                .collect(),
        }
    }

    fn snapshot_cells(v_bytes: &[u8], sheet_name: &str) -> Vec<(usize, usize, Data)> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(v_bytes.to_vec())).expect("open workbook");
        let range = workbook.worksheet_range(sheet_name).expect("sheet range");
        range
            .used_cells()
            .map(|(n_row, n_col, value)| (n_row, n_col, value.clone()))
            .collect()
    }

    fn contains_zip_entry(v_bytes: &[u8], entry_name: &[u8]) -> bool {
        v_bytes
            .windows(entry_name.len())
            .any(|window| window == entry_name)
    }

    #[test]
    fn export_lays_series_out_as_adjacent_column_pairs() {
        let collection = SpecSeriesCollection::from_series([
            series_with_points("A", &[(0.0, 1.5), (1.0, 2.0)]),
            series_with_points("B", &[(5.0, 6.0)]),
        ]);
        let config = SpecWorkbookConfig::default();

        let export = export_workbook(&collection, &config).expect("export");
        let l_cells = snapshot_cells(&export.v_bytes, "Profile Data");

        assert!(l_cells.contains(&(0, 0, Data::String("X - A".to_string()))));
        assert!(l_cells.contains(&(0, 1, Data::String("Z - A".to_string()))));
        assert!(l_cells.contains(&(0, 2, Data::String("X - B".to_string()))));
        assert!(l_cells.contains(&(0, 3, Data::String("Z - B".to_string()))));

        assert!(l_cells.contains(&(1, 0, Data::Float(0.0))));
        assert!(l_cells.contains(&(1, 1, Data::Float(1.5))));
        assert!(l_cells.contains(&(2, 0, Data::Float(1.0))));
        assert!(l_cells.contains(&(2, 1, Data::Float(2.0))));
        assert!(l_cells.contains(&(1, 2, Data::Float(5.0))));
        assert!(l_cells.contains(&(1, 3, Data::Float(6.0))));

        // "B" has exactly one data row.
        assert!(!l_cells.iter().any(|(n_row, n_col, _)| *n_row == 2 && *n_col >= 2));

        assert!(contains_zip_entry(&export.v_bytes, b"xl/charts/chart1.xml"));
        assert_eq!(export.report.n_series, 2);
        assert_eq!(export.report.n_points_total, 3);
        assert!(export.report.warnings.is_empty());
    }

    #[test]
    fn export_single_series_matches_one_entry_batch() {
        let series = series_with_points("scan.txt", &[(0.0, 1.5), (1.0, 2.0)]);
        let config = SpecWorkbookConfig::default();

        let export_single = export_workbook_single(&series, &config).expect("single");
        let export_batch = export_workbook(
            &SpecSeriesCollection::from_series([series]),
            &config,
        )
        .expect("batch");

        assert_eq!(
            snapshot_cells(&export_single.v_bytes, "Profile Data"),
            snapshot_cells(&export_batch.v_bytes, "Profile Data")
        );
        assert_eq!(export_single.report, export_batch.report);
    }

    #[test]
    fn export_empty_series_writes_header_row_only() {
        let collection =
            SpecSeriesCollection::from_series([series_with_points("empty.txt", &[])]);
        let export =
            export_workbook(&collection, &SpecWorkbookConfig::default()).expect("export");

        let l_cells = snapshot_cells(&export.v_bytes, "Profile Data");
        assert!(l_cells.contains(&(0, 0, Data::String("X - empty.txt".to_string()))));
        assert!(l_cells.contains(&(0, 1, Data::String("Z - empty.txt".to_string()))));
        assert!(l_cells.iter().all(|(n_row, _, _)| *n_row == 0));

        // The chart keeps one (empty-range) series entry.
        assert!(contains_zip_entry(&export.v_bytes, b"xl/charts/chart1.xml"));
        assert_eq!(export.report.n_points_total, 0);
    }

    #[test]
    fn export_empty_collection_produces_chartless_sheet_with_warning() {
        let export = export_workbook(
            &SpecSeriesCollection::new(),
            &SpecWorkbookConfig::default(),
        )
        .expect("export");

        assert!(snapshot_cells(&export.v_bytes, "Profile Data").is_empty());
        assert!(!contains_zip_entry(&export.v_bytes, b"xl/charts/chart1.xml"));
        assert_eq!(export.report.warning_count(), 1);
    }

    #[test]
    fn export_cell_content_is_reproducible() {
        let collection = SpecSeriesCollection::from_series([
            series_with_points("A", &[(0.0, 1.5)]),
            series_with_points("B", &[(1.0, 2.0), (2.0, 3.0)]),
        ]);
        let config = derive_default_workbook_config();

        let export_first = export_workbook(&collection, &config).expect("first");
        let export_second = export_workbook(&collection, &config).expect("second");

        assert_eq!(
            snapshot_cells(&export_first.v_bytes, "Profile Data"),
            snapshot_cells(&export_second.v_bytes, "Profile Data")
        );
        assert_eq!(export_first.report, export_second.report);
    }

    #[test]
    fn export_sanitizes_the_configured_sheet_name() {
        let collection =
            SpecSeriesCollection::from_series([series_with_points("A", &[(0.0, 1.0)])]);
        let config = SpecWorkbookConfig {
            sheet_name: "Perfil: run/1".to_string(),
            ..SpecWorkbookConfig::default()
        };

        let export = export_workbook(&collection, &config).expect("export");
        assert_eq!(export.report.sheet_name, "Perfil_ run_1");
        assert!(!snapshot_cells(&export.v_bytes, "Perfil_ run_1").is_empty());
    }

    #[test]
    fn export_from_ipc_parts_matches_direct_export() {
        let series_a = series_with_points("A", &[(0.0, 1.5), (1.0, 2.0)]);
        let series_b = series_with_points("B", &[(5.0, 6.0)]);
        let config = SpecWorkbookConfig::default();

        let l_parts = vec![
            (
                "A".to_string(),
                perfilkit_profile::derive_ipc_bytes_from_series(&series_a).expect("ipc"),
            ),
            (
                "B".to_string(),
                perfilkit_profile::derive_ipc_bytes_from_series(&series_b).expect("ipc"),
            ),
        ];

        let export_ipc = export_workbook_from_ipc_parts(&l_parts, &config).expect("ipc export");
        let export_direct = export_workbook(
            &SpecSeriesCollection::from_series([series_a, series_b]),
            &config,
        )
        .expect("direct export");

        assert_eq!(
            snapshot_cells(&export_ipc.v_bytes, "Profile Data"),
            snapshot_cells(&export_direct.v_bytes, "Profile Data")
        );
    }
}
