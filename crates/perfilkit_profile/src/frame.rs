//! DataFrame and IPC transport helpers.
//!
//! Series cross the bridge boundary as two-column (`X`, `Z`) Polars frames
//! serialized to IPC bytes.

use std::io::Cursor;

use polars::prelude::{AnyValue, Column, DataFrame, IpcReader, IpcWriter, SerReader, SerWriter};

use crate::conf::{C_COLUMN_X, C_COLUMN_Z};
use crate::spec::{SpecProfilePoint, SpecProfileSeries};

/// Convert a series into a two-column `f64` DataFrame in point order.
pub fn derive_dataframe_from_series(series: &SpecProfileSeries) -> Result<DataFrame, String> {
    let l_x: Vec<f64> = series.points.iter().map(|pt| pt.x).collect();
    let l_z: Vec<f64> = series.points.iter().map(|pt| pt.z).collect();

    DataFrame::new(vec![
        Column::new(C_COLUMN_X.into(), l_x),
        Column::new(C_COLUMN_Z.into(), l_z),
    ])
    .map_err(|err| {
        format!(
            "Failed to build DataFrame for series {:?}: {err}",
            series.name
        )
    })
}

/// Rebuild a named series from a DataFrame carrying `X` and `Z` columns.
pub fn derive_series_from_dataframe(
    df: &DataFrame,
    name: &str,
) -> Result<SpecProfileSeries, String> {
    let col_x = derive_required_column(df, C_COLUMN_X, name)?;
    let col_z = derive_required_column(df, C_COLUMN_Z, name)?;

    let mut l_points = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        l_points.push(SpecProfilePoint {
            x: derive_coordinate_value(col_x, n_idx_row, C_COLUMN_X, name)?,
            z: derive_coordinate_value(col_z, n_idx_row, C_COLUMN_Z, name)?,
        });
    }

    Ok(SpecProfileSeries {
        name: name.to_string(),
        points: l_points,
    })
}

/// Serialize a series to Polars IPC bytes.
pub fn derive_ipc_bytes_from_series(series: &SpecProfileSeries) -> Result<Vec<u8>, String> {
    let mut df = derive_dataframe_from_series(series)?;
    let mut v_ipc = Vec::new();
    IpcWriter::new(&mut v_ipc)
        .finish(&mut df)
        .map_err(|err| format!("Failed to write IPC DataFrame bytes: {err}"))?;
    Ok(v_ipc)
}

/// Rebuild a named series from Polars IPC bytes.
pub fn derive_series_from_ipc_bytes(
    v_ipc: &[u8],
    name: &str,
) -> Result<SpecProfileSeries, String> {
    let df = derive_dataframe_from_ipc_bytes(v_ipc)?;
    derive_series_from_dataframe(&df, name)
}

/// Deserialize one DataFrame from IPC bytes.
pub fn derive_dataframe_from_ipc_bytes(v_ipc: &[u8]) -> Result<DataFrame, String> {
    IpcReader::new(Cursor::new(v_ipc))
        .finish()
        .map_err(|err| format!("Failed to read IPC DataFrame bytes: {err}"))
}

fn derive_required_column<'a>(
    df: &'a DataFrame,
    column_name: &str,
    name: &str,
) -> Result<&'a Column, String> {
    df.column(column_name).map_err(|_| {
        format!("DataFrame for series {name:?} is missing required column {column_name:?}.")
    })
}

fn derive_coordinate_value(
    col: &Column,
    n_idx_row: usize,
    column_name: &str,
    name: &str,
) -> Result<f64, String> {
    let value = col
        .get(n_idx_row)
        .map_err(|err| format!("Failed to access cell value: {err}"))?;
    derive_f64_from_any_value(value).ok_or_else(|| {
        format!(
            "DataFrame for series {name:?} holds a non-numeric {column_name} value at row {n_idx_row}."
        )
    })
}

fn derive_f64_from_any_value(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::UInt8(val) => Some(val as f64),
        AnyValue::UInt16(val) => Some(val as f64),
        AnyValue::UInt32(val) => Some(val as f64),
        AnyValue::UInt64(val) => Some(val as f64),
        AnyValue::Int8(val) => Some(val as f64),
        AnyValue::Int16(val) => Some(val as f64),
        AnyValue::Int32(val) => Some(val as f64),
        AnyValue::Int64(val) => Some(val as f64),
        AnyValue::Int128(val) => Some(val as f64),
        AnyValue::Float32(val) => Some(val as f64),
        AnyValue::Float64(val) => Some(val),
        AnyValue::String(val) => val.parse::<f64>().ok(),
        AnyValue::StringOwned(val) => val.parse::<f64>().ok(),
        _ => None,
    }
}
