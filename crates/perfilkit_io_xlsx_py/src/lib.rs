use std::collections::BTreeMap;

use perfilkit_io_xlsx::{SpecExportReport, SpecWorkbookConfig, export_workbook_from_ipc_parts};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "perfilkit.xlsx.export.v1";
const C_BRIDGE_TRANSPORT: &str = "polars_ipc";

#[pyclass(name = "ReportExport")]
#[derive(Debug, Clone)]
struct PyReportExport {
    #[pyo3(get)]
    sheet_name: String,
    #[pyo3(get)]
    n_series: usize,
    #[pyo3(get)]
    n_points_total: usize,
    #[pyo3(get)]
    warnings: Vec<String>,
}

impl From<SpecExportReport> for PyReportExport {
    fn from(report: SpecExportReport) -> Self {
        Self {
            sheet_name: report.sheet_name,
            n_series: report.n_series,
            n_points_total: report.n_points_total,
            warnings: report.warnings,
        }
    }
}

#[pymethods]
impl PyReportExport {
    #[getter]
    fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("n_series".to_string(), self.n_series as u64);
        dict_counts.insert("n_points_total".to_string(), self.n_points_total as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    #[pyo3(signature = (prefix = "[XLSX]"))]
    fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} sheet={:?} series={} points={} warnings={}",
            self.sheet_name,
            self.n_series,
            self.n_points_total,
            self.warning_count()
        )
    }

    fn __str__(&self) -> String {
        self.format("[XLSX]")
    }
}

/// Export `(name, ipc_bytes)` series parts into one workbook.
///
/// Returns `(xlsx_bytes, report)`. The caller owns file naming and MIME
/// type; the kernel only produces the bytes.
#[pyfunction(name = "export_workbook")]
#[pyo3(signature = (
    l_series,
    sheet_name = "Profile Data",
    title_chart = "Profile Comparison",
    label_axis_x = "X",
    label_axis_y = "Z"
))]
fn export_workbook_py(
    py: Python<'_>,
    l_series: Vec<(String, Vec<u8>)>,
    sheet_name: &str,
    title_chart: &str,
    label_axis_x: &str,
    label_axis_y: &str,
) -> PyResult<(Py<PyBytes>, PyReportExport)> {
    let cfg_workbook = SpecWorkbookConfig {
        sheet_name: sheet_name.to_string(),
        title_chart: title_chart.to_string(),
        label_axis_x: label_axis_x.to_string(),
        label_axis_y: label_axis_y.to_string(),
    };

    let export = py
        .allow_threads(|| export_workbook_from_ipc_parts(&l_series, &cfg_workbook))
        .map_err(PyValueError::new_err)?;

    Ok((
        PyBytes::new(py, &export.v_bytes).unbind(),
        PyReportExport::from(export.report),
    ))
}

#[pymodule]
fn _perfilkit_io_xlsx_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportExport>()?;
    module.add_function(wrap_pyfunction!(export_workbook_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
