use perfilkit_profile::{
    ParseProfileError, derive_inverted_series, derive_ipc_bytes_from_series,
    derive_series_from_ipc_bytes, parse_profile_batch, parse_profile_document,
};
use pyo3::exceptions::{PyRuntimeError, PySyntaxError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "perfilkit.profile.v1";
const C_BRIDGE_TRANSPORT: &str = "polars_ipc";

#[pyclass(name = "SpecParseFailure")]
#[derive(Debug, Clone)]
struct PySpecParseFailure {
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    field: Option<String>,
    #[pyo3(get)]
    reason: String,
}

impl From<ParseProfileError> for PySpecParseFailure {
    fn from(err: ParseProfileError) -> Self {
        let field = match &err {
            ParseProfileError::MissingField { field, .. }
            | ParseProfileError::InvalidNumber { field, .. } => Some(field.as_tag().to_string()),
            ParseProfileError::MalformedDocument { .. } => None,
        };
        Self {
            name: err.document_name().to_string(),
            field,
            reason: err.to_string(),
        }
    }
}

#[pymethods]
impl PySpecParseFailure {
    fn __str__(&self) -> String {
        self.reason.clone()
    }
}

fn map_parse_profile_error(err: ParseProfileError) -> PyErr {
    match &err {
        ParseProfileError::MalformedDocument { .. } => PySyntaxError::new_err(err.to_string()),
        ParseProfileError::MissingField { .. } | ParseProfileError::InvalidNumber { .. } => {
            PyValueError::new_err(err.to_string())
        }
    }
}

/// Parse one uploaded document into IPC-serialized series bytes.
#[pyfunction(name = "parse_profile")]
fn parse_profile_py(py: Python<'_>, v_document: Vec<u8>, name: String) -> PyResult<Py<PyBytes>> {
    let series = py
        .allow_threads(|| parse_profile_document(&v_document, &name))
        .map_err(map_parse_profile_error)?;
    let v_ipc = py
        .allow_threads(|| derive_ipc_bytes_from_series(&series))
        .map_err(PyRuntimeError::new_err)?;
    Ok(PyBytes::new(py, &v_ipc).unbind())
}

/// Parse a batch of `(name, bytes)` documents with per-document isolation.
///
/// Returns `(parsed, failures)`: parsed series as `(name, ipc_bytes)` pairs
/// in collection order (last write wins on duplicate names), plus one
/// failure record per rejected document.
#[pyfunction(name = "parse_profile_batch")]
fn parse_profile_batch_py(
    py: Python<'_>,
    l_documents: Vec<(String, Vec<u8>)>,
) -> PyResult<(Vec<(String, Py<PyBytes>)>, Vec<PySpecParseFailure>)> {
    let (collection, report) = py.allow_threads(|| parse_profile_batch(&l_documents));

    let mut l_parsed = Vec::with_capacity(collection.len());
    for series in collection.iter() {
        let v_ipc = derive_ipc_bytes_from_series(series).map_err(PyRuntimeError::new_err)?;
        l_parsed.push((series.name.clone(), PyBytes::new(py, &v_ipc).unbind()));
    }

    let l_failures = report
        .errors
        .into_iter()
        .map(PySpecParseFailure::from)
        .collect();

    Ok((l_parsed, l_failures))
}

/// Swap the X and Z roles of an IPC-serialized series when `if_invert` is set.
#[pyfunction(name = "invert_profile")]
#[pyo3(signature = (v_ipc, if_invert = true))]
fn invert_profile_py(py: Python<'_>, v_ipc: Vec<u8>, if_invert: bool) -> PyResult<Py<PyBytes>> {
    let v_ipc_out = py
        .allow_threads(|| {
            let series = derive_series_from_ipc_bytes(&v_ipc, "")?;
            derive_ipc_bytes_from_series(&derive_inverted_series(&series, if_invert))
        })
        .map_err(PyValueError::new_err)?;
    Ok(PyBytes::new(py, &v_ipc_out).unbind())
}

#[pymodule]
fn _perfilkit_profile_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PySpecParseFailure>()?;
    module.add_function(wrap_pyfunction!(parse_profile_py, module)?)?;
    module.add_function(wrap_pyfunction!(parse_profile_batch_py, module)?)?;
    module.add_function(wrap_pyfunction!(invert_profile_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
