//! `perfilkit_profile` v1:
//! Rust-side profilometer series kernel.
//!
//! - `conf`  : element/column name constants
//! - `spec`  : series models, parse error taxonomy, batch report
//! - `parse` : XML series parser kernel
//! - `frame` : DataFrame/IPC transport helpers
//! - `util`  : pure axis-inversion helpers
pub mod conf;
pub mod frame;
pub mod parse;
pub mod spec;
pub mod util;

pub use conf::{C_COLUMN_X, C_COLUMN_Z, C_ELEMENT_DATA, C_ELEMENT_X, C_ELEMENT_Z};
pub use frame::{
    derive_dataframe_from_series, derive_ipc_bytes_from_series, derive_series_from_dataframe,
    derive_series_from_ipc_bytes,
};
pub use parse::{parse_profile_batch, parse_profile_document};
pub use spec::{
    EnumProfileField, ParseProfileError, ReportParse, SpecProfilePoint, SpecProfileSeries,
    SpecSeriesCollection,
};
pub use util::{derive_inverted_collection, derive_inverted_series};
