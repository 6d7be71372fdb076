//! Series models, parse error taxonomy, and batch-parse report.

use std::collections::BTreeMap;
use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// #region SeriesModels

/// One measured point. Carries no identity beyond its position in a series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpecProfilePoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Height coordinate.
    pub z: f64,
}

/// Ordered sequence of points plus the source document name.
///
/// Point order is the plotted path; it is never reordered or deduplicated.
/// A series with zero points is valid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecProfileSeries {
    /// Source document name (typically the uploaded file name).
    pub name: String,
    /// Points in document order.
    pub points: Vec<SpecProfilePoint>,
}

impl SpecProfileSeries {
    /// Create an empty series with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Insertion-ordered mapping from unique series name to series.
///
/// Insertion order determines column placement and chart legend order, so the
/// backing store is a `Vec` rather than a sorted map. Inserting under an
/// existing name replaces the series in place (last write wins, original
/// position kept).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSeriesCollection {
    l_series: Vec<SpecProfileSeries>,
}

impl SpecSeriesCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from series in iteration order.
    pub fn from_series(series: impl IntoIterator<Item = SpecProfileSeries>) -> Self {
        let mut collection = Self::new();
        for item in series {
            collection.insert(item);
        }
        collection
    }

    /// Insert one series; an existing entry with the same name is replaced
    /// in place.
    pub fn insert(&mut self, series: SpecProfileSeries) {
        if let Some(n_idx) = self
            .l_series
            .iter()
            .position(|entry| entry.name == series.name)
        {
            tracing::warn!(name = %series.name, "duplicate series name; previous series replaced");
            self.l_series[n_idx] = series;
            return;
        }
        self.l_series.push(series);
    }

    /// Look up one series by name.
    pub fn get(&self, name: &str) -> Option<&SpecProfileSeries> {
        self.l_series.iter().find(|entry| entry.name == name)
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.l_series.len()
    }

    /// Whether the collection holds no series.
    pub fn is_empty(&self) -> bool {
        self.l_series.is_empty()
    }

    /// Iterate series in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SpecProfileSeries> {
        self.l_series.iter()
    }

    /// Series names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.l_series.iter().map(|entry| entry.name.as_str()).collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ParseErrors

/// Coordinate field selector used in parse error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumProfileField {
    /// The `X` child element.
    X,
    /// The `Z` child element.
    Z,
}

impl EnumProfileField {
    /// Element tag name for this field.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::X => crate::conf::C_ELEMENT_X,
            Self::Z => crate::conf::C_ELEMENT_Z,
        }
    }
}

impl fmt::Display for EnumProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Per-document parse failure. Never a partial series: any failure discards
/// every point parsed so far from that document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseProfileError {
    /// The byte stream is not a well-formed XML document.
    MalformedDocument {
        /// Failing document name.
        name: String,
        /// Underlying reader/structure error text.
        message: String,
    },
    /// A `Data` element lacks a direct `X` or `Z` child.
    MissingField {
        /// Failing document name.
        name: String,
        /// Missing child field.
        field: EnumProfileField,
        /// 1-based ordinal of the offending `Data` element.
        n_idx_data: usize,
    },
    /// An `X` or `Z` text value is not a valid real number literal.
    InvalidNumber {
        /// Failing document name.
        name: String,
        /// Offending child field.
        field: EnumProfileField,
        /// 1-based ordinal of the offending `Data` element.
        n_idx_data: usize,
        /// Raw text content that failed to parse.
        text: String,
    },
}

impl ParseProfileError {
    /// Name of the document the failure belongs to.
    pub fn document_name(&self) -> &str {
        match self {
            Self::MalformedDocument { name, .. }
            | Self::MissingField { name, .. }
            | Self::InvalidNumber { name, .. } => name,
        }
    }
}

impl fmt::Display for ParseProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDocument { name, message } => {
                write!(f, "{name}: document is not well-formed XML: {message}")
            }
            Self::MissingField {
                name,
                field,
                n_idx_data,
            } => write!(
                f,
                "{name}: Data element #{n_idx_data} is missing child <{field}>"
            ),
            Self::InvalidNumber {
                name,
                field,
                n_idx_data,
                text,
            } => write!(
                f,
                "{name}: Data element #{n_idx_data} child <{field}> is not a valid number: {text:?}"
            ),
        }
    }
}

impl std::error::Error for ParseProfileError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BatchReport

/// Aggregate counters and diagnostics for one `parse_profile_batch` run.
#[derive(Debug, Default, Clone)]
pub struct ReportParse {
    /// Number of documents parsed into a series.
    pub cnt_parsed: u64,
    /// Number of documents rejected with a parse failure.
    pub cnt_failed: u64,
    /// Per-document failures in batch order.
    pub errors: Vec<ParseProfileError>,
}

impl ReportParse {
    /// Number of collected failures.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_parsed".to_string(), self.cnt_parsed);
        dict_counts.insert("cnt_failed".to_string(), self.cnt_failed);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} parsed={} failed={}",
            self.cnt_parsed, self.cnt_failed
        )
    }
}

impl fmt::Display for ReportParse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PARSE]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
