//! Core data types for the groundwater data service.
//!
//! This module defines the shared domain model imported by all other
//! modules. It contains no I/O — only types, accessors, and the error
//! enums used across loading and querying.

use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Required columns
// ---------------------------------------------------------------------------

/// Header name of the required timestamp column.
pub const COL_TIME: &str = "Data Time";

/// Header name of the required measurement column.
pub const COL_VALUE: &str = "Data Value";

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A single typed cell in a loaded table.
///
/// Serializes untagged, so a row becomes a plain JSON object:
/// strings as strings, numbers as numbers, timestamps as ISO-8601-ish
/// strings (`2020-01-01T06:30:00`), and missing cells as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Null,
}

impl CellValue {
    /// Render the cell as a display string, or `None` for a null cell.
    ///
    /// Used for metadata extraction: numbers render without a trailing
    /// `.0` (`5.0` → `"5"`), timestamps in `YYYY-MM-DD HH:MM:SS` form.
    pub fn as_display_string(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format!("{}", n)),
            CellValue::Timestamp(t) => Some(t.format("%Y-%m-%d %H:%M:%S").to_string()),
            CellValue::Null => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A JSON object representing one row: column name → typed value.
pub type RowRecord = serde_json::Map<String, serde_json::Value>;

/// One loaded tabular time series.
///
/// Rows are a stable-filtered subsequence of the source file's rows —
/// the loader drops invalid rows but never reorders the survivors.
/// Immutable after load; the whole process shares it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names in original header order, whitespace-trimmed.
    columns: Vec<String>,
    /// Index of the `Data Time` column within `columns`.
    time_idx: usize,
    /// One `CellValue` per column, per surviving row.
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub(crate) fn new(columns: Vec<String>, time_idx: usize, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
            time_idx,
            rows,
        }
    }

    /// Number of surviving rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in original header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The timestamp of the given row, if the row exists.
    ///
    /// Every surviving row has a parsed timestamp in the time column,
    /// so this only returns `None` for an out-of-range index.
    pub fn timestamp(&self, row: usize) -> Option<NaiveDateTime> {
        match self.rows.get(row)?.get(self.time_idx) {
            Some(CellValue::Timestamp(t)) => Some(*t),
            _ => None,
        }
    }

    /// Serialize the given row as a JSON object over the full schema.
    pub fn record(&self, row: usize) -> Option<RowRecord> {
        let cells = self.rows.get(row)?;
        let mut record = RowRecord::new();
        for (name, cell) in self.columns.iter().zip(cells) {
            let value = serde_json::to_value(cell).unwrap_or(serde_json::Value::Null);
            record.insert(name.clone(), value);
        }
        Some(record)
    }
}

// ---------------------------------------------------------------------------
// Metadata record
// ---------------------------------------------------------------------------

/// Descriptive key/value set derived from a dataset's first surviving row.
///
/// Each field is populated only when the corresponding column exists in
/// the source file; absent columns are omitted from serialization rather
/// than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataRecord {
    #[serde(rename = "Metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(rename = "Download Date", skip_serializing_if = "Option::is_none")]
    pub download_date: Option<String>,
    #[serde(rename = "Period", skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(rename = "Data Source", skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl MetadataRecord {
    /// `true` when no descriptive column existed in the source file.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none()
            && self.download_date.is_none()
            && self.period.is_none()
            && self.data_source.is_none()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading a single CSV file.
///
/// Each file is handled in isolation: a `LoadError` skips that file and
/// leaves both registries untouched for its key, never aborting the
/// overall load pass.
#[derive(Debug, PartialEq)]
pub enum LoadError {
    /// The file could not be opened or read.
    Read(String),
    /// The CSV structure itself could not be parsed.
    Malformed(String),
    /// A required column is absent from the header row.
    MissingColumn(&'static str),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Read(msg) => write!(f, "read error: {}", msg),
            LoadError::Malformed(msg) => write!(f, "malformed table: {}", msg),
            LoadError::MissingColumn(col) => write!(f, "missing required column '{}'", col),
        }
    }
}

impl std::error::Error for LoadError {}

/// Errors returned by the query operations.
///
/// Dataset-level and metadata-level absence are distinct variants because
/// the two registries are independent and could diverge if a load
/// partially fails.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The requested key is absent from the data registry.
    DatasetNotFound(String),
    /// The requested key is absent from the metadata registry.
    MetadataNotFound(String),
    /// The supplied date string is not a valid `YYYY-MM-DD` date.
    InvalidDate(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::DatasetNotFound(name) => write!(f, "dataset '{}' not found", name),
            QueryError::MetadataNotFound(name) => {
                write!(f, "metadata for dataset '{}' not found", name)
            }
            QueryError::InvalidDate(s) => write!(f, "invalid date '{}'", s),
        }
    }
}

impl std::error::Error for QueryError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
