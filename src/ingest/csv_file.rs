//! CSV parsing for groundwater time-series exports.
//!
//! Turns one flat file into a typed `Dataset` plus the `MetadataRecord`
//! derived from its first surviving row. The required columns are
//! `Data Time` (timestamp) and `Data Value` (finite number); rows failing
//! either are dropped, everything else is preserved in original order.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{CellValue, Dataset, LoadError, MetadataRecord, COL_TIME, COL_VALUE};

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Datetime formats seen in the field exports, most common first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats; parsed values land at midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a time cell. Returns `None` for empty or unrecognized values.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a value cell as a finite number. `NaN`/`inf` count as null.
fn parse_number(raw: &str) -> Option<f64> {
    let n: f64 = raw.trim().parse().ok()?;
    n.is_finite().then_some(n)
}

/// Type a non-required cell: empty → null, finite number, else text.
///
/// Text keeps the raw cell content so query responses round-trip the
/// source values exactly.
fn infer_cell(raw: &str) -> CellValue {
    if raw.trim().is_empty() {
        return CellValue::Null;
    }
    if let Some(n) = parse_number(raw) {
        return CellValue::Number(n);
    }
    CellValue::Text(raw.to_string())
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

/// Parse one CSV file into a dataset and its metadata record.
///
/// Header names are whitespace-trimmed before the required-column check.
/// Ragged rows are tolerated — cells beyond a short row read as empty.
pub fn load_csv_file(path: &Path) -> Result<(Dataset, MetadataRecord), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::Read(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Malformed(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let time_idx = headers
        .iter()
        .position(|h| h == COL_TIME)
        .ok_or(LoadError::MissingColumn(COL_TIME))?;
    let value_idx = headers
        .iter()
        .position(|h| h == COL_VALUE)
        .ok_or(LoadError::MissingColumn(COL_VALUE))?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Malformed(e.to_string()))?;

        // Stable row filter: both required cells must be valid, survivors
        // keep their original order.
        let Some(time) = parse_timestamp(record.get(time_idx).unwrap_or("")) else {
            continue;
        };
        let Some(value) = parse_number(record.get(value_idx).unwrap_or("")) else {
            continue;
        };

        let mut cells = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let cell = if idx == time_idx {
                CellValue::Timestamp(time)
            } else if idx == value_idx {
                CellValue::Number(value)
            } else {
                infer_cell(record.get(idx).unwrap_or(""))
            };
            cells.push(cell);
        }
        rows.push(cells);
    }

    let metadata = extract_metadata(&headers, rows.first());
    Ok((Dataset::new(headers, time_idx, rows), metadata))
}

/// Build the metadata record from the first surviving row.
///
/// A dataset with zero surviving rows yields an empty record rather than
/// failing the file.
fn extract_metadata(columns: &[String], first_row: Option<&Vec<CellValue>>) -> MetadataRecord {
    let mut meta = MetadataRecord::default();
    let Some(row) = first_row else {
        return meta;
    };

    let field = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| row.get(idx))
            .and_then(CellValue::as_display_string)
    };

    meta.metadata = field("Metadata");
    meta.download_date = field("Download Date");
    meta.period = field("Period");
    meta.data_source = field("Data Source");
    meta
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
