//! Read operations over the loaded data store.
//!
//! All four operations are pure reads against the immutable registries,
//! so they may run with arbitrary concurrency and in any order.
//! Request-supplied dataset names are lowercased before lookup — callers
//! get no partial-key matching beyond that.
//!
//! Range bounds on `limit` and `offset` are the HTTP boundary's job
//! (see `server::handlers`); these functions trust their arguments.

use chrono::NaiveDate;

use crate::model::{MetadataRecord, QueryError, RowRecord};
use crate::registry::DataStore;

/// All known dataset keys. Order is implementation-defined.
pub fn list_datasets(store: &DataStore) -> Vec<String> {
    store.keys().map(String::from).collect()
}

/// Up to `limit` rows starting at `offset` (0-based).
///
/// An `offset` at or past the end of the dataset yields an empty vec,
/// not an error.
pub fn fetch_rows(
    store: &DataStore,
    name: &str,
    limit: usize,
    offset: usize,
) -> Result<Vec<RowRecord>, QueryError> {
    let key = name.to_lowercase();
    let dataset = store
        .dataset(&key)
        .ok_or_else(|| QueryError::DatasetNotFound(name.to_string()))?;

    Ok((offset..dataset.len())
        .take(limit)
        .filter_map(|i| dataset.record(i))
        .collect())
}

/// All rows whose timestamp falls on the given calendar day.
///
/// `date_str` must be a strict `YYYY-MM-DD` date. An empty result is the
/// explicit "no rows for this date" signal, distinct from an unknown
/// dataset key.
pub fn fetch_rows_for_date(
    store: &DataStore,
    name: &str,
    date_str: &str,
) -> Result<Vec<RowRecord>, QueryError> {
    let key = name.to_lowercase();
    let dataset = store
        .dataset(&key)
        .ok_or_else(|| QueryError::DatasetNotFound(name.to_string()))?;

    let target = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| QueryError::InvalidDate(date_str.to_string()))?;

    Ok((0..dataset.len())
        .filter(|&i| dataset.timestamp(i).is_some_and(|t| t.date() == target))
        .filter_map(|i| dataset.record(i))
        .collect())
}

/// The stored metadata record, possibly empty.
pub fn fetch_metadata<'a>(
    store: &'a DataStore,
    name: &str,
) -> Result<&'a MetadataRecord, QueryError> {
    let key = name.to_lowercase();
    store
        .metadata(&key)
        .ok_or_else(|| QueryError::MetadataNotFound(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
