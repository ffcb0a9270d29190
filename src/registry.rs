//! Dataset registry for the groundwater data service.
//!
//! Defines the canonical key derivation for dataset identifiers and the
//! `DataStore` holding the two process-wide registries (data and
//! metadata). This is the single source of truth for dataset keys — all
//! other modules should derive keys from here rather than normalizing
//! file names themselves.
//!
//! The store is built once by the loader before the server starts and is
//! shared read-only (`Arc<DataStore>`) afterwards, so query handlers can
//! run with arbitrary concurrency without locking.

use std::collections::HashMap;
use std::path::Path;

use crate::model::{Dataset, MetadataRecord};

// ---------------------------------------------------------------------------
// Key normalization
// ---------------------------------------------------------------------------

/// Derive the canonical dataset key from a file name or path.
///
/// The final extension is stripped, the remainder lowercased, and spaces,
/// hyphens, and parentheses deleted. Nothing else is transformed —
/// accents, other punctuation, and digits pass through unchanged.
///
/// Deterministic and side-effect-free:
/// `normalize_key("Well-A (2020).csv")` == `normalize_key("well-a 2020.CSV")`
/// == `"wella2020"`.
pub fn normalize_key(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    stem.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

// ---------------------------------------------------------------------------
// Data store
// ---------------------------------------------------------------------------

/// The two process-wide registries, keyed by normalized dataset key.
///
/// Lifecycle: empty at process start, fully populated by one load pass,
/// read-only for the remainder of the process. Every key in the data
/// registry has exactly one (possibly empty) metadata record, inserted
/// in the same call.
#[derive(Debug, Default)]
pub struct DataStore {
    datasets: HashMap<String, Dataset>,
    metadata: HashMap<String, MetadataRecord>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dataset and its metadata record under `key`.
    ///
    /// Returns `true` if an earlier dataset was overwritten — two file
    /// names normalizing to the same key is accepted last-write-wins
    /// behavior, not an error, but the loader logs it.
    pub(crate) fn insert(
        &mut self,
        key: String,
        dataset: Dataset,
        metadata: MetadataRecord,
    ) -> bool {
        let replaced = self.datasets.insert(key.clone(), dataset).is_some();
        self.metadata.insert(key, metadata);
        replaced
    }

    /// Look up a dataset by its already-normalized key.
    pub fn dataset(&self, key: &str) -> Option<&Dataset> {
        self.datasets.get(key)
    }

    /// Look up a metadata record by its already-normalized key.
    pub fn metadata(&self, key: &str) -> Option<&MetadataRecord> {
        self.metadata.get(key)
    }

    /// All known dataset keys. Order is implementation-defined.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Number of loaded datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
