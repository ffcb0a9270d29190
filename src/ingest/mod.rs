//! Dataset loading from flat files.
//!
//! The loader runs exactly once per process lifetime, synchronously,
//! before the HTTP surface accepts traffic. Each file is handled inside
//! its own failure boundary: a file that cannot be read or parsed is
//! classified, logged, and skipped without touching the registries for
//! its key or aborting the rest of the pass.
//!
//! Submodules:
//! - `csv_file` — parse one CSV export into a typed table.

pub mod csv_file;

use std::path::Path;

use crate::logging::{self, LogSource};
use crate::model::LoadError;
use crate::registry::{normalize_key, DataStore};

// ---------------------------------------------------------------------------
// Load summary
// ---------------------------------------------------------------------------

/// Per-file outcome aggregation for one load pass.
///
/// Successes carry the normalized key they were stored under; failures
/// carry the file name and the reason it was skipped.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, LoadError)>,
}

impl LoadSummary {
    /// Number of recognized files the pass attempted.
    pub fn total(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

/// Load every `.csv` file (case-insensitive extension) in `dir` into the
/// store.
///
/// Entries are processed in lexicographic file-name order, so two names
/// normalizing to the same key collide deterministically: the
/// lexicographically later file wins on every platform.
///
/// An unreadable directory is a startup error and is returned to the
/// caller; anything that goes wrong with an individual file is logged
/// and recorded in the summary instead.
pub fn load_directory(dir: &Path, store: &mut DataStore) -> Result<LoadSummary, LoadError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| LoadError::Read(format!("{}: {}", dir.display(), e)))?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Read(e.to_string()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort_unstable();

    let mut summary = LoadSummary::default();
    for name in names {
        match csv_file::load_csv_file(&dir.join(&name)) {
            Ok((dataset, metadata)) => {
                let key = normalize_key(&name);
                let record_count = dataset.len();
                let replaced = store.insert(key.clone(), dataset, metadata);
                if replaced {
                    logging::warn(
                        LogSource::Loader,
                        Some(&key),
                        &format!("'{}' replaced an earlier file with the same key", name),
                    );
                }
                logging::info(
                    LogSource::Loader,
                    Some(&key),
                    &format!("Loaded dataset with {} records", record_count),
                );
                summary.loaded.push(key);
            }
            Err(err) => {
                logging::log_load_failure(&name, &err);
                summary.failed.push((name, err));
            }
        }
    }

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
