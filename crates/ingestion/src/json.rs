//! JSON file sources
//!
//! Each file holds a JSON array of rows. Rows that do not deserialize are
//! dropped with a warning instead of failing the whole load.

use std::path::{Path, PathBuf};

use contracts::{
    ActiveScheduleEntry, ContractError, RecordSource, ScheduleSource, SessionRecord,
};
use metrics::counter;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{IngestionError, Result};

/// Rows read from one file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRows<T> {
    pub rows: Vec<T>,
    /// Malformed rows skipped
    pub dropped: usize,
}

/// Read `path` as a JSON array and deserialize every row that fits `T`
#[instrument(name = "read_json_rows", level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<LoadedRows<T>> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let values: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| IngestionError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let total = values.len();
    let mut rows = Vec::with_capacity(total);
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(row) => rows.push(row),
            Err(e) => debug!(index, error = %e, "malformed row skipped"),
        }
    }

    let dropped = total - rows.len();
    if dropped > 0 {
        counter!("studio_analytics_rows_dropped_total").increment(dropped as u64);
        warn!(dropped, kept = rows.len(), "malformed rows dropped");
    }

    Ok(LoadedRows { rows, dropped })
}

/// Session records from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_records(&self) -> std::result::Result<Vec<SessionRecord>, ContractError> {
        Ok(read_rows(&self.path)?.rows)
    }
}

/// Active schedule from a JSON file
#[derive(Debug, Clone)]
pub struct JsonScheduleSource {
    name: String,
    path: PathBuf,
}

impl JsonScheduleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleSource for JsonScheduleSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_schedule(&self) -> std::result::Result<Vec<ActiveScheduleEntry>, ContractError> {
        Ok(read_rows(&self.path)?.rows)
    }
}
