//! Ingestion error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a JSON array of rows
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestionError {
    fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

impl From<IngestionError> for ContractError {
    fn from(err: IngestionError) -> Self {
        ContractError::source_read(err.path().display().to_string(), err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestionError>;
