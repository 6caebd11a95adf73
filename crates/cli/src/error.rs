//! Error types for CLI operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Input file given on the command line does not exist
    #[error("{what} not found: {path}")]
    InputNotFound { what: &'static str, path: PathBuf },

    /// Neither `--records` nor `--mock` given
    #[error("no session records: pass --records <FILE> or --mock")]
    NoRecords,

    /// No result within the allotted time
    #[error("no result after {secs}s")]
    Timeout { secs: u64 },

    /// Interrupted by a signal before a result arrived
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Pipeline(#[from] orchestrator::PipelineError),
}

impl CliError {
    pub fn input_not_found(what: &'static str, path: &Path) -> Self {
        Self::InputNotFound {
            what,
            path: path.to_path_buf(),
        }
    }
}
