//! Orchestrator error types

use thiserror::Error;

/// Failure surfaced to the producer
///
/// Never clears the last accepted result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The pipeline returned an error
    #[error("recompute #{seq} failed: {message}")]
    Failed { seq: u64, message: String },

    /// The worker caught a panic while running the pipeline
    #[error("recompute #{seq} panicked: {message}")]
    Panicked { seq: u64, message: String },

    /// The worker thread is gone
    #[error("recompute worker is not running")]
    WorkerUnavailable,
}

impl PipelineError {
    pub fn failed(seq: u64, message: impl Into<String>) -> Self {
        Self::Failed {
            seq,
            message: message.into(),
        }
    }

    pub fn panicked(seq: u64, message: impl Into<String>) -> Self {
        Self::Panicked {
            seq,
            message: message.into(),
        }
    }

    /// Sequence number of the failed request, if any
    pub fn seq(&self) -> Option<u64> {
        match self {
            Self::Failed { seq, .. } | Self::Panicked { seq, .. } => Some(*seq),
            Self::WorkerUnavailable => None,
        }
    }

    /// Metric label
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Failed { .. } => "failed",
            Self::Panicked { .. } => "panicked",
            Self::WorkerUnavailable => "unavailable",
        }
    }
}
