//! # Orchestrator
//!
//! Recompute shell around the analytics engine.
//!
//! - One long-lived worker thread runs the whole pipeline per request
//! - Single-slot mailbox: a newer request evicts a pending one
//! - Sequence numbers: only the latest request's outcome is surfaced
//! - A watchdog thread logs runs exceeding the configured threshold
//!
//! ## State machine
//!
//! ```text
//! Idle --submit--> Running --submit--> Stale
//!   ^                 |                  |
//!   +---completion----+   stale result --+--> Running
//! ```

mod error;
mod handle;
mod request;
mod watchdog;
mod worker;

pub use error::PipelineError;
pub use handle::{OrchestratorState, RecomputeOrchestrator, Update};
pub use request::{RecomputeJob, Request};
pub use worker::{EngineRunner, PipelineRunner};
