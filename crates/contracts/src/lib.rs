//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `SessionRecord` is the unit of input; its status is owned by the classifier
//! - `PipelineResult` is the unit of output, created fresh per run

#[macro_use]
mod macros;

mod criteria;
mod engine_config;
mod error;
mod grouping;
mod ranking;
mod record_source;
mod result;
mod schedule;
mod session;

pub use criteria::*;
pub use engine_config::*;
pub use error::*;
pub use grouping::*;
pub use ranking::*;
pub use record_source::{RecordSource, ScheduleSource};
pub use result::*;
pub use schedule::*;
pub use session::*;

pub use chrono::{NaiveDate, Weekday};
