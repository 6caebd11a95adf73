//! # Ingestion
//!
//! Record and schedule collaborators.
//!
//! - [`JsonFileSource`] / [`JsonScheduleSource`]: JSON arrays on disk,
//!   malformed rows dropped
//! - [`MockRecordSource`]: seeded synthetic dataset plus a matching schedule
//!
//! ## Usage
//!
//! ```ignore
//! use contracts::RecordSource;
//! use ingestion::JsonFileSource;
//!
//! let records = JsonFileSource::new("sessions.json").load_records()?;
//! ```

mod error;
mod json;
mod mock;

pub use error::{IngestionError, Result};
pub use json::{read_rows, JsonFileSource, JsonScheduleSource, LoadedRows};
pub use mock::{MockDataConfig, MockRecordSource, MockScheduleSource};
