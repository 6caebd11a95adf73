//! Record and schedule source traits
//!
//! Collaborators that hand already-typed data to the engine. Row parsing and
//! defaulting of malformed rows happen behind these traits.

use crate::{ActiveScheduleEntry, ContractError, SessionRecord};

/// Supplier of session records
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn RecordSource> = Box::new(JsonFileSource::new(path));
/// let records = source.load_records()?;
/// ```
pub trait RecordSource: Send + Sync {
    /// Source name for logs and errors
    fn name(&self) -> &str;

    /// Load every record
    fn load_records(&self) -> Result<Vec<SessionRecord>, ContractError>;
}

/// Supplier of the active weekly schedule
///
/// Kept separate from [`RecordSource`] since the schedule usually comes from
/// a different system and may arrive later.
pub trait ScheduleSource: Send + Sync {
    fn name(&self) -> &str;

    fn load_schedule(&self) -> Result<Vec<ActiveScheduleEntry>, ContractError>;
}
