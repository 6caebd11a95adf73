//! Active weekly schedule supplied by an external collaborator.

use std::collections::HashMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::parse_weekday;

/// One recurring slot of the active schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveScheduleEntry {
    /// Weekday name ("Monday", "mon", ...)
    pub day: String,

    /// Start time, `HH:MM`
    pub time: String,

    #[serde(default)]
    pub location: String,

    pub class_name: String,

    #[serde(default)]
    pub trainer: String,

    #[serde(default)]
    pub capacity: u32,

    /// Duration in minutes
    #[serde(default)]
    pub duration: u32,
}

/// Schedule entries bucketed by weekday
///
/// Immutable once built; entries whose `day` cannot be parsed are left out
/// and counted in [`ScheduleTable::rejected`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    buckets: HashMap<Weekday, Vec<ActiveScheduleEntry>>,
    len: usize,
    rejected: usize,
}

impl ScheduleTable {
    pub fn from_entries(entries: impl IntoIterator<Item = ActiveScheduleEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            match parse_weekday(&entry.day) {
                Some(day) => {
                    table.buckets.entry(day).or_default().push(entry);
                    table.len += 1;
                }
                None => table.rejected += 1,
            }
        }
        table
    }

    /// Entries scheduled on `day`
    pub fn bucket(&self, day: Weekday) -> &[ActiveScheduleEntry] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of input entries dropped for an unrecognized weekday
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
