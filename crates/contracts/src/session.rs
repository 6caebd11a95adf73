//! SessionRecord - input of the analytics pipeline
//!
//! One scheduled class occurrence with its attendance and revenue figures.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Whether a session belongs to the currently active weekly schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    #[default]
    Inactive,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// One class occurrence
///
/// Counts are not cross-checked: `checked_in > capacity` (overbooking) is a
/// valid record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub trainer: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub class_name: String,

    #[serde(default)]
    pub class_type: String,

    /// Free-form session title; empty when the source has none
    #[serde(default)]
    pub session_name: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub day_of_week: String,

    /// Start time, `HH:MM`
    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub capacity: u32,

    #[serde(default)]
    pub checked_in: u32,

    #[serde(default)]
    pub booked: u32,

    #[serde(default)]
    pub late_cancelled: u32,

    #[serde(default)]
    pub waitlisted: u32,

    #[serde(default)]
    pub revenue: f64,

    /// Assigned by the status classifier; whatever the source supplies is overwritten
    #[serde(default)]
    status: SessionStatus,
}

impl SessionRecord {
    /// Create a record with zeroed figures, `day_of_week` derived from `date`
    pub fn new(class_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            trainer: String::new(),
            location: String::new(),
            class_name: class_name.into(),
            class_type: String::new(),
            session_name: String::new(),
            date,
            day_of_week: weekday_name(date.weekday()).to_string(),
            time: String::new(),
            capacity: 0,
            checked_in: 0,
            booked: 0,
            late_cancelled: 0,
            waitlisted: 0,
            revenue: 0.0,
            status: SessionStatus::Inactive,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Copy of this record carrying `status`
    ///
    /// Only the status classifier is expected to call this.
    pub fn with_status(&self, status: SessionStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Session title, falling back to the class name
    pub fn display_session_name(&self) -> &str {
        if self.session_name.trim().is_empty() {
            &self.class_name
        } else {
            &self.session_name
        }
    }

    /// Weekday bucket of this record
    ///
    /// Parses `day_of_week` (full or short English name); falls back to the
    /// weekday of `date` when the text is empty or unrecognized.
    pub fn weekday(&self) -> Weekday {
        parse_weekday(&self.day_of_week).unwrap_or_else(|| self.date.weekday())
    }
}

/// Monday-first week
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parse a weekday name, case-insensitive
pub fn parse_weekday(text: &str) -> Option<Weekday> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Weekday>().ok()
}

/// Full English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
