//! Active/Inactive status classification.
//!
//! A record is Active when some slot of the weekly schedule on the same
//! weekday matches it on class, location and start time. Matching is fuzzy:
//! names are normalized and compared by containment, times by prefix.
//! Without a schedule, recency decides.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveTime, TimeDelta};
use contracts::{ClassifierConfig, ScheduleTable, SessionRecord, SessionStatus, Weekday, WEEK};
use tracing::{debug, instrument};

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p", "%I %p", "%I%p"];

/// Schedule slot with pre-normalized match fields
#[derive(Debug, Clone)]
struct NormalizedSlot {
    class_name: String,
    location: String,
    time: String,
}

/// Classifier bound to one schedule snapshot
#[derive(Debug)]
pub struct StatusClassifier {
    slots: HashMap<Weekday, Vec<NormalizedSlot>>,
    prefix_tokens: Vec<String>,
    fallback_window_days: i64,
}

impl StatusClassifier {
    pub fn new(schedule: &ScheduleTable, config: &ClassifierConfig) -> Self {
        let prefix_tokens: Vec<String> = config
            .class_prefix_tokens
            .iter()
            .map(|token| token.to_lowercase())
            .collect();

        let slots: HashMap<Weekday, Vec<NormalizedSlot>> = WEEK
            .iter()
            .filter_map(|&day| {
                let bucket = schedule.bucket(day);
                (!bucket.is_empty()).then(|| {
                    let normalized = bucket
                        .iter()
                        .map(|entry| NormalizedSlot {
                            class_name: normalize_class_name(&entry.class_name, &prefix_tokens),
                            location: normalize_location(&entry.location),
                            time: normalize_time(&entry.time),
                        })
                        .collect();
                    (day, normalized)
                })
            })
            .collect();

        Self {
            slots,
            prefix_tokens,
            fallback_window_days: config.fallback_window_days,
        }
    }

    /// Whether a schedule is loaded
    pub fn has_schedule(&self) -> bool {
        self.slots.values().any(|bucket| !bucket.is_empty())
    }

    /// Classify against the local date at the time of the call
    pub fn classify(&self, record: &SessionRecord) -> SessionStatus {
        self.classify_on(record, Local::now().date_naive())
    }

    /// Classify with an explicit "today" for the recency fallback
    pub fn classify_on(&self, record: &SessionRecord, today: NaiveDate) -> SessionStatus {
        if !self.has_schedule() {
            return self.classify_by_recency(record, today);
        }

        let Some(bucket) = self.slots.get(&record.weekday()) else {
            return SessionStatus::Inactive;
        };

        let class_name = normalize_class_name(&record.class_name, &self.prefix_tokens);
        let location = normalize_location(&record.location);
        let time = normalize_time(&record.time);

        let matched = bucket.iter().any(|slot| {
            contains_either(&class_name, &slot.class_name)
                && contains_either(&location, &slot.location)
                && prefix_either(&time, &slot.time)
        });

        if matched {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        }
    }

    fn classify_by_recency(&self, record: &SessionRecord, today: NaiveDate) -> SessionStatus {
        // a window reaching past the calendar range has no lower bound
        let cutoff = TimeDelta::try_days(self.fallback_window_days.max(0))
            .and_then(|window| today.checked_sub_signed(window));
        let recent = cutoff.map_or(true, |cutoff| record.date >= cutoff);
        if recent && record.date <= today {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        }
    }
}

/// Tag every record, returning new owned records
#[instrument(
    name = "classify_records",
    level = "debug",
    skip_all,
    fields(records = records.len(), schedule = schedule.len())
)]
pub fn classify_records(
    records: &[SessionRecord],
    schedule: &ScheduleTable,
    config: &ClassifierConfig,
) -> Vec<SessionRecord> {
    let classifier = StatusClassifier::new(schedule, config);
    let classified: Vec<SessionRecord> = records
        .iter()
        .map(|record| record.with_status(classifier.classify(record)))
        .collect();

    let active = classified
        .iter()
        .filter(|record| record.status() == SessionStatus::Active)
        .count();
    debug!(
        active,
        inactive = classified.len() - active,
        fallback = !classifier.has_schedule(),
        "records classified"
    );

    classified
}

/// Lowercase alphanumerics, with a leading prefix token ("studio", "the") dropped
pub fn normalize_class_name(name: &str, prefix_tokens: &[String]) -> String {
    let lowered = name.to_lowercase();
    let mut tokens = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .peekable();

    if let Some(first) = tokens.peek() {
        if prefix_tokens.iter().any(|prefix| prefix == first) {
            tokens.next();
        }
    }

    tokens.collect()
}

/// Lowercase alphanumerics only
pub fn normalize_location(location: &str) -> String {
    location
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `HH:MM` when the text parses as a time, otherwise the trimmed lowercase text;
/// at most 5 characters either way
pub fn normalize_time(time: &str) -> String {
    let trimmed = time.trim();
    let upper = trimmed.to_uppercase();
    let canonical = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&upper, format).ok())
        .map(|parsed| parsed.format("%H:%M").to_string())
        .unwrap_or_else(|| trimmed.to_lowercase());

    canonical.chars().take(5).collect()
}

/// Containment either way; empty strings never match
fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Prefix either way; empty strings never match
fn prefix_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.starts_with(b) || b.starts_with(a))
}
