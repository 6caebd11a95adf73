//! Mock record source
//!
//! Deterministic synthetic studio data for demos and tests. The same seed
//! always yields the same records and schedule.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use contracts::{
    weekday_name, ActiveScheduleEntry, ContractError, RecordSource, ScheduleSource, SessionRecord,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// (class name, class type, drop-in price)
const CLASSES: &[(&str, &str, f64)] = &[
    ("Barre 57", "Barre", 950.0),
    ("Power Cycle", "Cycle", 850.0),
    ("Mat 57", "Barre", 900.0),
    ("Strength Lab", "Strength", 1000.0),
    ("Fit", "HIIT", 800.0),
];

const LOCATIONS: &[&str] = &["Kwality House", "Supreme HQ", "Kenkere House"];

const TRAINERS: &[&str] = &["Anisha", "Rohan", "Mrigakshi", "Karan", "Pranjali"];

const TIMES: &[&str] = &["07:00", "08:30", "10:00", "18:00", "19:30"];

const DAYS: &[Weekday] = &[
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Mock data configuration
#[derive(Debug, Clone)]
pub struct MockDataConfig {
    pub seed: u64,
    /// First day of the generated range
    pub start_date: NaiveDate,
    pub weeks: u32,
    /// Recurring slots per week
    pub slots: usize,
    /// Share of slots still on the active schedule
    pub active_share: f64,
    /// Emit one hosted event per week
    pub hosted_events: bool,
}

impl Default for MockDataConfig {
    fn default() -> Self {
        Self {
            seed: 57,
            // a Monday
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default(),
            weeks: 8,
            slots: 24,
            active_share: 0.75,
            hosted_events: true,
        }
    }
}

/// One recurring weekly slot
#[derive(Debug, Clone)]
struct Slot {
    day: Weekday,
    time: &'static str,
    class: usize,
    location: &'static str,
    trainer: &'static str,
    capacity: u32,
    active: bool,
}

/// Synthetic studio dataset
#[derive(Debug, Clone)]
pub struct MockRecordSource {
    config: MockDataConfig,
    slots: Vec<Slot>,
}

impl MockRecordSource {
    pub fn new(config: MockDataConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let slots = (0..config.slots)
            .map(|index| Slot {
                day: DAYS[index % DAYS.len()],
                time: TIMES[rng.random_range(0..TIMES.len())],
                class: rng.random_range(0..CLASSES.len()),
                location: LOCATIONS[rng.random_range(0..LOCATIONS.len())],
                trainer: TRAINERS[rng.random_range(0..TRAINERS.len())],
                capacity: rng.random_range(12..=24),
                active: rng.random_bool(config.active_share.clamp(0.0, 1.0)),
            })
            .collect();

        Self { config, slots }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(MockDataConfig {
            seed,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &MockDataConfig {
        &self.config
    }

    /// Every generated session, in date order within each week
    pub fn records(&self) -> Vec<SessionRecord> {
        // separate stream so attendance does not depend on slot layout draws
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(1));
        let mut records = Vec::with_capacity(self.config.weeks as usize * (self.slots.len() + 1));

        for week in 0..self.config.weeks {
            let week_start = self.config.start_date + Duration::weeks(i64::from(week));
            for slot in &self.slots {
                let offset = i64::from(slot.day.num_days_from_monday())
                    - i64::from(week_start.weekday().num_days_from_monday());
                let date = week_start + Duration::days(offset.rem_euclid(7));
                records.push(self.session(&mut rng, slot, date));
            }

            if self.config.hosted_events {
                records.push(hosted_event(&mut rng, week_start + Duration::days(6)));
            }
        }

        debug!(records = records.len(), seed = self.config.seed, "mock dataset generated");
        records
    }

    /// Active schedule covering the slots still running
    pub fn schedule(&self) -> Vec<ActiveScheduleEntry> {
        self.slots
            .iter()
            .filter(|slot| slot.active)
            .map(|slot| ActiveScheduleEntry {
                day: weekday_name(slot.day).to_string(),
                time: slot.time.to_string(),
                location: slot.location.to_string(),
                class_name: format!("Studio {}", CLASSES[slot.class].0),
                trainer: slot.trainer.to_string(),
                capacity: slot.capacity,
                duration: 57,
            })
            .collect()
    }

    /// Schedule view of this source
    pub fn schedule_source(&self) -> MockScheduleSource {
        MockScheduleSource {
            entries: self.schedule(),
        }
    }

    fn session(&self, rng: &mut StdRng, slot: &Slot, date: NaiveDate) -> SessionRecord {
        let (class_name, class_type, price) = CLASSES[slot.class];
        let mut record = SessionRecord::new(class_name, date);
        record.trainer = slot.trainer.to_string();
        record.location = slot.location.to_string();
        record.class_type = class_type.to_string();
        record.time = slot.time.to_string();
        record.capacity = slot.capacity;

        // occasional empty session, occasional overbooking
        let demand = if rng.random_bool(0.08) {
            0
        } else {
            rng.random_range(slot.capacity / 3..=slot.capacity + 2)
        };
        record.booked = demand;
        record.late_cancelled = if demand > 0 { rng.random_range(0..=demand / 5) } else { 0 };
        record.checked_in = demand - record.late_cancelled;
        record.waitlisted = if demand >= slot.capacity { rng.random_range(0..=4) } else { 0 };
        record.revenue = f64::from(record.checked_in) * price;
        record
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new(MockDataConfig::default())
    }
}

impl RecordSource for MockRecordSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn load_records(&self) -> Result<Vec<SessionRecord>, ContractError> {
        Ok(self.records())
    }
}

fn hosted_event(rng: &mut StdRng, date: NaiveDate) -> SessionRecord {
    let mut record = SessionRecord::new("Sunday Brunch Hosted Event", date);
    record.session_name = "Brunch Takeover".to_string();
    record.trainer = TRAINERS[rng.random_range(0..TRAINERS.len())].to_string();
    record.location = LOCATIONS[0].to_string();
    record.class_type = "Event".to_string();
    record.time = "11:00".to_string();
    record.capacity = 40;
    record.booked = rng.random_range(25..=40);
    record.checked_in = record.booked;
    record.revenue = f64::from(record.checked_in) * 1500.0;
    record
}

/// Fixed schedule handed out by [`MockRecordSource::schedule_source`]
#[derive(Debug, Clone, Default)]
pub struct MockScheduleSource {
    entries: Vec<ActiveScheduleEntry>,
}

impl MockScheduleSource {
    pub fn new(entries: Vec<ActiveScheduleEntry>) -> Self {
        Self { entries }
    }
}

impl ScheduleSource for MockScheduleSource {
    fn name(&self) -> &str {
        "mock-schedule"
    }

    fn load_schedule(&self) -> Result<Vec<ActiveScheduleEntry>, ContractError> {
        Ok(self.entries.clone())
    }
}
