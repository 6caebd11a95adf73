//! GroupBy modes and composite group keys

use serde::{Deserialize, Serialize};

use crate::SessionRecord;

/// One dimension a group key can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    ClassName,
    DayOfWeek,
    Time,
    Location,
    Trainer,
    ClassType,
    Date,
    SessionName,
}

impl GroupField {
    /// Value of this dimension for `record`
    pub fn value_of(&self, record: &SessionRecord) -> String {
        match self {
            Self::ClassName => record.class_name.clone(),
            Self::DayOfWeek => record.day_of_week.clone(),
            Self::Time => record.time.clone(),
            Self::Location => record.location.clone(),
            Self::Trainer => record.trainer.clone(),
            Self::ClassType => record.class_type.clone(),
            Self::Date => record.date.format("%Y-%m-%d").to_string(),
            Self::SessionName => record.display_session_name().to_string(),
        }
    }
}

/// Grouping mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    ClassDayTimeLocation,
    ClassDayTimeLocationTrainer,
    ClassDayTime,
    ClassDayLocation,
    ClassTime,
    ClassDay,
    ClassLocation,
    ClassTrainer,
    TrainerLocation,
    TrainerDay,
    TrainerTime,
    TrainerType,
    LocationDay,
    LocationTime,
    LocationType,
    DayTime,
    TypeDay,
    TypeTime,
    Class,
    Trainer,
    Location,
    Type,
    Date,
    SessionName,
}

named_variants!(GroupBy, "group-by mode", {
    ClassDayTimeLocation => "class_day_time_location",
    ClassDayTimeLocationTrainer => "class_day_time_location_trainer",
    ClassDayTime => "class_day_time",
    ClassDayLocation => "class_day_location",
    ClassTime => "class_time",
    ClassDay => "class_day",
    ClassLocation => "class_location",
    ClassTrainer => "class_trainer",
    TrainerLocation => "trainer_location",
    TrainerDay => "trainer_day",
    TrainerTime => "trainer_time",
    TrainerType => "trainer_type",
    LocationDay => "location_day",
    LocationTime => "location_time",
    LocationType => "location_type",
    DayTime => "day_time",
    TypeDay => "type_day",
    TypeTime => "type_time",
    Class => "class",
    Trainer => "trainer",
    Location => "location",
    Type => "type",
    Date => "date",
    SessionName => "session_name",
});

impl GroupBy {
    /// Ordered key dimensions of this mode
    pub fn fields(&self) -> &'static [GroupField] {
        use GroupField::*;
        match self {
            Self::ClassDayTimeLocation => &[ClassName, DayOfWeek, Time, Location],
            Self::ClassDayTimeLocationTrainer => &[ClassName, DayOfWeek, Time, Location, Trainer],
            Self::ClassDayTime => &[ClassName, DayOfWeek, Time],
            Self::ClassDayLocation => &[ClassName, DayOfWeek, Location],
            Self::ClassTime => &[ClassName, Time],
            Self::ClassDay => &[ClassName, DayOfWeek],
            Self::ClassLocation => &[ClassName, Location],
            Self::ClassTrainer => &[ClassName, Trainer],
            Self::TrainerLocation => &[Trainer, Location],
            Self::TrainerDay => &[Trainer, DayOfWeek],
            Self::TrainerTime => &[Trainer, Time],
            Self::TrainerType => &[Trainer, ClassType],
            Self::LocationDay => &[Location, DayOfWeek],
            Self::LocationTime => &[Location, Time],
            Self::LocationType => &[Location, ClassType],
            Self::DayTime => &[DayOfWeek, Time],
            Self::TypeDay => &[ClassType, DayOfWeek],
            Self::TypeTime => &[ClassType, Time],
            Self::Class => &[ClassName],
            Self::Trainer => &[Trainer],
            Self::Location => &[Location],
            Self::Type => &[ClassType],
            Self::Date => &[Date],
            Self::SessionName => &[SessionName],
        }
    }

    /// Build the key of `record` under this mode
    pub fn key_for(&self, record: &SessionRecord) -> GroupKey {
        GroupKey(
            self.fields()
                .iter()
                .map(|field| field.value_of(record))
                .collect(),
        )
    }
}

/// Ordered tuple of field values identifying one group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    /// Display string, values joined by `separator`
    pub fn display(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}
