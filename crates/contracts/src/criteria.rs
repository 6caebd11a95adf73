//! FilterCriteria and view parameters
//!
//! Opaque request parameters built by the presentation layer.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{GroupBy, RankingMetric, SessionStatus};

/// Status restriction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

named_variants!(StatusFilter, "status filter", {
    All => "all",
    Active => "active",
    Inactive => "inactive",
});

impl StatusFilter {
    pub fn matches(&self, status: SessionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == SessionStatus::Active,
            Self::Inactive => status == SessionStatus::Inactive,
        }
    }
}

/// Compound record predicate
///
/// Empty sets mean "no restriction". `min_check_ins` and `min_classes` only
/// apply to grouped rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,

    /// Inclusive upper bound
    pub date_to: Option<NaiveDate>,

    pub trainers: BTreeSet<String>,

    pub locations: BTreeSet<String>,

    pub class_types: BTreeSet<String>,

    pub class_names: BTreeSet<String>,

    pub status: StatusFilter,

    /// Minimum summed check-ins per group
    pub min_check_ins: u32,

    /// Minimum session count per group
    pub min_classes: u32,

    pub exclude_hosted_classes: bool,

    /// Free-text query over class, trainer, location and type
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Trimmed search query, `None` when absent or blank
    pub fn search_query(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

/// Shape of `PipelineResult::rows`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Flat,
    #[default]
    Grouped,
}

named_variants!(ViewMode, "view mode", {
    Flat => "flat",
    Grouped => "grouped",
});

/// Sortable columns of the flat view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Date,
    Time,
    ClassName,
    Trainer,
    Location,
    CheckedIn,
    Capacity,
    Revenue,
    FillRate,
    CancellationRate,
}

named_variants!(SortColumn, "sort column", {
    Date => "date",
    Time => "time",
    ClassName => "class_name",
    Trainer => "trainer",
    Location => "location",
    CheckedIn => "checked_in",
    Capacity => "capacity",
    Revenue => "revenue",
    FillRate => "fill_rate",
    CancellationRate => "cancellation_rate",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

named_variants!(SortDirection, "sort direction", {
    Ascending => "asc",
    Descending => "desc",
});

/// Flat-view ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Everything besides the data that shapes one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    pub criteria: FilterCriteria,
    pub group_by: GroupBy,
    pub view_mode: ViewMode,
    pub ranking: RankingMetric,
    /// Flat-view ordering; `None` keeps filter order
    pub sort: Option<SortSpec>,
}
