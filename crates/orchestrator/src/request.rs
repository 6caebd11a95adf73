//! Change requests and the jobs sent to the worker.

use std::sync::Arc;

use contracts::{
    ActiveScheduleEntry, FilterCriteria, GroupBy, RankingMetric, ScheduleTable, SessionRecord,
    SortSpec, ViewMode, ViewParams,
};

/// A change event from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// New raw dataset; re-classifies
    ReplaceDataset(Vec<SessionRecord>),
    /// New active schedule; re-classifies the loaded dataset
    ReplaceSchedule(Vec<ActiveScheduleEntry>),
    SetFilters(FilterCriteria),
    SetGroupBy(GroupBy),
    SetViewMode(ViewMode),
    SetRanking(RankingMetric),
    SetSort(Option<SortSpec>),
    /// Re-run with unchanged inputs, re-classifying against the current date
    Refresh,
}

impl Request {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReplaceDataset(_) => "replace_dataset",
            Self::ReplaceSchedule(_) => "replace_schedule",
            Self::SetFilters(_) => "set_filters",
            Self::SetGroupBy(_) => "set_group_by",
            Self::SetViewMode(_) => "set_view_mode",
            Self::SetRanking(_) => "set_ranking",
            Self::SetSort(_) => "set_sort",
            Self::Refresh => "refresh",
        }
    }
}

/// Self-contained snapshot of everything one pipeline run needs
///
/// Dataset and schedule are shared read-only; the worker never sees
/// producer-owned mutable state.
#[derive(Debug, Clone)]
pub struct RecomputeJob {
    pub seq: u64,
    pub kind: &'static str,
    pub dataset: Arc<Vec<SessionRecord>>,
    /// Bumped on every dataset replacement
    pub dataset_generation: u64,
    pub schedule: Arc<ScheduleTable>,
    /// Bumped on every schedule replacement
    pub schedule_generation: u64,
    /// Bumped on every [`Request::Refresh`]
    pub refresh_generation: u64,
    pub params: ViewParams,
}
