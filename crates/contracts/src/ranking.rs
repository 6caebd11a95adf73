//! Ranking metric selection

use serde::{Deserialize, Serialize};

/// Metric grouped rows are ranked by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    ClassAvg,
    FillRate,
    TotalCheckIns,
    TotalRevenue,
    RevPerCheckin,
    ConsistencyScore,
    CancellationRate,
    Classes,
    EmptyClasses,
    CompositeScore,
}

named_variants!(RankingMetric, "ranking metric", {
    ClassAvg => "class_avg",
    FillRate => "fill_rate",
    TotalCheckIns => "total_check_ins",
    TotalRevenue => "total_revenue",
    RevPerCheckin => "rev_per_checkin",
    ConsistencyScore => "consistency_score",
    CancellationRate => "cancellation_rate",
    Classes => "classes",
    EmptyClasses => "empty_classes",
    CompositeScore => "composite_score",
});

impl RankingMetric {
    /// Metrics ranked ascending
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Self::CancellationRate | Self::EmptyClasses)
    }
}
