//! Rank grouped rows by a selectable metric.
//!
//! Order: metric (descending, or ascending for lower-is-better metrics),
//! then total check-ins descending, then group value ascending. Ranks are
//! 1..=N with no gaps and no shared numbers.

use std::cmp::Ordering;

use contracts::{GroupMetrics, GroupedRow, RankingMetric};
use tracing::instrument;

/// Value of `metric` on a row
pub fn metric_value(metrics: &GroupMetrics, metric: RankingMetric) -> f64 {
    match metric {
        RankingMetric::ClassAvg => metrics.class_avg,
        RankingMetric::FillRate => metrics.fill_rate,
        RankingMetric::TotalCheckIns => metrics.total_check_ins as f64,
        RankingMetric::TotalRevenue => metrics.total_revenue,
        RankingMetric::RevPerCheckin => metrics.rev_per_checkin,
        RankingMetric::ConsistencyScore => metrics.consistency_score,
        RankingMetric::CancellationRate => metrics.cancellation_rate,
        RankingMetric::Classes => metrics.classes as f64,
        RankingMetric::EmptyClasses => metrics.empty_classes as f64,
        RankingMetric::CompositeScore => metrics.composite_score,
    }
}

/// Total order used for ranking
pub fn compare_rows(a: &GroupedRow, b: &GroupedRow, metric: RankingMetric) -> Ordering {
    let va = metric_value(&a.metrics, metric);
    let vb = metric_value(&b.metrics, metric);
    let primary = if metric.lower_is_better() {
        va.total_cmp(&vb)
    } else {
        vb.total_cmp(&va)
    };

    primary
        .then_with(|| b.metrics.total_check_ins.cmp(&a.metrics.total_check_ins))
        .then_with(|| a.group_value.cmp(&b.group_value))
}

/// Sort and assign ranks, consuming the unranked rows
///
/// Stable, so rows equal on every key keep their incoming order; re-ranking
/// an already ranked set reproduces it.
#[instrument(name = "rank_rows", level = "debug", skip(rows), fields(rows = rows.len()))]
pub fn rank_rows(mut rows: Vec<GroupedRow>, metric: RankingMetric) -> Vec<GroupedRow> {
    rows.sort_by(|a, b| compare_rows(a, b, metric));
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = Some(position as u32 + 1);
    }
    rows
}
