//! PipelineResult - analytics engine output
//!
//! Created fresh on every run; never mutated after delivery.

use serde::{Deserialize, Serialize};

use crate::{GroupKey, SessionRecord};

/// Aggregate metrics over a set of sessions
///
/// Every ratio is zero when its denominator is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub classes: usize,
    pub total_check_ins: u64,
    pub total_capacity: u64,
    pub total_booked: u64,
    pub total_cancellations: u64,
    pub total_waitlisted: u64,
    pub total_revenue: f64,

    /// Check-ins per session
    pub class_avg: f64,

    /// Check-ins per session that had at least one check-in
    pub class_avg_non_empty: f64,

    /// Percent of capacity checked in
    pub fill_rate: f64,

    pub waitlist_rate: f64,

    /// Percent of bookings late-cancelled
    pub cancellation_rate: f64,

    pub rev_per_checkin: f64,
    pub rev_per_booking: f64,
    pub rev_lost_per_cancellation: f64,

    /// Same formula as `fill_rate` at group level
    pub weighted_average: f64,

    pub empty_classes: usize,

    /// 0-100, higher means steadier attendance
    pub consistency_score: f64,

    pub composite_score: f64,
}

/// Single-session ratios shown in the flat view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetrics {
    pub fill_rate: f64,
    pub waitlist_rate: f64,
    pub cancellation_rate: f64,
    pub rev_per_checkin: f64,
    pub rev_per_booking: f64,
    pub rev_lost_per_cancellation: f64,
    pub weighted_average: f64,
}

/// One record of the flat view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub record: SessionRecord,
    pub metrics: RecordMetrics,
}

/// Aggregate over one group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub key: GroupKey,

    /// Display form of `key`
    pub group_value: String,

    /// Constituent sessions in encounter order
    pub children: Vec<SessionRecord>,

    pub metrics: GroupMetrics,

    /// 1-based, assigned by the ranking engine
    pub rank: Option<u32>,
}

/// Processed rows, tagged by view mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", content = "rows", rename_all = "snake_case")]
pub enum ProcessedRows {
    Flat(Vec<FlatRow>),
    Grouped(Vec<GroupedRow>),
}

impl ProcessedRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(rows) => rows.len(),
            Self::Grouped(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Grand totals over the filtered record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsRow {
    #[serde(flatten)]
    pub metrics: GroupMetrics,
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub filtered_records: Vec<SessionRecord>,
    pub rows: ProcessedRows,
    pub totals: TotalsRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_rows_len() {
        assert!(ProcessedRows::Flat(vec![]).is_empty());
        assert_eq!(ProcessedRows::Grouped(vec![]).len(), 0);
    }

    #[test]
    fn totals_serialize_flat() {
        let totals = TotalsRow {
            metrics: GroupMetrics {
                classes: 3,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["classes"], 3);
    }
}
