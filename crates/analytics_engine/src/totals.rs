//! Grand totals over the filtered set.

use contracts::{CompositeWeights, SessionRecord, TotalsRow};

use crate::calculator::group_metrics;

/// One totals row over `records`, independent of grouping
///
/// The whole filtered set is treated as a single group, so every ratio
/// follows the per-group formulas.
pub fn compute_totals(records: &[SessionRecord], weights: &CompositeWeights) -> TotalsRow {
    TotalsRow {
        metrics: group_metrics(records, weights),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::NaiveDate;

    fn session(checked_in: u32, capacity: u32, booked: u32, late_cancelled: u32, revenue: f64) -> SessionRecord {
        let mut record = SessionRecord::new("Cycle", NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        record.checked_in = checked_in;
        record.capacity = capacity;
        record.booked = booked;
        record.late_cancelled = late_cancelled;
        record.revenue = revenue;
        record
    }

    #[test]
    fn sums_match_records() {
        let records = vec![session(10, 20, 12, 2, 500.0), session(0, 15, 3, 1, 0.0), session(18, 20, 20, 0, 900.0)];
        let totals = compute_totals(&records, &CompositeWeights::default());
        let m = &totals.metrics;
        assert_eq!(m.classes, 3);
        assert_eq!(m.total_check_ins, 28);
        assert_eq!(m.total_capacity, 55);
        assert_eq!(m.total_booked, 35);
        assert_eq!(m.total_cancellations, 3);
        assert!((m.total_revenue - 1400.0).abs() < 1e-9);
        assert!((m.fill_rate - 28.0 / 55.0 * 100.0).abs() < 1e-9);
        assert!((m.rev_per_checkin - 50.0).abs() < 1e-9);
        assert_eq!(m.empty_classes, 1);
    }

    #[test]
    fn empty_set_is_all_zero() {
        let totals = compute_totals(&[], &CompositeWeights::default());
        assert_eq!(totals.metrics.classes, 0);
        assert_eq!(totals.metrics.class_avg, 0.0);
        assert_eq!(totals.metrics.fill_rate, 0.0);
    }
}
