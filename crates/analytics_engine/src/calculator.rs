//! Derived per-group and per-record metrics.
//!
//! Every division goes through [`safe_div`], so zero denominators produce 0
//! and no metric is ever NaN or infinite.

use contracts::{CompositeWeights, GroupMetrics, RecordMetrics, SessionRecord};

/// `numerator / denominator`, 0 when the denominator is 0
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `numerator / denominator * 100`, 0 when the denominator is 0
#[inline]
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    safe_div(numerator, denominator) * 100.0
}

/// Attendance stability on a 0-100 scale
///
/// Coefficient of variation (population std / mean, 0 when the mean is 0)
/// mapped as `100 * (1 - min(cv, 1))`.
pub fn consistency_score(check_ins: &[u32]) -> f64 {
    if check_ins.is_empty() {
        return 0.0;
    }

    let n = check_ins.len() as f64;
    let mean = check_ins.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = check_ins
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let cv = safe_div(variance.sqrt(), mean);

    (100.0 * (1.0 - cv.min(1.0))).clamp(0.0, 100.0)
}

/// Weighted blend of fill, consistency, retention and demand, never negative
pub fn composite_score(metrics: &GroupMetrics, weights: &CompositeWeights) -> f64 {
    let retention = (100.0 - metrics.cancellation_rate).max(0.0);
    let demand = metrics.waitlist_rate.min(100.0);
    let score = metrics.fill_rate * weights.fill_rate
        + metrics.consistency_score * weights.consistency
        + retention * weights.retention
        + demand * weights.demand;
    score.max(0.0)
}

/// Aggregate metrics over `records`
pub fn group_metrics(records: &[SessionRecord], weights: &CompositeWeights) -> GroupMetrics {
    let mut metrics = GroupMetrics {
        classes: records.len(),
        ..Default::default()
    };

    let mut non_empty = 0usize;
    for record in records {
        metrics.total_check_ins += u64::from(record.checked_in);
        metrics.total_capacity += u64::from(record.capacity);
        metrics.total_booked += u64::from(record.booked);
        metrics.total_cancellations += u64::from(record.late_cancelled);
        metrics.total_waitlisted += u64::from(record.waitlisted);
        metrics.total_revenue += sanitize_revenue(record.revenue);
        if record.checked_in > 0 {
            non_empty += 1;
        }
    }

    let check_ins = metrics.total_check_ins as f64;
    let capacity = metrics.total_capacity as f64;
    let booked = metrics.total_booked as f64;
    let cancellations = metrics.total_cancellations as f64;
    let revenue = metrics.total_revenue;

    metrics.class_avg = safe_div(check_ins, metrics.classes as f64);
    metrics.class_avg_non_empty = safe_div(check_ins, non_empty as f64);
    metrics.fill_rate = percentage(check_ins, capacity);
    metrics.waitlist_rate = percentage(metrics.total_waitlisted as f64, capacity);
    metrics.cancellation_rate = percentage(cancellations, booked);
    metrics.rev_per_checkin = safe_div(revenue, check_ins);
    metrics.rev_per_booking = safe_div(revenue, booked);
    metrics.rev_lost_per_cancellation = cancellations * metrics.rev_per_booking;
    metrics.weighted_average = percentage(check_ins, capacity);
    metrics.empty_classes = records.len() - non_empty;

    let per_session: Vec<u32> = records.iter().map(|record| record.checked_in).collect();
    metrics.consistency_score = consistency_score(&per_session);
    metrics.composite_score = composite_score(&metrics, weights);

    metrics
}

/// Ratios of a single session
pub fn record_metrics(record: &SessionRecord) -> RecordMetrics {
    let check_ins = f64::from(record.checked_in);
    let capacity = f64::from(record.capacity);
    let booked = f64::from(record.booked);
    let cancellations = f64::from(record.late_cancelled);
    let revenue = sanitize_revenue(record.revenue);
    let rev_per_booking = safe_div(revenue, booked);

    RecordMetrics {
        fill_rate: percentage(check_ins, capacity),
        waitlist_rate: percentage(f64::from(record.waitlisted), capacity),
        cancellation_rate: percentage(cancellations, booked),
        rev_per_checkin: safe_div(revenue, check_ins),
        rev_per_booking,
        rev_lost_per_cancellation: cancellations * rev_per_booking,
        weighted_average: percentage(check_ins, capacity),
    }
}

/// Non-finite or negative revenue counts as zero
fn sanitize_revenue(revenue: f64) -> f64 {
    if revenue.is_finite() && revenue > 0.0 {
        revenue
    } else {
        0.0
    }
}
