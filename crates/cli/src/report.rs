//! Plain-text rendering of a pipeline result.

use contracts::{FlatRow, GroupMetrics, GroupedRow, PipelineResult, ProcessedRows};

/// Print rows (first `top`, 0 = all) followed by the totals row
pub fn print_result(result: &PipelineResult, top: usize) {
    let limit = if top == 0 { usize::MAX } else { top };

    match &result.rows {
        ProcessedRows::Grouped(rows) => print_grouped(rows, limit),
        ProcessedRows::Flat(rows) => print_flat(rows, limit),
    }

    if result.rows.len() > limit {
        println!("  ... {} more rows", result.rows.len() - limit);
    }

    println!();
    print_totals(&result.totals.metrics, result.filtered_records.len());
    println!();
}

fn print_grouped(rows: &[GroupedRow], limit: usize) {
    println!("\n=== Ranked Groups ({}) ===\n", rows.len());
    println!(
        "{:>4}  {:<48} {:>5} {:>7} {:>7} {:>7} {:>7} {:>11} {:>6} {:>6}",
        "#", "group", "cls", "checkin", "avg", "fill%", "canc%", "revenue", "cons", "comp"
    );
    for row in rows.iter().take(limit) {
        let m = &row.metrics;
        println!(
            "{:>4}  {:<48} {:>5} {:>7} {:>7.1} {:>7.1} {:>7.1} {:>11.0} {:>6.1} {:>6.1}",
            row.rank.unwrap_or_default(),
            truncate(&row.group_value, 48),
            m.classes,
            m.total_check_ins,
            m.class_avg,
            m.fill_rate,
            m.cancellation_rate,
            m.total_revenue,
            m.consistency_score,
            m.composite_score,
        );
    }
}

fn print_flat(rows: &[FlatRow], limit: usize) {
    println!("\n=== Sessions ({}) ===\n", rows.len());
    println!(
        "{:<10} {:<5}  {:<24} {:<14} {:<18} {:>9} {:>7} {:>7} {:>9}",
        "date", "time", "class", "trainer", "location", "in/cap", "fill%", "canc%", "revenue"
    );
    for row in rows.iter().take(limit) {
        let r = &row.record;
        println!(
            "{:<10} {:<5}  {:<24} {:<14} {:<18} {:>9} {:>7.1} {:>7.1} {:>9.0}",
            r.date.format("%Y-%m-%d"),
            truncate(&r.time, 5),
            truncate(&r.class_name, 24),
            truncate(&r.trainer, 14),
            truncate(&r.location, 18),
            format!("{}/{}", r.checked_in, r.capacity),
            row.metrics.fill_rate,
            row.metrics.cancellation_rate,
            r.revenue,
        );
    }
}

fn print_totals(m: &GroupMetrics, filtered: usize) {
    println!("=== Totals ({filtered} sessions) ===");
    println!(
        "  Check-ins: {} / capacity {} (fill {:.1}%)",
        m.total_check_ins, m.total_capacity, m.fill_rate
    );
    println!(
        "  Class avg: {:.2} (non-empty {:.2}), empty sessions: {}",
        m.class_avg, m.class_avg_non_empty, m.empty_classes
    );
    println!(
        "  Bookings: {}, late cancels: {} ({:.1}%), waitlisted: {}",
        m.total_booked, m.total_cancellations, m.cancellation_rate, m.total_waitlisted
    );
    println!(
        "  Revenue: {:.0} ({:.1}/check-in, {:.1} lost to cancellations)",
        m.total_revenue, m.rev_per_checkin, m.rev_lost_per_cancellation
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
