//! Flat (ungrouped) view rows.

use std::cmp::Ordering;

use contracts::{FlatRow, SessionRecord, SortColumn, SortDirection, SortSpec};

use crate::calculator::record_metrics;

/// Build flat rows in filter order, then apply `sort` if given
pub fn flat_rows(records: &[SessionRecord], sort: Option<SortSpec>) -> Vec<FlatRow> {
    let mut rows: Vec<FlatRow> = records
        .iter()
        .map(|record| FlatRow {
            record: record.clone(),
            metrics: record_metrics(record),
        })
        .collect();

    if let Some(spec) = sort {
        rows.sort_by(|a, b| {
            let ordering = compare_column(a, b, spec.column);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

fn compare_column(a: &FlatRow, b: &FlatRow, column: SortColumn) -> Ordering {
    let (ra, rb) = (&a.record, &b.record);
    match column {
        SortColumn::Date => ra.date.cmp(&rb.date),
        SortColumn::Time => ra.time.cmp(&rb.time),
        SortColumn::ClassName => ra.class_name.cmp(&rb.class_name),
        SortColumn::Trainer => ra.trainer.cmp(&rb.trainer),
        SortColumn::Location => ra.location.cmp(&rb.location),
        SortColumn::CheckedIn => ra.checked_in.cmp(&rb.checked_in),
        SortColumn::Capacity => ra.capacity.cmp(&rb.capacity),
        SortColumn::Revenue => ra.revenue.total_cmp(&rb.revenue),
        SortColumn::FillRate => a.metrics.fill_rate.total_cmp(&b.metrics.fill_rate),
        SortColumn::CancellationRate => a
            .metrics
            .cancellation_rate
            .total_cmp(&b.metrics.cancellation_rate),
    }
}
