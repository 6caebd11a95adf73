//! Partition records by composite key.

use std::collections::HashMap;

use contracts::{CompositeWeights, GroupBy, GroupKey, GroupedRow, SessionRecord};
use tracing::{debug, instrument};

use crate::calculator::group_metrics;

/// Post-grouping thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupThresholds {
    /// Groups with fewer sessions are dropped
    pub min_classes: u32,
    /// Groups with fewer summed check-ins are dropped
    pub min_check_ins: u32,
}

/// Group `records` under `group_by`
///
/// Single pass; children keep encounter order and groups keep first-seen
/// order. Groups below `thresholds` are dropped after all records are
/// consumed. Rows come back unranked with metrics filled in.
#[instrument(
    name = "group_records",
    level = "debug",
    skip(records, separator, weights),
    fields(records = records.len())
)]
pub fn group_records(
    records: &[SessionRecord],
    group_by: GroupBy,
    thresholds: GroupThresholds,
    separator: &str,
    weights: &CompositeWeights,
) -> Vec<GroupedRow> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Vec<SessionRecord>)> = Vec::new();

    for record in records {
        let key = group_by.key_for(record);
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(record.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![record.clone()]));
            }
        }
    }

    let total_groups = groups.len();
    let rows: Vec<GroupedRow> = groups
        .into_iter()
        .filter(|(_, children)| passes_thresholds(children, thresholds))
        .map(|(key, children)| {
            let metrics = group_metrics(&children, weights);
            GroupedRow {
                group_value: key.display(separator),
                key,
                children,
                metrics,
                rank: None,
            }
        })
        .collect();

    debug!(
        groups = total_groups,
        kept = rows.len(),
        min_classes = thresholds.min_classes,
        min_check_ins = thresholds.min_check_ins,
        "records grouped"
    );

    rows
}

fn passes_thresholds(children: &[SessionRecord], thresholds: GroupThresholds) -> bool {
    let check_ins: u64 = children.iter().map(|r| u64::from(r.checked_in)).sum();
    children.len() as u64 >= u64::from(thresholds.min_classes)
        && check_ins >= u64::from(thresholds.min_check_ins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::NaiveDate;

    fn session(class_name: &str, location: &str, day: u32, checked_in: u32) -> SessionRecord {
        let mut record =
            SessionRecord::new(class_name, NaiveDate::from_ymd_opt(2026, 3, day).unwrap());
        record.location = location.into();
        record.time = "07:30".into();
        record.capacity = 20;
        record.checked_in = checked_in;
        record
    }

    fn group(records: &[SessionRecord], group_by: GroupBy, thresholds: GroupThresholds) -> Vec<GroupedRow> {
        group_records(records, group_by, thresholds, " | ", &CompositeWeights::default())
    }

    #[test]
    fn first_seen_order_and_child_order() {
        let records = vec![
            session("Cycle", "Bandra", 2, 5),
            session("Barre", "Kwality", 2, 10),
            session("Cycle", "Kwality", 9, 7),
            session("Barre", "Bandra", 9, 12),
        ];
        let rows = group(&records, GroupBy::Class, GroupThresholds::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group_value, "Cycle");
        assert_eq!(rows[1].group_value, "Barre");
        assert_eq!(rows[0].children, vec![records[0].clone(), records[2].clone()]);
        assert!(rows.iter().all(|row| row.rank.is_none()));
    }

    #[test]
    fn flattening_reproduces_input() {
        let records = vec![
            session("Cycle", "Bandra", 2, 5),
            session("Barre", "Kwality", 2, 10),
            session("Cycle", "Kwality", 9, 7),
        ];
        let rows = group(&records, GroupBy::Class, GroupThresholds::default());
        let mut flattened: Vec<_> = rows.into_iter().flat_map(|row| row.children).collect();
        let mut expected = records.clone();
        let by_identity = |a: &SessionRecord, b: &SessionRecord| {
            (&a.class_name, &a.location, a.date).cmp(&(&b.class_name, &b.location, b.date))
        };
        flattened.sort_by(by_identity);
        expected.sort_by(by_identity);
        assert_eq!(flattened, expected);
    }

    #[test]
    fn min_classes_drops_small_groups() {
        let records = vec![
            session("Cycle", "Bandra", 2, 5),
            session("Barre", "Kwality", 2, 10),
            session("Barre", "Kwality", 9, 10),
        ];
        let rows = group(
            &records,
            GroupBy::Class,
            GroupThresholds {
                min_classes: 2,
                min_check_ins: 0,
            },
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_value, "Barre");
    }

    #[test]
    fn min_check_ins_drops_quiet_groups() {
        let records = vec![session("Cycle", "Bandra", 2, 5), session("Barre", "Kwality", 2, 10)];
        let rows = group(
            &records,
            GroupBy::Class,
            GroupThresholds {
                min_classes: 0,
                min_check_ins: 6,
            },
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_value, "Barre");
    }

    #[test]
    fn composite_key_display() {
        let records = vec![session("Barre", "Kwality", 2, 10)];
        let rows = group(&records, GroupBy::ClassDayTimeLocation, GroupThresholds::default());
        assert_eq!(rows[0].group_value, "Barre | Monday | 07:30 | Kwality");
        assert_eq!(rows[0].key.values().len(), 4);
    }

    #[test]
    fn metrics_are_filled() {
        let records = vec![session("Barre", "Kwality", 2, 10), session("Barre", "Kwality", 9, 20)];
        let rows = group(&records, GroupBy::Class, GroupThresholds::default());
        assert_eq!(rows[0].metrics.classes, 2);
        assert_eq!(rows[0].metrics.total_check_ins, 30);
        assert!((rows[0].metrics.fill_rate - 75.0).abs() < 1e-9);
    }
}
