//! `info` command implementation.

use std::collections::{BTreeMap, BTreeSet};

use analytics_engine::AnalyticsEngine;
use anyhow::{Context, Result};
use contracts::{
    weekday_name, ActiveScheduleEntry, NaiveDate, ScheduleTable, SessionRecord, WEEK,
};
use serde::Serialize;
use tracing::info;

use super::{load_engine_config, load_inputs};
use crate::cli::InfoArgs;

/// Dataset summary for JSON output
#[derive(Debug, Serialize)]
struct DatasetInfo {
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_date: Option<NaiveDate>,
    statuses: BTreeMap<String, usize>,
    trainers: usize,
    locations: Vec<String>,
    class_names: usize,
    class_types: Vec<String>,
    total_check_ins: u64,
    total_revenue: f64,
    schedule: Option<ScheduleInfo>,
}

#[derive(Debug, Serialize)]
struct ScheduleInfo {
    entries: usize,
    rejected: usize,
    per_day: BTreeMap<String, usize>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = load_engine_config(&args.source)?;
    let (records, schedule) = load_inputs(&args.source)?;

    let engine = AnalyticsEngine::new(config).context("Invalid engine configuration")?;
    let summary = summarize(&engine, &records, schedule);

    info!(records = summary.records, "dataset summarized");

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize dataset info")?;
        println!("{json}");
    } else {
        print_info(&summary);
    }

    Ok(())
}

fn summarize(
    engine: &AnalyticsEngine,
    records: &[SessionRecord],
    schedule: Option<Vec<ActiveScheduleEntry>>,
) -> DatasetInfo {
    let table = schedule.map(ScheduleTable::from_entries).unwrap_or_default();
    let classified = engine.classify(records, &table);

    let mut statuses = BTreeMap::new();
    for record in &classified {
        *statuses.entry(record.status().as_str().to_string()).or_insert(0) += 1;
    }

    let distinct = |field: fn(&SessionRecord) -> &str| -> BTreeSet<String> {
        records
            .iter()
            .map(field)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .collect()
    };

    let schedule = (!table.is_empty() || table.rejected() > 0).then(|| {
        let per_day = WEEK
            .iter()
            .map(|&day| (weekday_name(day).to_string(), table.bucket(day).len()))
            .filter(|(_, count)| *count > 0)
            .collect();
        ScheduleInfo {
            entries: table.len(),
            rejected: table.rejected(),
            per_day,
        }
    });

    DatasetInfo {
        records: records.len(),
        first_date: records.iter().map(|r| r.date).min(),
        last_date: records.iter().map(|r| r.date).max(),
        statuses,
        trainers: distinct(|r| r.trainer.as_str()).len(),
        locations: distinct(|r| r.location.as_str()).into_iter().collect(),
        class_names: distinct(|r| r.class_name.as_str()).len(),
        class_types: distinct(|r| r.class_type.as_str()).into_iter().collect(),
        total_check_ins: records.iter().map(|r| u64::from(r.checked_in)).sum(),
        total_revenue: records.iter().map(|r| r.revenue).sum(),
        schedule,
    }
}

fn print_info(summary: &DatasetInfo) {
    println!("\n=== Dataset ===\n");
    println!("  Sessions: {}", summary.records);
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("  Dates: {first} .. {last}");
    }
    println!("  Check-ins: {}", summary.total_check_ins);
    println!("  Revenue: {:.0}", summary.total_revenue);
    println!("  Trainers: {}", summary.trainers);
    println!("  Class names: {}", summary.class_names);
    println!("  Class types: {}", summary.class_types.join(", "));
    println!("  Locations: {}", summary.locations.join(", "));

    println!("\n  Status:");
    for (status, count) in &summary.statuses {
        println!("    {status:<10} {count}");
    }

    match &summary.schedule {
        Some(schedule) => {
            println!("\n=== Schedule ===\n");
            println!("  Entries: {}", schedule.entries);
            if schedule.rejected > 0 {
                println!("  Rejected (bad weekday): {}", schedule.rejected);
            }
            for (day, count) in &schedule.per_day {
                println!("    {day:<10} {count}");
            }
        }
        None => println!("\n  No schedule loaded; status uses the recency fallback"),
    }
    println!();
}
