//! # Integration Tests
//!
//! End-to-end runs across crates:
//! - contract snapshots (wire shape of results)
//! - mock dataset -> orchestrator -> ranked result
//! - JSON files + TOML config -> orchestrator

#[cfg(test)]
mod contract_tests {
    use contracts::{GroupBy, PipelineResult, ProcessedRows, RankingMetric, TotalsRow};

    #[test]
    fn test_result_is_tagged_by_view() {
        let result = PipelineResult {
            filtered_records: vec![],
            rows: ProcessedRows::Grouped(vec![]),
            totals: TotalsRow::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rows"]["view"], "grouped");
        assert!(json["rows"]["rows"].as_array().unwrap().is_empty());
        assert_eq!(json["totals"]["classes"], 0);
    }

    #[test]
    fn test_option_names_round_trip() {
        for mode in GroupBy::ALL {
            assert_eq!(mode.as_str().parse::<GroupBy>().unwrap(), *mode);
        }
        for metric in RankingMetric::ALL {
            assert_eq!(metric.as_str().parse::<RankingMetric>().unwrap(), *metric);
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use analytics_engine::run_pipeline;
    use contracts::{
        EngineConfig, FilterCriteria, GroupBy, NaiveDate, PipelineResult, ProcessedRows,
        RankingMetric, RecordSource, ScheduleSource, ScheduleTable, SessionRecord, SortColumn,
        SortDirection, SortSpec, StatusFilter, ViewMode, ViewParams,
    };
    use ingestion::{JsonFileSource, JsonScheduleSource, MockRecordSource};
    use orchestrator::{PipelineError, RecomputeOrchestrator, Update};

    /// Wait for the outcome of the latest request
    async fn settle(orchestrator: &mut RecomputeOrchestrator) -> Update {
        let latest = orchestrator.latest_seq();
        let wait = async {
            loop {
                match orchestrator.next_update().await {
                    Some(update) if update.seq() == Some(latest) => return update,
                    Some(_) => continue,
                    None => panic!("no update pending for seq {latest}"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("recompute timed out")
    }

    async fn settle_ok(orchestrator: &mut RecomputeOrchestrator) -> Arc<PipelineResult> {
        match settle(orchestrator).await {
            Update::Completed { result, .. } => result,
            Update::Failed(err) => panic!("recompute failed: {err}"),
        }
    }

    fn grouped(result: &PipelineResult) -> &[contracts::GroupedRow] {
        match &result.rows {
            ProcessedRows::Grouped(rows) => rows,
            ProcessedRows::Flat(_) => panic!("expected grouped rows"),
        }
    }

    /// End-to-end test: MockRecordSource -> RecomputeOrchestrator -> ranked groups
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        let source = MockRecordSource::with_seed(11);
        let records = source.load_records().unwrap();
        let schedule = source.schedule_source().load_schedule().unwrap();
        assert!(!records.is_empty());

        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        orchestrator.replace_dataset(records.clone()).unwrap();
        orchestrator.replace_schedule(schedule).unwrap();
        orchestrator
            .set_filters(FilterCriteria {
                exclude_hosted_classes: true,
                ..Default::default()
            })
            .unwrap();
        orchestrator.set_group_by(GroupBy::ClassLocation).unwrap();
        orchestrator.set_ranking(RankingMetric::CompositeScore).unwrap();

        let result = settle_ok(&mut orchestrator).await;
        let rows = grouped(&result);

        // hosted events are gone, everything else survives
        assert!(result
            .filtered_records
            .iter()
            .all(|r| !r.class_name.contains("Hosted")));
        assert!(result.filtered_records.len() < records.len());

        // groups partition the filtered set
        let grouped_sessions: usize = rows.iter().map(|r| r.metrics.classes).sum();
        assert_eq!(grouped_sessions, result.filtered_records.len());
        assert_eq!(result.totals.metrics.classes, result.filtered_records.len());

        // ranks are 1..=N in order
        let ranks: Vec<u32> = rows.iter().filter_map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=rows.len() as u32).collect::<Vec<_>>());
        for pair in rows.windows(2) {
            assert!(pair[0].metrics.composite_score >= pair[1].metrics.composite_score);
        }

        assert_eq!(orchestrator.dataset_len(), records.len());
        assert_eq!(orchestrator.latest().as_deref(), Some(result.as_ref()));
    }

    /// The orchestrated result equals a direct run with the final parameters
    #[tokio::test]
    async fn test_burst_of_requests_matches_direct_run() {
        let source = MockRecordSource::with_seed(3);
        let records = source.records();
        let schedule = source.schedule();
        let config = EngineConfig::default();

        let mut orchestrator = RecomputeOrchestrator::new(config.clone()).unwrap();
        orchestrator.replace_dataset(records.clone()).unwrap();
        orchestrator.replace_schedule(schedule.clone()).unwrap();
        for metric in RankingMetric::ALL {
            orchestrator.set_ranking(*metric).unwrap();
        }
        orchestrator.set_group_by(GroupBy::Trainer).unwrap();
        orchestrator.set_ranking(RankingMetric::TotalRevenue).unwrap();

        let result = settle_ok(&mut orchestrator).await;

        let params = ViewParams {
            group_by: GroupBy::Trainer,
            ranking: RankingMetric::TotalRevenue,
            ..Default::default()
        };
        let direct = run_pipeline(
            &records,
            &ScheduleTable::from_entries(schedule),
            &params,
            &config,
        )
        .unwrap();

        assert_eq!(result.as_ref(), &direct);
        assert_eq!(orchestrator.params(), &params);

        let stats = orchestrator.stats().summary();
        assert!(stats.accepted >= 1);
        assert_eq!(stats.failed, 0);
    }

    /// Active and inactive views split the full set
    #[test]
    fn test_status_filter_partitions_dataset() {
        let source = MockRecordSource::with_seed(5);
        let records = source.records();
        let schedule = ScheduleTable::from_entries(source.schedule());
        let config = EngineConfig::default();

        let count = |status: StatusFilter| {
            let params = ViewParams {
                criteria: FilterCriteria {
                    status,
                    ..Default::default()
                },
                view_mode: ViewMode::Flat,
                ..Default::default()
            };
            run_pipeline(&records, &schedule, &params, &config)
                .unwrap()
                .filtered_records
                .len()
        };

        let all = count(StatusFilter::All);
        assert_eq!(all, records.len());
        assert_eq!(count(StatusFilter::Active) + count(StatusFilter::Inactive), all);
    }

    /// A rejected request leaves the last good result in place
    #[tokio::test]
    async fn test_invalid_criteria_keeps_previous_result() {
        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        orchestrator
            .replace_dataset(MockRecordSource::with_seed(9).records())
            .unwrap();
        let good = settle_ok(&mut orchestrator).await;

        orchestrator
            .set_filters(FilterCriteria {
                date_from: NaiveDate::from_ymd_opt(2026, 4, 1),
                date_to: NaiveDate::from_ymd_opt(2026, 3, 1),
                ..Default::default()
            })
            .unwrap();

        match settle(&mut orchestrator).await {
            Update::Failed(PipelineError::Failed { .. }) => {}
            other => panic!("expected a failed update, got {other:?}"),
        }
        assert_eq!(orchestrator.latest().as_deref(), Some(good.as_ref()));
        assert!(orchestrator.last_error().is_some());
    }

    /// JSON files + TOML config -> orchestrator -> sorted flat view
    #[tokio::test]
    async fn test_json_files_with_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let records_path = dir.path().join("sessions.json");
        let schedule_path = dir.path().join("schedule.json");

        let rows = serde_json::json!([
            {
                "class_name": "Studio Barre 57", "trainer": "Anisha", "location": "Kwality House",
                "date": "2026-03-02", "day_of_week": "Monday", "time": "07:30",
                "capacity": 20, "checked_in": 12, "booked": 14, "late_cancelled": 2,
                "revenue": 11400.0
            },
            {
                "class_name": "Studio Power Cycle", "trainer": "Rohan", "location": "Bandra",
                "date": "2026-03-03", "day_of_week": "Tuesday", "time": "08:00",
                "capacity": 14, "checked_in": 14, "booked": 14, "revenue": 11900.0
            },
            {
                "class_name": "Masterclass with Guest Coach", "trainer": "Karan",
                "location": "Bandra", "date": "2026-03-04", "time": "18:00",
                "capacity": 30, "checked_in": 28
            },
            { "class_name": "no date on this row" }
        ]);
        std::fs::write(&records_path, rows.to_string()).unwrap();

        let schedule = serde_json::json!([
            {
                "day": "Monday", "time": "07:30", "location": "Kwality House",
                "class_name": "Barre 57", "trainer": "Anisha", "capacity": 20, "duration": 57
            }
        ]);
        std::fs::write(&schedule_path, schedule.to_string()).unwrap();

        let config = config_loader::ConfigLoader::load_from_str(
            r#"
[filters]
hosted_keywords = ["masterclass"]
"#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let records: Vec<SessionRecord> = JsonFileSource::new(&records_path).load_records().unwrap();
        assert_eq!(records.len(), 3, "row without a date is dropped");
        let entries = JsonScheduleSource::new(&schedule_path).load_schedule().unwrap();

        let mut orchestrator = RecomputeOrchestrator::new(config).unwrap();
        orchestrator.replace_dataset(records).unwrap();
        orchestrator.replace_schedule(entries).unwrap();
        orchestrator
            .set_filters(FilterCriteria {
                exclude_hosted_classes: true,
                ..Default::default()
            })
            .unwrap();
        orchestrator.set_view_mode(ViewMode::Flat).unwrap();
        orchestrator
            .set_sort(Some(SortSpec {
                column: SortColumn::FillRate,
                direction: SortDirection::Descending,
            }))
            .unwrap();

        let result = settle_ok(&mut orchestrator).await;
        let ProcessedRows::Flat(rows) = &result.rows else {
            panic!("expected flat rows");
        };

        let names: Vec<&str> = rows.iter().map(|r| r.record.class_name.as_str()).collect();
        assert_eq!(names, vec!["Studio Power Cycle", "Studio Barre 57"]);
        assert!((rows[0].metrics.fill_rate - 100.0).abs() < 1e-9);
        assert!((rows[1].metrics.fill_rate - 60.0).abs() < 1e-9);
        assert_eq!(result.totals.metrics.total_check_ins, 26);
        assert_eq!(orchestrator.schedule_len(), 1);
    }
}
