//! Single-shot pipeline: classify, filter, group or flatten, rank, total.

use std::time::Instant;

use contracts::{
    ContractError, EngineConfig, PipelineResult, ProcessedRows, ScheduleTable, SessionRecord,
    ViewMode, ViewParams,
};
use metrics::{counter, histogram};
use tracing::{debug, instrument};

use crate::classifier::classify_records;
use crate::filter::{apply_filters, HostedClassMatcher};
use crate::flat::flat_rows;
use crate::grouping::{group_records, GroupThresholds};
use crate::ranking::rank_rows;
use crate::totals::compute_totals;

/// Analytics engine bound to one configuration
///
/// Stateless between calls; every call returns freshly owned output and
/// never touches its inputs.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: EngineConfig,
    hosted: HostedClassMatcher,
}

impl AnalyticsEngine {
    /// Build the engine, compiling the hosted-class keyword pattern
    pub fn new(config: EngineConfig) -> Result<Self, ContractError> {
        let hosted = HostedClassMatcher::from_config(&config.filters)?;
        Ok(Self { config, hosted })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Status classifier pass
    pub fn classify(&self, records: &[SessionRecord], schedule: &ScheduleTable) -> Vec<SessionRecord> {
        classify_records(records, schedule, &self.config.classifier)
    }

    /// Everything after classification
    ///
    /// `classified` must already carry statuses; the status filter reads them.
    #[instrument(
        name = "process_view",
        level = "debug",
        skip_all,
        fields(records = classified.len(), group_by = %params.group_by, view = ?params.view_mode)
    )]
    pub fn process(
        &self,
        classified: &[SessionRecord],
        params: &ViewParams,
    ) -> Result<PipelineResult, ContractError> {
        let weights = &self.config.ranking.composite_weights;
        let filtered = apply_filters(classified, &params.criteria, &self.hosted)?;

        let rows = match params.view_mode {
            ViewMode::Flat => ProcessedRows::Flat(flat_rows(&filtered, params.sort)),
            ViewMode::Grouped => {
                let thresholds = GroupThresholds {
                    min_classes: params.criteria.min_classes,
                    min_check_ins: params.criteria.min_check_ins,
                };
                let grouped = group_records(
                    &filtered,
                    params.group_by,
                    thresholds,
                    &self.config.grouping.key_separator,
                    weights,
                );
                ProcessedRows::Grouped(rank_rows(grouped, params.ranking))
            }
        };

        let totals = compute_totals(&filtered, weights);

        Ok(PipelineResult {
            filtered_records: filtered,
            rows,
            totals,
        })
    }

    /// Full pipeline from raw records
    #[instrument(
        name = "run_pipeline",
        skip_all,
        fields(records = records.len(), schedule = schedule.len())
    )]
    pub fn run(
        &self,
        records: &[SessionRecord],
        schedule: &ScheduleTable,
        params: &ViewParams,
    ) -> Result<PipelineResult, ContractError> {
        let started = Instant::now();
        let classified = self.classify(records, schedule);
        let result = self.process(&classified, params)?;

        histogram!("studio_analytics_pipeline_seconds").record(started.elapsed().as_secs_f64());
        counter!("studio_analytics_records_processed_total").increment(records.len() as u64);
        debug!(
            filtered = result.filtered_records.len(),
            rows = result.rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline finished"
        );

        Ok(result)
    }
}

/// One-off run with a throwaway engine
pub fn run_pipeline(
    records: &[SessionRecord],
    schedule: &ScheduleTable,
    params: &ViewParams,
    config: &EngineConfig,
) -> Result<PipelineResult, ContractError> {
    AnalyticsEngine::new(config.clone())?.run(records, schedule, params)
}
