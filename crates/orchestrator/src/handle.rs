//! RecomputeOrchestrator - producer side of the recompute worker
//!
//! Owns the canonical dataset, schedule and view parameters. Every change
//! request snapshots them into a [`RecomputeJob`] and drops it into a
//! single-slot mailbox; a pending job that has not been picked up yet is
//! evicted by the newer one. Results carry the job's sequence number and
//! only the latest submitted sequence number is ever surfaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use analytics_engine::AnalyticsEngine;
use async_channel::{Receiver, Sender, TryRecvError, TrySendError};
use contracts::{
    ActiveScheduleEntry, ContractError, EngineConfig, FilterCriteria, GroupBy, OrchestratorConfig,
    PipelineResult, RankingMetric, ScheduleTable, SessionRecord, SortSpec, ViewMode, ViewParams,
};
use observability::{RunOutcome, RunStatsAggregator};
use tracing::{debug, error, instrument, warn};

use crate::error::PipelineError;
use crate::request::{RecomputeJob, Request};
use crate::watchdog::{self, InFlight};
use crate::worker::{self, Delivery, EngineRunner, PipelineRunner};

/// Producer-side view of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    /// No request outstanding
    Idle,
    /// The latest request is queued or running
    Running,
    /// A newer request arrived while an older one was outstanding
    Stale,
}

/// Outcome of the latest request
#[derive(Debug, Clone)]
pub enum Update {
    Completed {
        seq: u64,
        result: Arc<PipelineResult>,
    },
    Failed(PipelineError),
}

impl Update {
    pub fn seq(&self) -> Option<u64> {
        match self {
            Self::Completed { seq, .. } => Some(*seq),
            Self::Failed(err) => err.seq(),
        }
    }
}

/// Recompute orchestrator
///
/// Submitting never blocks. Only one producer is supported: all methods take
/// `&mut self`.
pub struct RecomputeOrchestrator {
    jobs: Sender<RecomputeJob>,
    /// Producer-held receiver, used to evict a pending job
    pending: Receiver<RecomputeJob>,
    deliveries: Receiver<Delivery>,

    dataset: Arc<Vec<SessionRecord>>,
    dataset_generation: u64,
    schedule: Arc<ScheduleTable>,
    schedule_generation: u64,
    refresh_generation: u64,
    params: ViewParams,

    latest_seq: u64,
    state: OrchestratorState,
    latest: Option<Arc<PipelineResult>>,
    last_error: Option<PipelineError>,
    stats: RunStatsAggregator,

    in_flight: Arc<InFlight>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    watchdog: Option<JoinHandle<()>>,
}

impl RecomputeOrchestrator {
    /// Start a worker running the analytics engine
    pub fn new(config: EngineConfig) -> Result<Self, ContractError> {
        let orchestrator_config = config.orchestrator.clone();
        let engine = AnalyticsEngine::new(config)?;
        Self::with_runner(EngineRunner::new(engine), &orchestrator_config)
    }

    /// Start a worker with a custom runner
    pub fn with_runner<R: PipelineRunner>(
        runner: R,
        config: &OrchestratorConfig,
    ) -> Result<Self, ContractError> {
        let (jobs, pending) = async_channel::bounded(1);
        let (delivery_tx, deliveries) = async_channel::unbounded();
        let in_flight = Arc::new(InFlight::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker = worker::spawn(runner, pending.clone(), delivery_tx, Arc::clone(&in_flight))?;
        let watchdog = watchdog::spawn(
            Arc::clone(&in_flight),
            Arc::clone(&shutdown),
            Duration::from_secs(config.watchdog_threshold_secs),
            Duration::from_millis(config.watchdog_poll_ms),
        )?;

        Ok(Self {
            jobs,
            pending,
            deliveries,
            dataset: Arc::new(Vec::new()),
            dataset_generation: 0,
            schedule: Arc::new(ScheduleTable::default()),
            schedule_generation: 0,
            refresh_generation: 0,
            params: ViewParams::default(),
            latest_seq: 0,
            state: OrchestratorState::Idle,
            latest: None,
            last_error: None,
            stats: RunStatsAggregator::new(),
            in_flight,
            shutdown,
            worker: Some(worker),
            watchdog: Some(watchdog),
        })
    }

    /// Apply a change and schedule a recompute, returning its sequence number
    #[instrument(name = "submit_request", skip_all, fields(kind = request.kind()))]
    pub fn submit(&mut self, request: Request) -> Result<u64, PipelineError> {
        if !self.worker_alive() {
            return Err(PipelineError::WorkerUnavailable);
        }

        let kind = request.kind();
        self.apply(request);

        let seq = self.latest_seq + 1;
        self.latest_seq = seq;
        self.enqueue(RecomputeJob {
            seq,
            kind,
            dataset: Arc::clone(&self.dataset),
            dataset_generation: self.dataset_generation,
            schedule: Arc::clone(&self.schedule),
            schedule_generation: self.schedule_generation,
            refresh_generation: self.refresh_generation,
            params: self.params.clone(),
        })?;

        self.state = match self.state {
            OrchestratorState::Idle => OrchestratorState::Running,
            OrchestratorState::Running | OrchestratorState::Stale => OrchestratorState::Stale,
        };
        observability::record_request_submitted(kind);
        debug!(seq, state = ?self.state, "request submitted");

        Ok(seq)
    }

    pub fn replace_dataset(&mut self, records: Vec<SessionRecord>) -> Result<u64, PipelineError> {
        self.submit(Request::ReplaceDataset(records))
    }

    /// Load a new schedule; the current dataset is re-classified against it
    pub fn replace_schedule(
        &mut self,
        entries: Vec<ActiveScheduleEntry>,
    ) -> Result<u64, PipelineError> {
        self.submit(Request::ReplaceSchedule(entries))
    }

    pub fn set_filters(&mut self, criteria: FilterCriteria) -> Result<u64, PipelineError> {
        self.submit(Request::SetFilters(criteria))
    }

    pub fn set_group_by(&mut self, group_by: GroupBy) -> Result<u64, PipelineError> {
        self.submit(Request::SetGroupBy(group_by))
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> Result<u64, PipelineError> {
        self.submit(Request::SetViewMode(view_mode))
    }

    pub fn set_ranking(&mut self, metric: RankingMetric) -> Result<u64, PipelineError> {
        self.submit(Request::SetRanking(metric))
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<u64, PipelineError> {
        self.submit(Request::SetSort(sort))
    }

    pub fn refresh(&mut self) -> Result<u64, PipelineError> {
        self.submit(Request::Refresh)
    }

    /// Wait for the outcome of the latest request
    ///
    /// Stale results are discarded on the way. Returns `None` right away when
    /// nothing is outstanding.
    pub async fn next_update(&mut self) -> Option<Update> {
        while self.state != OrchestratorState::Idle {
            match self.deliveries.recv().await {
                Ok(delivery) => {
                    if let Some(update) = self.absorb(delivery) {
                        return Some(update);
                    }
                }
                Err(_) => return Some(self.worker_lost()),
            }
        }
        None
    }

    /// Non-blocking [`Self::next_update`]
    pub fn try_next_update(&mut self) -> Option<Update> {
        while self.state != OrchestratorState::Idle {
            match self.deliveries.try_recv() {
                Ok(delivery) => {
                    if let Some(update) = self.absorb(delivery) {
                        return Some(update);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => return Some(self.worker_lost()),
            }
        }
        None
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Last accepted result; kept across failures
    pub fn latest(&self) -> Option<Arc<PipelineResult>> {
        self.latest.clone()
    }

    /// Failure of the latest request, cleared by the next success
    pub fn last_error(&self) -> Option<&PipelineError> {
        self.last_error.as_ref()
    }

    /// Sequence number of the most recent submission (0 before any)
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset.len()
    }

    pub fn schedule_len(&self) -> usize {
        self.schedule.len()
    }

    pub fn stats(&self) -> &RunStatsAggregator {
        &self.stats
    }

    /// Runs the watchdog has flagged as exceeding the threshold
    pub fn slow_runs(&self) -> u64 {
        self.in_flight.slow_runs()
    }

    fn apply(&mut self, request: Request) {
        match request {
            Request::ReplaceDataset(records) => {
                self.dataset = Arc::new(records);
                self.dataset_generation += 1;
            }
            Request::ReplaceSchedule(entries) => {
                let table = ScheduleTable::from_entries(entries);
                if table.rejected() > 0 {
                    warn!(
                        rejected = table.rejected(),
                        kept = table.len(),
                        "schedule entries with unknown weekday dropped"
                    );
                }
                self.schedule = Arc::new(table);
                self.schedule_generation += 1;
            }
            Request::SetFilters(criteria) => self.params.criteria = criteria,
            Request::SetGroupBy(group_by) => self.params.group_by = group_by,
            Request::SetViewMode(view_mode) => self.params.view_mode = view_mode,
            Request::SetRanking(metric) => self.params.ranking = metric,
            Request::SetSort(sort) => self.params.sort = sort,
            Request::Refresh => self.refresh_generation += 1,
        }
    }

    fn enqueue(&self, job: RecomputeJob) -> Result<(), PipelineError> {
        match self.jobs.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(job)) => {
                // drop-oldest: the worker has not taken the pending job yet
                if let Ok(evicted) = self.pending.try_recv() {
                    observability::record_request_superseded();
                    debug!(evicted = evicted.seq, by = job.seq, "pending request superseded");
                }
                self.jobs
                    .try_send(job)
                    .map_err(|_| PipelineError::WorkerUnavailable)
            }
            Err(TrySendError::Closed(_)) => Err(PipelineError::WorkerUnavailable),
        }
    }

    fn absorb(&mut self, delivery: Delivery) -> Option<Update> {
        if delivery.seq != self.latest_seq {
            self.stats.update(RunOutcome::Discarded, delivery.elapsed, 0);
            observability::record_stale_discarded();
            debug!(seq = delivery.seq, latest = self.latest_seq, "stale result discarded");
            if self.state == OrchestratorState::Stale {
                self.state = OrchestratorState::Running;
            }
            return None;
        }

        self.state = OrchestratorState::Idle;
        match delivery.outcome {
            Ok(result) => {
                self.stats
                    .update(RunOutcome::Accepted, delivery.elapsed, result.rows.len());
                self.latest = Some(Arc::clone(&result));
                self.last_error = None;
                Some(Update::Completed {
                    seq: delivery.seq,
                    result,
                })
            }
            Err(err) => {
                self.stats.update(RunOutcome::Failed, delivery.elapsed, 0);
                warn!(error = %err, "latest recompute failed, keeping previous result");
                self.last_error = Some(err.clone());
                Some(Update::Failed(err))
            }
        }
    }

    fn worker_lost(&mut self) -> Update {
        error!("recompute worker exited");
        self.state = OrchestratorState::Idle;
        self.last_error = Some(PipelineError::WorkerUnavailable);
        Update::Failed(PipelineError::WorkerUnavailable)
    }

    fn worker_alive(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RecomputeOrchestrator {
    fn drop(&mut self) {
        self.jobs.close();
        self.shutdown.store(true, Ordering::Release);

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("recompute worker thread panicked");
            }
        }
        if let Some(handle) = self.watchdog.take() {
            if handle.join().is_err() {
                error!("watchdog thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{NaiveDate, ProcessedRows};
    use std::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn session(class_name: &str, location: &str, day: u32, checked_in: u32) -> SessionRecord {
        let mut record =
            SessionRecord::new(class_name, NaiveDate::from_ymd_opt(2026, 3, day).unwrap());
        record.location = location.into();
        record.time = "07:30".into();
        record.capacity = 20;
        record.checked_in = checked_in;
        record
    }

    fn dataset() -> Vec<SessionRecord> {
        vec![
            session("Barre 57", "Kwality House", 2, 12),
            session("Cycle", "Kwality House", 3, 9),
            session("Barre 57", "Bandra", 4, 15),
        ]
    }

    fn fast_config() -> OrchestratorConfig {
        OrchestratorConfig {
            watchdog_threshold_secs: 10,
            watchdog_poll_ms: 10,
        }
    }

    /// Blocks every run until a permit arrives; reports each start
    struct GatedRunner {
        inner: EngineRunner,
        permits: mpsc::Receiver<()>,
        started: mpsc::Sender<u64>,
    }

    impl PipelineRunner for GatedRunner {
        fn run(&mut self, job: &RecomputeJob) -> Result<PipelineResult, ContractError> {
            let _ = self.started.send(job.seq);
            let _ = self.permits.recv();
            self.inner.run(job)
        }
    }

    fn gated() -> (RecomputeOrchestrator, mpsc::Sender<()>, mpsc::Receiver<u64>) {
        gated_with(&fast_config())
    }

    fn gated_with(
        config: &OrchestratorConfig,
    ) -> (RecomputeOrchestrator, mpsc::Sender<()>, mpsc::Receiver<u64>) {
        let (permit_tx, permits) = mpsc::channel();
        let (started, started_rx) = mpsc::channel();
        let engine = AnalyticsEngine::new(EngineConfig::default()).unwrap();
        let runner = GatedRunner {
            inner: EngineRunner::new(engine),
            permits,
            started,
        };
        let orchestrator = RecomputeOrchestrator::with_runner(runner, config).unwrap();
        (orchestrator, permit_tx, started_rx)
    }

    fn group_values(result: &PipelineResult) -> Vec<String> {
        match &result.rows {
            ProcessedRows::Grouped(rows) => rows.iter().map(|r| r.group_value.clone()).collect(),
            ProcessedRows::Flat(_) => panic!("expected grouped rows"),
        }
    }

    #[tokio::test]
    async fn starts_idle_and_empty() {
        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        assert_eq!(orchestrator.state(), OrchestratorState::Idle);
        assert!(orchestrator.latest().is_none());
        assert_eq!(orchestrator.dataset_len(), 0);
        assert!(orchestrator.next_update().await.is_none());
    }

    #[tokio::test]
    async fn delivers_latest_result() {
        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        let seq = orchestrator.replace_dataset(dataset()).unwrap();
        assert_eq!(seq, 1);

        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        let Update::Completed { seq, result } = update else {
            panic!("expected a result");
        };
        assert_eq!(seq, 1);
        assert_eq!(result.filtered_records.len(), 3);
        assert_eq!(orchestrator.state(), OrchestratorState::Idle);
        assert_eq!(orchestrator.latest().unwrap().filtered_records.len(), 3);
    }

    #[tokio::test]
    async fn last_request_wins() {
        let (mut orchestrator, permits, started) = gated();
        orchestrator.replace_dataset(dataset()).unwrap();
        permits.send(()).unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        assert_eq!(started.recv_timeout(WAIT).unwrap(), 1);

        // R1 is picked up and held at the gate
        let r1 = orchestrator.set_group_by(GroupBy::Class).unwrap();
        assert_eq!(started.recv_timeout(WAIT).unwrap(), r1);
        assert_eq!(orchestrator.state(), OrchestratorState::Running);

        let r2 = orchestrator.set_group_by(GroupBy::Location).unwrap();
        assert_eq!(orchestrator.state(), OrchestratorState::Stale);

        permits.send(()).unwrap();
        permits.send(()).unwrap();

        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        let Update::Completed { seq, result } = update else {
            panic!("expected a result");
        };
        assert_eq!(seq, r2);
        assert_eq!(group_values(&result), vec!["Bandra", "Kwality House"]);
        assert_eq!(orchestrator.state(), OrchestratorState::Idle);
        assert_eq!(orchestrator.stats().discarded, 1);
        assert!(timeout(WAIT, orchestrator.next_update()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pending_request_is_evicted() {
        let (mut orchestrator, permits, started) = gated();
        let first = orchestrator.replace_dataset(dataset()).unwrap();
        assert_eq!(started.recv_timeout(WAIT).unwrap(), first);

        // worker is busy: these land in the slot, each evicting the previous
        orchestrator.set_group_by(GroupBy::Trainer).unwrap();
        orchestrator.set_group_by(GroupBy::Date).unwrap();
        let last = orchestrator.set_group_by(GroupBy::Class).unwrap();

        for _ in 0..2 {
            permits.send(()).unwrap();
        }

        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        assert_eq!(update.seq(), Some(last));
        let Update::Completed { result, .. } = update else {
            panic!("expected a result");
        };
        assert_eq!(group_values(&result), vec!["Barre 57", "Cycle"]);
        // only the first and the last request ever ran
        assert_eq!(started.recv_timeout(WAIT).unwrap(), last);
        assert!(started.try_recv().is_err());
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        orchestrator.replace_dataset(dataset()).unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        let good = orchestrator.latest().unwrap();

        let seq = orchestrator
            .set_filters(FilterCriteria {
                date_from: NaiveDate::from_ymd_opt(2026, 3, 9),
                date_to: NaiveDate::from_ymd_opt(2026, 3, 1),
                ..Default::default()
            })
            .unwrap();
        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        assert!(matches!(
            update,
            Update::Failed(PipelineError::Failed { seq: failed, .. }) if failed == seq
        ));
        assert!(Arc::ptr_eq(&good, &orchestrator.latest().unwrap()));
        assert!(orchestrator.last_error().is_some());

        orchestrator.set_filters(FilterCriteria::default()).unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        assert!(orchestrator.last_error().is_none());
    }

    struct PanickingRunner {
        inner: EngineRunner,
    }

    impl PipelineRunner for PanickingRunner {
        fn run(&mut self, job: &RecomputeJob) -> Result<PipelineResult, ContractError> {
            if job.kind == "refresh" {
                panic!("unexpected record shape");
            }
            self.inner.run(job)
        }
    }

    #[tokio::test]
    async fn worker_survives_panic() {
        let engine = AnalyticsEngine::new(EngineConfig::default()).unwrap();
        let runner = PanickingRunner {
            inner: EngineRunner::new(engine),
        };
        let mut orchestrator = RecomputeOrchestrator::with_runner(runner, &fast_config()).unwrap();

        let seq = orchestrator.refresh().unwrap();
        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        match update {
            Update::Failed(PipelineError::Panicked { seq: failed, message }) => {
                assert_eq!(failed, seq);
                assert!(message.contains("unexpected record shape"));
            }
            other => panic!("expected a panic report, got {other:?}"),
        }

        orchestrator.replace_dataset(dataset()).unwrap();
        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        assert!(matches!(update, Update::Completed { .. }));
    }

    #[tokio::test]
    async fn schedule_reclassifies_loaded_dataset() {
        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        orchestrator.replace_dataset(dataset()).unwrap();
        orchestrator
            .set_filters(FilterCriteria {
                status: contracts::StatusFilter::Active,
                ..Default::default()
            })
            .unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();

        // 2026-03-02 is a Monday
        orchestrator
            .replace_schedule(vec![ActiveScheduleEntry {
                day: "Mon".into(),
                time: "07:30".into(),
                location: "Kwality".into(),
                class_name: "Barre 57".into(),
                trainer: String::new(),
                capacity: 20,
                duration: 57,
            }])
            .unwrap();
        let update = timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        let Update::Completed { result, .. } = update else {
            panic!("expected a result");
        };
        assert_eq!(result.filtered_records.len(), 1);
        assert_eq!(result.filtered_records[0].class_name, "Barre 57");
        assert_eq!(orchestrator.schedule_len(), 1);
    }

    #[tokio::test]
    async fn watchdog_flags_slow_run_once() {
        let config = OrchestratorConfig {
            watchdog_threshold_secs: 1,
            watchdog_poll_ms: 10,
        };
        let (mut orchestrator, permits, started) = gated_with(&config);

        let seq = orchestrator.replace_dataset(dataset()).unwrap();
        assert_eq!(started.recv_timeout(WAIT).unwrap(), seq);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(orchestrator.slow_runs(), 1);

        permits.send(()).unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();

        // a quick follow-up run is not flagged
        permits.send(()).unwrap();
        orchestrator.refresh().unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        assert_eq!(orchestrator.slow_runs(), 1);
    }

    #[test]
    fn drop_joins_worker_threads() {
        let orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        let in_flight = Arc::clone(&orchestrator.in_flight);
        // this test, the orchestrator, the worker and the watchdog
        assert_eq!(Arc::strong_count(&in_flight), 4);

        drop(orchestrator);
        assert_eq!(Arc::strong_count(&in_flight), 1);
    }

    /// Reports the classifier pass count after every run
    struct CountingRunner {
        inner: EngineRunner,
        counts: mpsc::Sender<u64>,
    }

    impl PipelineRunner for CountingRunner {
        fn run(&mut self, job: &RecomputeJob) -> Result<PipelineResult, ContractError> {
            let result = self.inner.run(job);
            let _ = self.counts.send(self.inner.classifications());
            result
        }
    }

    #[tokio::test]
    async fn refresh_reclassifies_cached_dataset() {
        let (counts_tx, counts) = mpsc::channel();
        let runner = CountingRunner {
            inner: EngineRunner::new(AnalyticsEngine::new(EngineConfig::default()).unwrap()),
            counts: counts_tx,
        };
        let mut orchestrator = RecomputeOrchestrator::with_runner(runner, &fast_config()).unwrap();

        orchestrator.replace_dataset(dataset()).unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        orchestrator
            .replace_schedule(vec![ActiveScheduleEntry {
                day: "Monday".into(),
                time: "07:30".into(),
                location: "Kwality".into(),
                class_name: "Barre 57".into(),
                trainer: String::new(),
                capacity: 20,
                duration: 57,
            }])
            .unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        orchestrator.set_group_by(GroupBy::Class).unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();
        orchestrator.refresh().unwrap();
        timeout(WAIT, orchestrator.next_update()).await.unwrap().unwrap();

        // view change reuses the classification, refresh does not
        assert_eq!(counts.try_iter().collect::<Vec<_>>(), vec![1, 2, 2, 3]);
    }

    #[test]
    fn try_next_update_without_runtime() {
        let mut orchestrator = RecomputeOrchestrator::new(EngineConfig::default()).unwrap();
        orchestrator.replace_dataset(dataset()).unwrap();
        let deadline = std::time::Instant::now() + WAIT;
        let update = loop {
            if let Some(update) = orchestrator.try_next_update() {
                break update;
            }
            assert!(std::time::Instant::now() < deadline, "no result in time");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert!(matches!(update, Update::Completed { seq: 1, .. }));
    }
}
