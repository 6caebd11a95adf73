//! Recompute worker thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use analytics_engine::AnalyticsEngine;
use async_channel::{Receiver, Sender};
use contracts::{ContractError, PipelineResult, SessionRecord};
use tracing::{debug, error, info_span, warn};

use crate::error::PipelineError;
use crate::request::RecomputeJob;
use crate::watchdog::InFlight;

/// Runs one job to completion
///
/// Seam for the worker; [`EngineRunner`] is the production implementation.
pub trait PipelineRunner: Send + 'static {
    fn run(&mut self, job: &RecomputeJob) -> Result<PipelineResult, ContractError>;
}

/// Worker output for one job
#[derive(Debug)]
pub(crate) struct Delivery {
    pub seq: u64,
    pub elapsed: Duration,
    pub outcome: Result<Arc<PipelineResult>, PipelineError>,
}

/// Classified records for one (dataset, schedule, refresh) generation triple
#[derive(Debug)]
struct ClassifiedCache {
    dataset_generation: u64,
    schedule_generation: u64,
    refresh_generation: u64,
    records: Vec<SessionRecord>,
}

impl ClassifiedCache {
    fn serves(&self, job: &RecomputeJob) -> bool {
        self.dataset_generation == job.dataset_generation
            && self.schedule_generation == job.schedule_generation
            && self.refresh_generation == job.refresh_generation
    }
}

/// Production runner
///
/// Reuses classified records while dataset, schedule and refresh generation
/// are unchanged, so view-only requests skip the classifier. Without a
/// schedule the recency fallback reads the clock, so nothing is cached.
#[derive(Debug)]
pub struct EngineRunner {
    engine: AnalyticsEngine,
    cache: Option<ClassifiedCache>,
    classifications: u64,
}

impl EngineRunner {
    pub fn new(engine: AnalyticsEngine) -> Self {
        Self {
            engine,
            cache: None,
            classifications: 0,
        }
    }

    /// Classifier passes run so far
    pub fn classifications(&self) -> u64 {
        self.classifications
    }

    fn refresh_cache(&mut self, job: &RecomputeJob) {
        let cacheable = !job.schedule.is_empty();
        if cacheable && self.cache.as_ref().is_some_and(|cache| cache.serves(job)) {
            return;
        }

        debug!(
            dataset_generation = job.dataset_generation,
            schedule_generation = job.schedule_generation,
            refresh_generation = job.refresh_generation,
            recency_fallback = !cacheable,
            "re-classifying dataset"
        );
        self.classifications += 1;
        self.cache = Some(ClassifiedCache {
            dataset_generation: job.dataset_generation,
            schedule_generation: job.schedule_generation,
            refresh_generation: job.refresh_generation,
            records: self.engine.classify(&job.dataset, &job.schedule),
        });
    }
}

impl PipelineRunner for EngineRunner {
    fn run(&mut self, job: &RecomputeJob) -> Result<PipelineResult, ContractError> {
        self.refresh_cache(job);
        let classified = self
            .cache
            .as_ref()
            .map(|cache| cache.records.as_slice())
            .unwrap_or_default();
        self.engine.process(classified, &job.params)
    }
}

pub(crate) fn spawn<R: PipelineRunner>(
    runner: R,
    jobs: Receiver<RecomputeJob>,
    deliveries: Sender<Delivery>,
    in_flight: Arc<InFlight>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("recompute-worker".into())
        .spawn(move || worker_loop(runner, jobs, deliveries, in_flight))
}

fn worker_loop<R: PipelineRunner>(
    mut runner: R,
    jobs: Receiver<RecomputeJob>,
    deliveries: Sender<Delivery>,
    in_flight: Arc<InFlight>,
) {
    debug!("recompute worker started");

    while let Ok(job) = jobs.recv_blocking() {
        let span = info_span!("recompute", seq = job.seq, kind = job.kind);
        let _guard = span.enter();

        in_flight.start(job.seq);
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| runner.run(&job)));
        let elapsed = started.elapsed();
        in_flight.finish();

        let outcome = match outcome {
            Ok(Ok(result)) => {
                observability::record_run_completed(&result, elapsed);
                debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    rows = result.rows.len(),
                    filtered = result.filtered_records.len(),
                    "recompute completed"
                );
                Ok(Arc::new(result))
            }
            Ok(Err(e)) => {
                let err = PipelineError::failed(job.seq, e.to_string());
                observability::record_run_failed(err.reason());
                warn!(error = %e, "recompute failed");
                Err(err)
            }
            Err(payload) => {
                let err = PipelineError::panicked(job.seq, panic_message(payload.as_ref()));
                observability::record_run_failed(err.reason());
                error!(error = %err, "recompute panicked");
                Err(err)
            }
        };

        let delivery = Delivery {
            seq: job.seq,
            elapsed,
            outcome,
        };
        if deliveries.send_blocking(delivery).is_err() {
            debug!("result channel closed");
            break;
        }
    }

    debug!("recompute worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
