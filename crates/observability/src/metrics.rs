//! Recompute metrics
//!
//! Prometheus helpers called from the orchestrator, plus an in-memory
//! aggregator the CLI prints at the end of a run.

use std::fmt;
use std::time::Duration;

use contracts::{PipelineResult, ProcessedRows};
use metrics::{counter, gauge, histogram};

/// Request accepted into the mailbox
pub fn record_request_submitted(kind: &'static str) {
    counter!("studio_analytics_requests_total", "kind" => kind).increment(1);
}

/// Pending request evicted from the single-slot mailbox by a newer one
pub fn record_request_superseded() {
    counter!("studio_analytics_requests_superseded_total").increment(1);
}

/// Result delivered for a sequence number that was no longer the latest
pub fn record_stale_discarded() {
    counter!("studio_analytics_results_discarded_total").increment(1);
}

/// Successful pipeline run
pub fn record_run_completed(result: &PipelineResult, elapsed: Duration) {
    let view = match &result.rows {
        ProcessedRows::Flat(_) => "flat",
        ProcessedRows::Grouped(_) => "grouped",
    };

    counter!("studio_analytics_runs_total", "view" => view).increment(1);
    histogram!("studio_analytics_run_duration_ms").record(elapsed.as_secs_f64() * 1000.0);
    gauge!("studio_analytics_filtered_records").set(result.filtered_records.len() as f64);
    gauge!("studio_analytics_result_rows", "view" => view).set(result.rows.len() as f64);
}

/// Failed run, labelled `failed` or `panicked`
pub fn record_run_failed(reason: &'static str) {
    counter!("studio_analytics_run_failures_total", "reason" => reason).increment(1);
}

/// Watchdog fired for a run exceeding the threshold
pub fn record_watchdog_warning() {
    counter!("studio_analytics_watchdog_warnings_total").increment(1);
}

/// Outcome of one recompute as seen by the producer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Accepted,
    Discarded,
    Failed,
}

/// In-memory run statistics
#[derive(Debug, Clone, Default)]
pub struct RunStatsAggregator {
    pub accepted: u64,
    pub discarded: u64,
    pub failed: u64,
    pub duration_ms: RunningStats,
    pub rows: RunningStats,
}

impl RunStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one delivered run
    ///
    /// `rows` is ignored unless the outcome is `Accepted`.
    pub fn update(&mut self, outcome: RunOutcome, elapsed: Duration, rows: usize) {
        self.duration_ms.push(elapsed.as_secs_f64() * 1000.0);
        match outcome {
            RunOutcome::Accepted => {
                self.accepted += 1;
                self.rows.push(rows as f64);
            }
            RunOutcome::Discarded => self.discarded += 1,
            RunOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.accepted + self.discarded + self.failed
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_runs: self.total(),
            accepted: self.accepted,
            discarded: self.discarded,
            failed: self.failed,
            failure_rate: if self.total() > 0 {
                self.failed as f64 / self.total() as f64 * 100.0
            } else {
                0.0
            },
            duration_ms: StatsSummary::from(&self.duration_ms),
            rows: StatsSummary::from(&self.rows),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Printable run summary
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total_runs: u64,
    pub accepted: u64,
    pub discarded: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub duration_ms: StatsSummary,
    pub rows: StatsSummary,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Recompute Summary ===")?;
        writeln!(f, "Total runs: {}", self.total_runs)?;
        writeln!(f, "Accepted: {}", self.accepted)?;
        writeln!(f, "Discarded (stale): {}", self.discarded)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(f, "Run duration (ms): {}", self.duration_ms)?;
        writeln!(f, "Result rows: {}", self.rows)
    }
}

/// min/max/mean/std of a series
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean and variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
