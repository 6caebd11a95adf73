//! # Observability
//!
//! Tracing and Prometheus metrics for the analytics workspace.
//!
//! - Subscriber setup: JSON / pretty / compact, always on stderr so stdout
//!   stays free for command output
//! - Optional Prometheus exporter
//! - Recompute metrics helpers and in-memory run statistics
//!
//! ## Usage
//!
//! ```ignore
//! observability::init(ObservabilityConfig {
//!     level: "debug".into(),
//!     ..Default::default()
//! })?;
//!
//! let started = Instant::now();
//! let result = engine.run(&records, &schedule, &params)?;
//! observability::record_run_completed(&result, started.elapsed());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_request_submitted, record_request_superseded, record_run_completed,
    record_run_failed, record_stale_discarded, record_watchdog_warning, RunOutcome, RunSummary,
    RunStatsAggregator, RunningStats, StatsSummary,
};

/// Observability settings
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Filter directive, e.g. `info` or `orchestrator=debug`
    pub level: String,
    /// Let `RUST_LOG` override `level` when set
    pub env_override: bool,
    /// Prometheus listener port (None = disabled)
    pub metrics_port: Option<u16>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            level: "info".to_string(),
            env_override: true,
            metrics_port: None,
        }
    }
}

impl ObservabilityConfig {
    fn env_filter(&self) -> EnvFilter {
        if self.env_override {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
        } else {
            EnvFilter::new(&self.level)
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    #[default]
    Compact,
}

/// Install the global subscriber, and the exporter when a port is set
pub fn init(config: ObservabilityConfig) -> Result<()> {
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.level,
        metrics_port = ?config.metrics_port,
        "observability initialized"
    );
    Ok(())
}

/// Install only the Prometheus recorder
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port, "Prometheus metrics endpoint listening");
    Ok(())
}
