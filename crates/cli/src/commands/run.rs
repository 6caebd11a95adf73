//! `run` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use contracts::PipelineResult;
use orchestrator::{RecomputeOrchestrator, Update};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::commands::{load_engine_config, load_inputs};
use crate::error::CliError;
use crate::report;

/// Execute the `run` command
///
/// Submits the dataset, the view parameters and finally the schedule as
/// separate requests, the way an interactive front end would; only the
/// outcome of the last one is reported.
pub async fn run_analytics(args: &RunArgs) -> Result<()> {
    let config = load_engine_config(&args.source)?;
    let (records, schedule) = load_inputs(&args.source)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut orchestrator =
        RecomputeOrchestrator::new(config).context("Failed to start recompute worker")?;

    orchestrator.replace_dataset(records)?;
    orchestrator.set_filters(args.filters.to_criteria())?;
    orchestrator.set_group_by(args.group_by)?;
    orchestrator.set_view_mode(args.view)?;
    orchestrator.set_ranking(args.rank_by)?;
    orchestrator.set_sort(args.sort_spec())?;
    if let Some(entries) = schedule {
        orchestrator.replace_schedule(entries)?;
    }

    info!(
        latest_seq = orchestrator.latest_seq(),
        group_by = %args.group_by,
        view = %args.view,
        rank_by = %args.rank_by,
        "requests submitted"
    );

    let result = tokio::select! {
        outcome = tokio::time::timeout(
            Duration::from_secs(args.timeout),
            wait_for_result(&mut orchestrator),
        ) => match outcome {
            Ok(result) => result?,
            Err(_) => return Err(CliError::Timeout { secs: args.timeout }.into()),
        },
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping");
            return Err(CliError::Interrupted.into());
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(result.as_ref())
            .context("Failed to serialize result")?;
        println!("{json}");
    } else {
        report::print_result(&result, args.top);
        println!("{}", orchestrator.stats().summary());
    }

    info!(
        filtered = result.filtered_records.len(),
        rows = result.rows.len(),
        "analytics run finished"
    );
    Ok(())
}

/// Drain updates until the latest request settles
async fn wait_for_result(
    orchestrator: &mut RecomputeOrchestrator,
) -> Result<Arc<PipelineResult>, CliError> {
    while let Some(update) = orchestrator.next_update().await {
        match update {
            Update::Completed { result, .. } => return Ok(result),
            Update::Failed(err) => return Err(err.into()),
        }
    }
    // nothing outstanding: fall back to whatever was accepted last
    orchestrator
        .latest()
        .ok_or(CliError::Pipeline(orchestrator::PipelineError::WorkerUnavailable))
}

/// Ctrl+C and SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
