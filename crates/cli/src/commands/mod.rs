//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_analytics;
pub use validate::run_validate;

use anyhow::{Context, Result};
use contracts::{ActiveScheduleEntry, EngineConfig, RecordSource, ScheduleSource, SessionRecord};
use ingestion::{JsonFileSource, JsonScheduleSource, MockDataConfig, MockRecordSource};
use tracing::info;

use crate::cli::SourceArgs;
use crate::error::CliError;

/// Engine configuration from `--config`, or defaults
pub(crate) fn load_engine_config(source: &SourceArgs) -> Result<EngineConfig> {
    let Some(path) = &source.config else {
        return Ok(EngineConfig::default());
    };
    if !path.exists() {
        return Err(CliError::input_not_found("configuration file", path).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Records and schedule named by the source flags
///
/// With `--mock` and no `--schedule`, the mock's own schedule is used.
pub(crate) fn load_inputs(
    source: &SourceArgs,
) -> Result<(Vec<SessionRecord>, Option<Vec<ActiveScheduleEntry>>)> {
    let mock = source.mock.then(|| {
        MockRecordSource::new(MockDataConfig {
            seed: source.seed,
            weeks: source.weeks,
            ..Default::default()
        })
    });

    let records = match (&source.records, &mock) {
        (Some(path), _) => {
            if !path.exists() {
                return Err(CliError::input_not_found("records file", path).into());
            }
            let file = JsonFileSource::new(path);
            file.load_records()
                .with_context(|| format!("Failed to load records from {}", file.name()))?
        }
        (None, Some(mock)) => mock.load_records()?,
        (None, None) => return Err(CliError::NoRecords.into()),
    };

    let schedule = match (&source.schedule, &mock) {
        (Some(path), _) => {
            if !path.exists() {
                return Err(CliError::input_not_found("schedule file", path).into());
            }
            let file = JsonScheduleSource::new(path);
            Some(
                file.load_schedule()
                    .with_context(|| format!("Failed to load schedule from {}", file.name()))?,
            )
        }
        (None, Some(mock)) => Some(mock.schedule_source().load_schedule()?),
        (None, None) => None,
    };

    info!(
        records = records.len(),
        schedule = schedule.as_ref().map_or(0, Vec::len),
        mock = source.mock,
        "inputs loaded"
    );

    Ok((records, schedule))
}
