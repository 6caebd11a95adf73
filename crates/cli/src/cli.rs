//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::{
    FilterCriteria, GroupBy, NaiveDate, RankingMetric, SortColumn, SortDirection, SortSpec,
    StatusFilter, ViewMode,
};

/// Studio Analytics - session aggregation and ranking for fitness studios
#[derive(Parser, Debug)]
#[command(
    name = "studio-analytics",
    author,
    version,
    about = "Fitness-studio session aggregation and ranking engine",
    long_about = "Classifies class sessions against the active weekly schedule, filters,\n\
                  groups them by a composite key, computes attendance and revenue\n\
                  metrics and ranks the groups."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "STUDIO_ANALYTICS_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "STUDIO_ANALYTICS_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the analytics pipeline and print the result
    Run(RunArgs),

    /// Validate an engine configuration file
    Validate(ValidateArgs),

    /// Summarize a dataset and schedule
    Info(InfoArgs),
}

/// Where records and schedule come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Engine configuration (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "STUDIO_ANALYTICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Session records, a JSON array
    #[arg(short, long, env = "STUDIO_ANALYTICS_RECORDS", conflicts_with = "mock")]
    pub records: Option<PathBuf>,

    /// Active schedule, a JSON array
    #[arg(short, long, env = "STUDIO_ANALYTICS_SCHEDULE")]
    pub schedule: Option<PathBuf>,

    /// Use the synthetic dataset instead of a records file
    #[arg(long)]
    pub mock: bool,

    /// Seed of the synthetic dataset
    #[arg(long, default_value = "57")]
    pub seed: u64,

    /// Weeks of synthetic data
    #[arg(long, default_value = "8")]
    pub weeks: u32,
}

/// Filter flags, mapped onto `FilterCriteria`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Allowed trainer (repeatable)
    #[arg(long = "trainer")]
    pub trainers: Vec<String>,

    /// Allowed location (repeatable)
    #[arg(long = "location")]
    pub locations: Vec<String>,

    /// Allowed class type (repeatable)
    #[arg(long = "class-type")]
    pub class_types: Vec<String>,

    /// Allowed class name (repeatable)
    #[arg(long = "class")]
    pub class_names: Vec<String>,

    /// all, active or inactive
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Drop groups with fewer check-ins
    #[arg(long, default_value = "0")]
    pub min_check_ins: u32,

    /// Drop groups with fewer sessions
    #[arg(long, default_value = "0")]
    pub min_classes: u32,

    /// Exclude hosted (one-off) sessions
    #[arg(long)]
    pub exclude_hosted: bool,

    /// Free-text search; replaces every other filter except hosted exclusion
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date_from: self.from,
            date_to: self.to,
            trainers: self.trainers.iter().cloned().collect(),
            locations: self.locations.iter().cloned().collect(),
            class_types: self.class_types.iter().cloned().collect(),
            class_names: self.class_names.iter().cloned().collect(),
            status: self.status,
            min_check_ins: self.min_check_ins,
            min_classes: self.min_classes,
            exclude_hosted_classes: self.exclude_hosted,
            search: self.search.clone(),
        }
    }
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Grouping mode, e.g. class_day_time_location, trainer, location_type
    #[arg(long, default_value = "class_day_time_location")]
    pub group_by: GroupBy,

    /// flat or grouped
    #[arg(long, default_value = "grouped")]
    pub view: ViewMode,

    /// Ranking metric, e.g. class_avg, fill_rate, composite_score
    #[arg(long, default_value = "class_avg")]
    pub rank_by: RankingMetric,

    /// Sort column of the flat view
    #[arg(long)]
    pub sort: Option<SortColumn>,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    pub direction: SortDirection,

    /// Rows to print (0 = all)
    #[arg(long, default_value = "20")]
    pub top: usize,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for the result
    #[arg(long, default_value = "30", env = "STUDIO_ANALYTICS_TIMEOUT")]
    pub timeout: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "STUDIO_ANALYTICS_METRICS_PORT")]
    pub metrics_port: u16,
}

impl RunArgs {
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.map(|column| SortSpec {
            column,
            direction: self.direction,
        })
    }
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(short, long, default_value = "studio.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["studio-analytics", "run", "--mock"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.source.mock);
        assert_eq!(args.group_by, GroupBy::ClassDayTimeLocation);
        assert_eq!(args.view, ViewMode::Grouped);
        assert_eq!(args.rank_by, RankingMetric::ClassAvg);
        assert!(args.sort_spec().is_none());
    }

    #[test]
    fn filter_flags_map_to_criteria() {
        let cli = Cli::try_parse_from([
            "studio-analytics",
            "run",
            "--mock",
            "--trainer",
            "Anisha",
            "--trainer",
            "Rohan",
            "--status",
            "active",
            "--from",
            "2026-01-05",
            "--exclude-hosted",
            "--group-by",
            "trainer-location",
            "--rank-by",
            "composite_score",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let criteria = args.filters.to_criteria();
        assert_eq!(criteria.trainers.len(), 2);
        assert_eq!(criteria.status, StatusFilter::Active);
        assert!(criteria.exclude_hosted_classes);
        assert_eq!(criteria.date_from, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(args.group_by, GroupBy::TrainerLocation);
        assert_eq!(args.rank_by, RankingMetric::CompositeScore);
    }

    #[test]
    fn unknown_group_by_rejected() {
        let parsed = Cli::try_parse_from(["studio-analytics", "run", "--group-by", "galaxy"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn records_conflict_with_mock() {
        let parsed = Cli::try_parse_from([
            "studio-analytics",
            "info",
            "--mock",
            "--records",
            "sessions.json",
        ]);
        assert!(parsed.is_err());
    }
}
