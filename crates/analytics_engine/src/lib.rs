//! # Analytics Engine
//!
//! Session aggregation and ranking pipeline.
//!
//! Stages, in order:
//! - [`classifier`]: Active/Inactive tagging against the weekly schedule
//! - [`filter`]: compound predicate with hosted-class exclusion and search
//! - [`grouping`] + [`calculator`]: composite-key groups and their metrics
//! - [`ranking`]: ordering and dense 1-based ranks
//! - [`totals`]: one grand-totals row over the filtered set
//!
//! [`AnalyticsEngine`] wires them together. All stages are pure: inputs are
//! borrowed and every output is freshly owned.

pub mod calculator;
pub mod classifier;
pub mod filter;
pub mod flat;
pub mod grouping;
pub mod pipeline;
pub mod ranking;
pub mod totals;

pub use calculator::{group_metrics, record_metrics};
pub use classifier::{classify_records, StatusClassifier};
pub use filter::{apply_filters, HostedClassMatcher};
pub use flat::flat_rows;
pub use grouping::{group_records, GroupThresholds};
pub use pipeline::{run_pipeline, AnalyticsEngine};
pub use ranking::{metric_value, rank_rows};
pub use totals::compute_totals;
