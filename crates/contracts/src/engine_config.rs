//! Engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Status classifier tuning
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Filter engine tuning
    #[serde(default)]
    pub filters: FilterConfig,

    /// Group key rendering
    #[serde(default)]
    pub grouping: GroupingConfig,

    /// Ranking tuning
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Recompute worker settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Status classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Trailing window (days) treated as active when no schedule is loaded
    pub fallback_window_days: i64,

    /// Leading tokens ignored when comparing class names
    pub class_prefix_tokens: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fallback_window_days: 30,
            class_prefix_tokens: vec!["studio".to_string(), "the".to_string()],
        }
    }
}

/// Filter engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Case-insensitive keywords marking a hosted (one-off) session
    pub hosted_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            hosted_keywords: ["hosted", "guest", "pop-up", "popup", "takeover", "event"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Group key rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Joins key values into the display string
    pub key_separator: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            key_separator: " | ".to_string(),
        }
    }
}

/// Ranking configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub composite_weights: CompositeWeights,
}

/// Blend weights of the composite score
///
/// `composite = fill_rate * fill + consistency_score * consistency
///  + (100 - cancellation_rate) * retention + min(waitlist_rate, 100) * demand`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub fill_rate: f64,
    pub consistency: f64,
    pub retention: f64,
    pub demand: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            fill_rate: 0.4,
            consistency: 0.3,
            retention: 0.2,
            demand: 0.1,
        }
    }
}

impl CompositeWeights {
    pub fn total(&self) -> f64 {
        self.fill_rate + self.consistency + self.retention + self.demand
    }
}

/// Recompute worker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Runs longer than this are reported by the watchdog
    pub watchdog_threshold_secs: u64,

    /// Watchdog polling interval in milliseconds
    pub watchdog_poll_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            watchdog_threshold_secs: 10,
            watchdog_poll_ms: 500,
        }
    }
}
