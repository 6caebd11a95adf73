//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::EngineConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Outcome of `validate`, also the `--json` payload
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<EngineConfig>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "checking engine configuration");

    let result = check_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to encode validation report")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("{} is not a usable engine configuration", result.config_path)
    }
}

fn check_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: Vec::new(),
            config: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(&config),
            config: Some(config),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            config: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(config: &EngineConfig) -> Vec<String> {
    let mut warnings = vec![];

    let total = config.ranking.composite_weights.total();
    if (total - 1.0).abs() > 1e-6 {
        warnings.push(format!(
            "composite weights sum to {total:.3}; scores will not be on a 0-100 scale"
        ));
    }

    if config.filters.hosted_keywords.is_empty() {
        warnings.push("filters.hosted_keywords is empty - hosted exclusion has no effect".into());
    }

    if config.classifier.fallback_window_days > 365 {
        warnings.push(format!(
            "classifier.fallback_window_days = {} - most sessions will count as active without a schedule",
            config.classifier.fallback_window_days
        ));
    }

    if config.grouping.key_separator.trim().is_empty() {
        warnings.push("grouping.key_separator is whitespace only".into());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if !result.valid {
        println!("✗ {} cannot be used", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
        return;
    }

    println!("✓ {} is a valid engine configuration", result.config_path);

    if let Some(ref config) = result.config {
        let weights = &config.ranking.composite_weights;
        println!("\n  Fallback window: {} days", config.classifier.fallback_window_days);
        println!("  Hosted keywords: {}", config.filters.hosted_keywords.join(", "));
        println!("  Key separator: {:?}", config.grouping.key_separator);
        println!(
            "  Composite weights: fill {} / consistency {} / retention {} / demand {}",
            weights.fill_rate, weights.consistency, weights.retention, weights.demand
        );
        println!(
            "  Watchdog: {}s threshold, {}ms poll",
            config.orchestrator.watchdog_threshold_secs, config.orchestrator.watchdog_poll_ms
        );
    }

    if !result.warnings.is_empty() {
        println!("\n⚠ Warnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }
}
