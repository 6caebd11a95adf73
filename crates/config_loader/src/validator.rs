//! Configuration validation
//!
//! Rules:
//! - 0 < fallback_window_days <= 36500
//! - prefix tokens and hosted keywords are non-blank
//! - key separator is non-empty
//! - composite weights finite, non-negative, not all zero
//! - watchdog threshold and poll interval > 0

use contracts::{ContractError, EngineConfig};

/// About a century; anything longer is a typo
pub const MAX_FALLBACK_WINDOW_DAYS: i64 = 36_500;

/// Returns the first violation found
pub fn validate(config: &EngineConfig) -> Result<(), ContractError> {
    validate_classifier(config)?;
    validate_filters(config)?;
    validate_grouping(config)?;
    validate_weights(config)?;
    validate_orchestrator(config)?;
    Ok(())
}

fn validate_classifier(config: &EngineConfig) -> Result<(), ContractError> {
    let classifier = &config.classifier;
    if classifier.fallback_window_days <= 0
        || classifier.fallback_window_days > MAX_FALLBACK_WINDOW_DAYS
    {
        return Err(ContractError::config_validation(
            "classifier.fallback_window_days",
            format!(
                "must be in 1..={MAX_FALLBACK_WINDOW_DAYS}, got {}",
                classifier.fallback_window_days
            ),
        ));
    }
    if let Some(index) = classifier
        .class_prefix_tokens
        .iter()
        .position(|token| token.trim().is_empty())
    {
        return Err(ContractError::config_validation(
            format!("classifier.class_prefix_tokens[{index}]"),
            "token must not be blank",
        ));
    }
    Ok(())
}

fn validate_filters(config: &EngineConfig) -> Result<(), ContractError> {
    if let Some(index) = config
        .filters
        .hosted_keywords
        .iter()
        .position(|keyword| keyword.trim().is_empty())
    {
        return Err(ContractError::config_validation(
            format!("filters.hosted_keywords[{index}]"),
            "keyword must not be blank",
        ));
    }
    Ok(())
}

fn validate_grouping(config: &EngineConfig) -> Result<(), ContractError> {
    if config.grouping.key_separator.is_empty() {
        return Err(ContractError::config_validation(
            "grouping.key_separator",
            "separator must not be empty",
        ));
    }
    Ok(())
}

fn validate_weights(config: &EngineConfig) -> Result<(), ContractError> {
    let weights = &config.ranking.composite_weights;
    let named = [
        ("fill_rate", weights.fill_rate),
        ("consistency", weights.consistency),
        ("retention", weights.retention),
        ("demand", weights.demand),
    ];

    for (name, value) in named {
        if !value.is_finite() || value < 0.0 {
            return Err(ContractError::config_validation(
                format!("ranking.composite_weights.{name}"),
                format!("weight must be finite and >= 0, got {value}"),
            ));
        }
    }

    if weights.total() == 0.0 {
        return Err(ContractError::config_validation(
            "ranking.composite_weights",
            "at least one weight must be > 0",
        ));
    }
    Ok(())
}

fn validate_orchestrator(config: &EngineConfig) -> Result<(), ContractError> {
    let orchestrator = &config.orchestrator;
    if orchestrator.watchdog_threshold_secs == 0 {
        return Err(ContractError::config_validation(
            "orchestrator.watchdog_threshold_secs",
            "must be > 0",
        ));
    }
    if orchestrator.watchdog_poll_ms == 0 {
        return Err(ContractError::config_validation(
            "orchestrator.watchdog_poll_ms",
            "must be > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CompositeWeights;

    fn field_of(err: ContractError) -> String {
        match err {
            ContractError::ConfigValidation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn fallback_window_must_be_positive() {
        let mut config = EngineConfig::default();
        config.classifier.fallback_window_days = 0;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "classifier.fallback_window_days"
        );
    }

    #[test]
    fn fallback_window_has_upper_bound() {
        let mut config = EngineConfig::default();
        config.classifier.fallback_window_days = MAX_FALLBACK_WINDOW_DAYS;
        assert!(validate(&config).is_ok());

        for days in [MAX_FALLBACK_WINDOW_DAYS + 1, i64::MAX / 2, i64::MAX] {
            config.classifier.fallback_window_days = days;
            assert_eq!(
                field_of(validate(&config).unwrap_err()),
                "classifier.fallback_window_days"
            );
        }
    }

    #[test]
    fn blank_keyword_rejected() {
        let mut config = EngineConfig::default();
        config.filters.hosted_keywords.push("  ".into());
        let field = field_of(validate(&config).unwrap_err());
        assert!(field.starts_with("filters.hosted_keywords["));
    }

    #[test]
    fn empty_keyword_list_allowed() {
        let mut config = EngineConfig::default();
        config.filters.hosted_keywords.clear();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn weights_checked() {
        let mut config = EngineConfig::default();
        config.ranking.composite_weights.demand = -0.1;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "ranking.composite_weights.demand"
        );

        config.ranking.composite_weights = CompositeWeights {
            fill_rate: 0.0,
            consistency: 0.0,
            retention: 0.0,
            demand: 0.0,
        };
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "ranking.composite_weights"
        );

        config.ranking.composite_weights.fill_rate = f64::NAN;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "ranking.composite_weights.fill_rate"
        );
    }

    #[test]
    fn watchdog_intervals_positive() {
        let mut config = EngineConfig::default();
        config.orchestrator.watchdog_poll_ms = 0;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "orchestrator.watchdog_poll_ms"
        );
    }
}
