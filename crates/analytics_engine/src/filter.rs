//! Compound record predicate.
//!
//! Clause order: hosted exclusion, date range, trainer, location, class type,
//! class name, status. A non-empty search query replaces every clause after
//! hosted exclusion: the record passes iff the query matches.

use contracts::{ContractError, FilterConfig, FilterCriteria, SessionRecord};
use regex::{Regex, RegexBuilder};
use tracing::{debug, instrument};

/// Detects hosted (one-off) sessions by keyword
#[derive(Debug, Clone)]
pub struct HostedClassMatcher {
    pattern: Option<Regex>,
}

impl HostedClassMatcher {
    /// Build from the configured keyword list
    ///
    /// Keywords match whole words, case-insensitive. An empty list never matches.
    pub fn new(keywords: &[String]) -> Result<Self, ContractError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ContractError::config_validation("filters.hosted_keywords", e.to_string())
            })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self, ContractError> {
        Self::new(&config.hosted_keywords)
    }

    /// Whether the class or session name carries a hosted keyword
    pub fn is_hosted(&self, record: &SessionRecord) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        pattern.is_match(&record.class_name) || pattern.is_match(&record.session_name)
    }
}

/// Reject criteria that cannot select anything meaningful
pub fn validate_criteria(criteria: &FilterCriteria) -> Result<(), ContractError> {
    if let (Some(from), Some(to)) = (criteria.date_from, criteria.date_to) {
        if from > to {
            return Err(ContractError::invalid_criteria(
                "date_from / date_to",
                format!("date_from ({from}) must be <= date_to ({to})"),
            ));
        }
    }
    Ok(())
}

/// Evaluate the predicate for one record
pub fn matches(record: &SessionRecord, criteria: &FilterCriteria, hosted: &HostedClassMatcher) -> bool {
    if criteria.exclude_hosted_classes && hosted.is_hosted(record) {
        return false;
    }

    if let Some(query) = criteria.search_query() {
        return matches_search(record, query);
    }

    if let Some(from) = criteria.date_from {
        if record.date < from {
            return false;
        }
    }
    if let Some(to) = criteria.date_to {
        if record.date > to {
            return false;
        }
    }

    if !criteria.trainers.is_empty() && !criteria.trainers.contains(&record.trainer) {
        return false;
    }
    if !criteria.locations.is_empty() && !criteria.locations.contains(&record.location) {
        return false;
    }
    if !criteria.class_types.is_empty() && !criteria.class_types.contains(&record.class_type) {
        return false;
    }
    if !criteria.class_names.is_empty() && !criteria.class_names.contains(&record.class_name) {
        return false;
    }

    criteria.status.matches(record.status())
}

/// Case-insensitive substring match over class, trainer, location and type
pub fn matches_search(record: &SessionRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        &record.class_name,
        &record.trainer,
        &record.location,
        &record.class_type,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Filter records into a new owned set, preserving order
#[instrument(
    name = "apply_filters",
    level = "debug",
    skip_all,
    fields(records = records.len())
)]
pub fn apply_filters(
    records: &[SessionRecord],
    criteria: &FilterCriteria,
    hosted: &HostedClassMatcher,
) -> Result<Vec<SessionRecord>, ContractError> {
    validate_criteria(criteria)?;

    let filtered: Vec<SessionRecord> = records
        .iter()
        .filter(|record| matches(record, criteria, hosted))
        .cloned()
        .collect();

    debug!(
        kept = filtered.len(),
        dropped = records.len() - filtered.len(),
        search = criteria.search_query().is_some(),
        "filters applied"
    );

    Ok(filtered)
}
