use thiserror::Error;

/// A single problem found while validating a scoring configuration.
///
/// `path` points at the offending entry, e.g. `scoring.criteria[2].name`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    /// The criterion name has no resolver
    #[error("{path}: unknown criterion '{name}'")]
    UnknownCriterion { path: String, name: String },

    /// The bonus name does not map to a boolean feature
    #[error("{path}: unknown bonus feature '{name}'")]
    UnknownBonus { path: String, name: String },

    /// The same criterion/destination pair appears twice
    #[error("{path}: duplicate criterion '{label}'")]
    DuplicateCriterion { path: String, label: String },

    #[error("{path}: weight must be a non-negative number, got {weight}")]
    InvalidWeight { path: String, weight: f64 },

    #[error("{path}: points must be a non-negative number, got {points}")]
    InvalidPoints { path: String, points: f64 },

    /// Mode parameters that can't produce a meaningful curve
    #[error("{path}: {reason}")]
    InvalidParameters { path: String, reason: String },

    /// A destination was given for a criterion that doesn't take one, or it
    /// names a label that isn't a configured commute destination
    #[error("{path}: {reason}")]
    InvalidDestination { path: String, reason: String },

    #[error("scoring.criteria: total weight must be greater than zero")]
    NoPositiveWeight,
}

impl ConfigIssue {
    pub fn is_unknown_criterion(&self) -> bool {
        matches!(self, ConfigIssue::UnknownCriterion { .. })
    }
}

/// Every issue found in a scoring configuration, reported together.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid scoring configuration: {}", join_issues(.0))]
pub struct InvalidScoringConfig(pub Vec<ConfigIssue>);

impl InvalidScoringConfig {
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.0
    }

    pub fn has_unknown_criterion(&self) -> bool {
        self.0.iter().any(ConfigIssue::is_unknown_criterion)
    }
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned when scoring a property.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// The property has no usable (strictly positive) price
    #[error("listing {listing_id}: missing or non-positive price")]
    MissingPrice { listing_id: String },

    #[error(transparent)]
    InvalidConfig(#[from] InvalidScoringConfig),
}
