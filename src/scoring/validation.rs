use std::collections::HashSet;

use super::config::{Mode, ScoringConfig};
use super::error::{ConfigIssue, InvalidScoringConfig};
use super::resolver::{accepts_destination, lookup_bonus, lookup_criterion};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// `destinations` lists the configured commute destination labels; when it is
/// empty, destination labels are not checked against it.
pub fn validate_scoring(
    config: &ScoringConfig,
    destinations: &[String],
) -> Result<(), InvalidScoringConfig> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, criterion) in config.criteria.iter().enumerate() {
        let path = format!("scoring.criteria[{}]", i);

        if lookup_criterion(&criterion.name).is_none() {
            errors.push(ConfigIssue::UnknownCriterion {
                path: format!("{}.name", path),
                name: criterion.name.clone(),
            });
        }

        if !criterion.weight.is_finite() || criterion.weight < 0.0 {
            errors.push(ConfigIssue::InvalidWeight {
                path: format!("{}.weight", path),
                weight: criterion.weight,
            });
        }

        if let Some(ref dest) = criterion.destination {
            if !accepts_destination(&criterion.name) {
                errors.push(ConfigIssue::InvalidDestination {
                    path: format!("{}.destination", path),
                    reason: format!("'{}' does not take a destination", criterion.name),
                });
            } else if !destinations.is_empty() && !destinations.contains(dest) {
                errors.push(ConfigIssue::InvalidDestination {
                    path: format!("{}.destination", path),
                    reason: format!(
                        "'{}' is not a configured commute destination (known: {})",
                        dest,
                        destinations.join(", ")
                    ),
                });
            }
        }

        if !seen.insert(criterion.label()) {
            errors.push(ConfigIssue::DuplicateCriterion {
                path: format!("{}.name", path),
                label: criterion.label(),
            });
        }

        if let Some(reason) = check_mode(&criterion.mode) {
            errors.push(ConfigIssue::InvalidParameters {
                path: format!("{}.mode", path),
                reason,
            });
        }
    }

    let total_weight: f64 = config
        .criteria
        .iter()
        .map(|c| c.weight)
        .filter(|w| w.is_finite() && *w > 0.0)
        .sum();
    if total_weight <= 0.0 {
        errors.push(ConfigIssue::NoPositiveWeight);
    }

    for (i, bonus) in config.bonuses.iter().enumerate() {
        if lookup_bonus(&bonus.name).is_none() {
            errors.push(ConfigIssue::UnknownBonus {
                path: format!("scoring.bonuses[{}].name", i),
                name: bonus.name.clone(),
            });
        }
        if !bonus.points.is_finite() || bonus.points < 0.0 {
            errors.push(ConfigIssue::InvalidPoints {
                path: format!("scoring.bonuses[{}].points", i),
                points: bonus.points,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(InvalidScoringConfig(errors))
    }
}

fn check_mode(mode: &Mode) -> Option<String> {
    match *mode {
        Mode::Linear { min, max, .. } => {
            if !min.is_finite() || !max.is_finite() {
                Some("linear: min and max must be finite numbers".to_string())
            } else if min > max {
                Some(format!("linear: min ({}) must not exceed max ({})", min, max))
            } else {
                None
            }
        }
        Mode::Threshold { good_at, zero_at } => {
            if !good_at.is_finite() || !zero_at.is_finite() {
                Some("threshold: good_at and zero_at must be finite numbers".to_string())
            } else if good_at == zero_at {
                Some(format!(
                    "threshold: good_at and zero_at must differ (both {})",
                    good_at
                ))
            } else {
                None
            }
        }
        Mode::Peak {
            ideal,
            decay_above,
            decay_below,
        } => {
            if !ideal.is_finite() || !decay_above.is_finite() || !decay_below.is_finite() {
                Some("peak: ideal and decay rates must be finite numbers".to_string())
            } else if decay_above < 0.0 || decay_below < 0.0 {
                Some("peak: decay rates must be non-negative".to_string())
            } else {
                None
            }
        }
    }
}
