use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// An ordered list of weighted criteria, each mapped to a 0-100 sub-score by
/// one of three normalization modes, plus flat bonuses for boolean features.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   missing: zero
///   criteria:
///     - name: lot_size_acres
///       weight: 40
///       mode: { type: linear, min: 0.5, max: 5.0 }
///     - name: commute
///       weight: 25
///       destination: Work
///       mode: { type: threshold, good_at: 20, zero_at: 46 }
///     - name: bedrooms
///       weight: 20
///       mode: { type: peak, ideal: 3, decay_above: 25, decay_below: 50 }
///   bonuses:
///     - { name: has_garage, points: 15 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// How criteria whose value can't be resolved count toward the average
    #[serde(default)]
    pub missing: MissingPolicy,

    #[serde(default)]
    pub criteria: Vec<Criterion>,

    #[serde(default)]
    pub bonuses: Vec<Bonus>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            missing: MissingPolicy::Zero,
            criteria: vec![
                Criterion {
                    name: "lot_size_acres".to_string(),
                    weight: 40.0,
                    destination: None,
                    mode: Mode::Linear {
                        min: 0.5,
                        max: 5.0,
                        direction: Direction::HigherIsBetter,
                    },
                },
                Criterion {
                    name: "commute".to_string(),
                    weight: 25.0,
                    destination: None,
                    mode: Mode::Threshold {
                        good_at: 20.0,
                        zero_at: 46.0,
                    },
                },
                Criterion {
                    name: "bedrooms".to_string(),
                    weight: 20.0,
                    destination: None,
                    mode: Mode::Peak {
                        ideal: 3.0,
                        decay_above: 50.0,
                        decay_below: 50.0,
                    },
                },
                Criterion {
                    name: "bathrooms".to_string(),
                    weight: 15.0,
                    destination: None,
                    mode: Mode::Linear {
                        min: 0.0,
                        max: 2.0,
                        direction: Direction::HigherIsBetter,
                    },
                },
            ],
            bonuses: vec![
                Bonus {
                    name: "has_garage".to_string(),
                    points: 15.0,
                },
                Bonus {
                    name: "has_basement".to_string(),
                    points: 5.0,
                },
                Bonus {
                    name: "has_fireplace".to_string(),
                    points: 3.0,
                },
            ],
        }
    }
}

/// Treatment of a criterion whose value is missing for a given property.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Sub-score 0, weight still counted in the denominator
    #[default]
    Zero,
    /// Leave the criterion out of both numerator and denominator
    Skip,
}

/// A single weighted input to the composite score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Criterion {
    /// Resolver name, e.g. "bedrooms" or "commute"
    pub name: String,

    /// Non-negative weight; weights need not sum to 100
    pub weight: f64,

    /// Commute destination label. Only valid for the `commute` criterion;
    /// when absent the worst commute across all destinations is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    pub mode: Mode,
}

impl Criterion {
    /// Label used in breakdowns: "commute:Work" for per-destination commutes
    pub fn label(&self) -> String {
        match &self.destination {
            Some(dest) => format!("{}:{}", self.name, dest),
            None => self.name.clone(),
        }
    }
}

/// Normalization mode and its parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mode {
    /// 0 at `min`, 100 at `max`, linear between (flipped for lower_is_better)
    Linear {
        min: f64,
        max: f64,
        #[serde(default)]
        direction: Direction,
    },
    /// 100 at/beyond `good_at`, 0 at/beyond `zero_at`
    Threshold { good_at: f64, zero_at: f64 },
    /// 100 at `ideal`, decaying linearly per unit of distance on each side
    Peak {
        ideal: f64,
        decay_above: f64,
        decay_below: f64,
    },
}

impl Mode {
    pub fn kind(&self) -> &'static str {
        match self {
            Mode::Linear { .. } => "linear",
            Mode::Threshold { .. } => "threshold",
            Mode::Peak { .. } => "peak",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// Flat points added when the named boolean feature is present.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Bonus {
    pub name: String,
    pub points: f64,
}
