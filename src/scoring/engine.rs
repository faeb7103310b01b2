use std::fmt;

use tracing::debug;

use super::config::{MissingPolicy, Mode, ScoringConfig};
use super::error::{InvalidScoringConfig, ScoreError};
use super::normalize::{normalize, MAX_SCORE};
use super::resolver::{lookup_bonus, lookup_criterion, BonusFn, CriterionFn, ResolveContext};
use super::validation::validate_scoring;
use crate::property::Property;

/// Dollars per price unit in the value ratio.
pub const PRICE_UNIT: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionContribution {
    pub label: String,       // e.g. "bedrooms", "commute:Work"
    pub mode: &'static str,  // "linear", "threshold", "peak"
    pub raw: Option<f64>,    // None when the value couldn't be resolved
    pub normalized: f64,     // 0-100 sub-score
    pub weight: f64,
    pub contribution: f64,   // Points this criterion adds to the weighted average
    pub counted: bool,       // Whether the weight is part of the denominator
}

#[derive(Debug, Clone, PartialEq)]
pub struct BonusContribution {
    pub name: String,
    pub points: f64,
    pub awarded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub criteria: Vec<CriterionContribution>,
    pub bonuses: Vec<BonusContribution>,
    pub weight_total: f64,
    pub weighted_average: f64,
    pub bonus_total: f64,
    /// `min(100, weighted_average + bonus_total)`
    pub score: f64,
}

impl ScoreBreakdown {
    /// Labels of criteria whose value couldn't be resolved
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.criteria
            .iter()
            .filter(|c| c.raw.is_none())
            .map(|c| c.label.as_str())
    }

    /// One-line summary: "lot_size_acres=44 | commute=? | +has_garage=15"
    pub fn summary(&self) -> String {
        let criteria = self.criteria.iter().map(|c| match c.raw {
            Some(_) => format!("{}={:.0}", c.label, c.normalized),
            None => format!("{}=?", c.label),
        });
        let bonuses = self
            .bonuses
            .iter()
            .filter(|b| b.awarded)
            .map(|b| format!("+{}={:.0}", b.name, b.points));
        criteria.chain(bonuses).collect::<Vec<_>>().join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    /// Score per $100k of asking price
    pub value_ratio: f64,
    /// At least one criterion had no value for this property
    pub incomplete: bool,
    pub breakdown: ScoreBreakdown,
}

#[derive(Clone)]
struct CompiledCriterion {
    label: String,
    destination: Option<String>,
    weight: f64,
    mode: Mode,
    resolve: CriterionFn,
}

#[derive(Clone)]
struct CompiledBonus {
    name: String,
    points: f64,
    feature: BonusFn,
}

/// A validated scoring configuration with every criterion bound to its
/// resolver. Immutable once built and safe to share across threads.
#[derive(Clone)]
pub struct Scorer {
    missing: MissingPolicy,
    criteria: Vec<CompiledCriterion>,
    bonuses: Vec<CompiledBonus>,
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer")
            .field("missing", &self.missing)
            .field(
                "criteria",
                &self.criteria.iter().map(|c| &c.label).collect::<Vec<_>>(),
            )
            .field(
                "bonuses",
                &self.bonuses.iter().map(|b| &b.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Scorer {
    /// Validate and compile a scoring configuration.
    pub fn new(config: &ScoringConfig) -> Result<Self, InvalidScoringConfig> {
        Self::with_destinations(config, &[])
    }

    /// Like [`Scorer::new`], also checking commute destinations against the
    /// configured labels.
    pub fn with_destinations(
        config: &ScoringConfig,
        destinations: &[String],
    ) -> Result<Self, InvalidScoringConfig> {
        validate_scoring(config, destinations)?;

        // Validation guarantees every name resolves
        let criteria = config
            .criteria
            .iter()
            .filter_map(|c| {
                lookup_criterion(&c.name).map(|resolve| CompiledCriterion {
                    label: c.label(),
                    destination: c.destination.clone(),
                    weight: c.weight,
                    mode: c.mode.clone(),
                    resolve,
                })
            })
            .collect();
        let bonuses = config
            .bonuses
            .iter()
            .filter_map(|b| {
                lookup_bonus(&b.name).map(|feature| CompiledBonus {
                    name: b.name.clone(),
                    points: b.points,
                    feature,
                })
            })
            .collect();

        Ok(Self {
            missing: config.missing,
            criteria,
            bonuses,
        })
    }

    /// Composite score and per-criterion breakdown. Does not look at price.
    pub fn breakdown(&self, property: &Property) -> ScoreBreakdown {
        let mut criteria = Vec::with_capacity(self.criteria.len());
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for criterion in &self.criteria {
            let ctx = ResolveContext {
                destination: criterion.destination.as_deref(),
            };
            let raw = (criterion.resolve)(property, &ctx).filter(|v| v.is_finite());

            let (normalized, counted) = match raw {
                Some(value) => (normalize(value, &criterion.mode), true),
                None => {
                    debug!(
                        listing_id = %property.listing_id,
                        criterion = %criterion.label,
                        missing = ?self.missing,
                        "criterion value unresolvable"
                    );
                    (0.0, self.missing == MissingPolicy::Zero)
                }
            };

            if counted {
                weighted_sum += normalized * criterion.weight;
                weight_total += criterion.weight;
            }

            criteria.push(CriterionContribution {
                label: criterion.label.clone(),
                mode: criterion.mode.kind(),
                raw,
                normalized,
                weight: criterion.weight,
                contribution: 0.0,
                counted,
            });
        }

        let weighted_average = if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        };

        for c in criteria.iter_mut().filter(|c| c.counted && weight_total > 0.0) {
            c.contribution = c.normalized * c.weight / weight_total;
        }

        let bonuses: Vec<_> = self
            .bonuses
            .iter()
            .map(|b| BonusContribution {
                name: b.name.clone(),
                points: b.points,
                awarded: (b.feature)(property) == Some(true),
            })
            .collect();
        let bonus_total: f64 = bonuses.iter().filter(|b| b.awarded).map(|b| b.points).sum();

        let score = (weighted_average + bonus_total).clamp(0.0, MAX_SCORE);

        ScoreBreakdown {
            criteria,
            bonuses,
            weight_total,
            weighted_average,
            bonus_total,
            score,
        }
    }

    /// Score a property and compute its value ratio.
    ///
    /// Fails with [`ScoreError::MissingPrice`] when the property has no
    /// strictly positive price.
    pub fn score(&self, property: &Property) -> Result<ScoreResult, ScoreError> {
        let price_units = property
            .price_units()
            .ok_or_else(|| ScoreError::MissingPrice {
                listing_id: property.listing_id.clone(),
            })?;

        let breakdown = self.breakdown(property);
        let incomplete = breakdown.unresolved().next().is_some();
        Ok(ScoreResult {
            score: breakdown.score,
            value_ratio: breakdown.score / price_units,
            incomplete,
            breakdown,
        })
    }
}

/// Validate `config` and score a single property against it.
pub fn calculate_score(
    property: &Property,
    config: &ScoringConfig,
) -> Result<ScoreResult, ScoreError> {
    Scorer::new(config)?.score(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Bonus, Criterion, Direction};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn sample_property() -> Property {
        let mut prop = Property {
            listing_id: "111".to_string(),
            address: "123 Test St".to_string(),
            price: Some(300_000),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            sqft: Some(1800),
            lot_size_acres: Some(3.0),
            year_built: Some(2000),
            ..Default::default()
        };
        prop.commute_minutes.insert("Work".to_string(), 15);
        prop.commute_minutes.insert("School".to_string(), 20);
        prop
    }

    fn single(name: &str, weight: f64, mode: Mode) -> ScoringConfig {
        ScoringConfig {
            missing: MissingPolicy::Zero,
            criteria: vec![Criterion {
                name: name.to_string(),
                weight,
                destination: None,
                mode,
            }],
            bonuses: vec![],
        }
    }

    fn lot_mode() -> Mode {
        Mode::Linear {
            min: 0.5,
            max: 5.0,
            direction: Direction::HigherIsBetter,
        }
    }

    fn commute_mode() -> Mode {
        Mode::Threshold {
            good_at: 20.0,
            zero_at: 46.0,
        }
    }

    #[test]
    fn test_hand_calculated_score() {
        // Lot 3.0: (3.0 - 0.5) / 4.5 * 100 = 55.56   (weight 40)
        // Commute worst=20: 100                       (weight 25)
        // Bedrooms 3 at ideal: 100                    (weight 20)
        // Bathrooms 2 of 0..2: 100                    (weight 15)
        // (55.56*40 + 2500 + 2000 + 1500) / 100 = 82.22
        let result = calculate_score(&sample_property(), &ScoringConfig::default()).unwrap();
        assert!(approx(result.breakdown.weighted_average, 82.222222222));
        assert!(approx(result.score, 82.222222222));
        assert!(!result.incomplete);
        assert!(approx(result.value_ratio, 82.222222222 / 3.0));
    }

    #[test]
    fn test_lot_size_contribution() {
        let mut config = single("lot_size_acres", 40.0, lot_mode());
        config.criteria.push(Criterion {
            name: "bathrooms".to_string(),
            weight: 60.0,
            destination: None,
            mode: Mode::Linear {
                min: 0.0,
                max: 2.0,
                direction: Direction::HigherIsBetter,
            },
        });
        let prop = Property {
            lot_size_acres: Some(2.5),
            bathrooms: Some(2.0),
            price: Some(100_000),
            ..Default::default()
        };
        let result = calculate_score(&prop, &config).unwrap();
        let lot = &result.breakdown.criteria[0];
        assert!(approx(lot.normalized, 44.444444));
        assert!(approx(lot.contribution, 17.777778));
    }

    #[test]
    fn test_commute_under_good_at_gets_full_contribution() {
        let mut config = single("commute", 25.0, commute_mode());
        config.criteria[0].destination = Some("Work".to_string());
        config.criteria.push(Criterion {
            name: "bedrooms".to_string(),
            weight: 75.0,
            destination: None,
            mode: Mode::Peak {
                ideal: 3.0,
                decay_above: 25.0,
                decay_below: 25.0,
            },
        });
        let mut prop = sample_property();
        prop.commute_minutes.insert("Work".to_string(), 14);
        let result = calculate_score(&prop, &config).unwrap();
        let commute = &result.breakdown.criteria[0];
        assert_eq!(commute.label, "commute:Work");
        assert_eq!(commute.normalized, 100.0);
        assert!(approx(commute.contribution, 25.0));
    }

    #[test]
    fn test_bedroom_peak_scenarios() {
        let config = single(
            "bedrooms",
            20.0,
            Mode::Peak {
                ideal: 3.0,
                decay_above: 25.0,
                decay_below: 50.0,
            },
        );
        let mut prop = sample_property();
        assert_eq!(calculate_score(&prop, &config).unwrap().score, 100.0);
        prop.bedrooms = Some(5);
        assert_eq!(calculate_score(&prop, &config).unwrap().score, 50.0);
    }

    #[test]
    fn test_bonus_features_add_flat_points() {
        let config = ScoringConfig::default();
        let mut low = sample_property();
        low.lot_size_acres = Some(0.6);
        low.commute_minutes.clear();
        low.commute_minutes.insert("Work".to_string(), 40);

        let mut all = low.clone();
        all.has_garage = Some(true);
        all.has_basement = Some(true);
        all.has_fireplace = Some(true);

        let s_none = calculate_score(&low, &config).unwrap();
        let s_all = calculate_score(&all, &config).unwrap();
        assert!(approx(s_all.score - s_none.score, 23.0));
        assert_eq!(s_all.breakdown.bonus_total, 23.0);
    }

    #[test]
    fn test_unknown_bonus_feature_awards_nothing() {
        let config = ScoringConfig::default();
        let mut no = sample_property();
        no.has_garage = Some(false);
        let unknown = sample_property();
        let s_no = calculate_score(&no, &config).unwrap();
        let s_unknown = calculate_score(&unknown, &config).unwrap();
        assert_eq!(s_no.score, s_unknown.score);
        assert_eq!(s_unknown.breakdown.bonus_total, 0.0);
    }

    #[test]
    fn test_score_capped_at_100() {
        let mut perfect = sample_property();
        perfect.lot_size_acres = Some(5.0);
        perfect.has_garage = Some(true);
        perfect.has_basement = Some(true);
        perfect.has_fireplace = Some(true);
        let result = calculate_score(&perfect, &ScoringConfig::default()).unwrap();
        assert_eq!(result.score, 100.0);
        assert!(result.breakdown.weighted_average + result.breakdown.bonus_total > 100.0);
    }

    #[test]
    fn test_score_never_negative() {
        let mut worst = sample_property();
        worst.lot_size_acres = Some(0.5);
        worst.bedrooms = Some(9);
        worst.bathrooms = Some(0.5);
        worst.commute_minutes.insert("Work".to_string(), 90);
        let result = calculate_score(&worst, &ScoringConfig::default()).unwrap();
        assert!(result.score >= 0.0);
    }

    #[test]
    fn test_missing_value_scores_zero_by_default() {
        let mut prop = sample_property();
        prop.commute_minutes.clear();
        let result = calculate_score(&prop, &ScoringConfig::default()).unwrap();

        assert!(result.incomplete);
        assert_eq!(result.breakdown.unresolved().collect::<Vec<_>>(), vec!["commute"]);
        let commute = &result.breakdown.criteria[1];
        assert_eq!(commute.normalized, 0.0);
        assert!(commute.counted);
        assert_eq!(result.breakdown.weight_total, 100.0);
        // 55.56*0.4 + 0 + 20 + 15
        assert!(approx(result.score, 57.222222222));
    }

    #[test]
    fn test_missing_value_skipped_when_configured() {
        let mut prop = sample_property();
        prop.commute_minutes.clear();
        let config = ScoringConfig {
            missing: MissingPolicy::Skip,
            ..ScoringConfig::default()
        };
        let result = calculate_score(&prop, &config).unwrap();

        assert!(result.incomplete);
        assert!(!result.breakdown.criteria[1].counted);
        assert_eq!(result.breakdown.weight_total, 75.0);
        // (55.56*40 + 2000 + 1500) / 75
        assert!(approx(result.score, (2222.222222222 + 3500.0) / 75.0));
    }

    #[test]
    fn test_weights_need_not_sum_to_100() {
        let config = ScoringConfig {
            criteria: ScoringConfig::default()
                .criteria
                .into_iter()
                .map(|mut c| {
                    c.weight /= 10.0;
                    c
                })
                .collect(),
            ..ScoringConfig::default()
        };
        let scaled = calculate_score(&sample_property(), &config).unwrap();
        let reference = calculate_score(&sample_property(), &ScoringConfig::default()).unwrap();
        assert!(approx(scaled.score, reference.score));
    }

    #[test]
    fn test_zero_weight_criterion_has_no_effect() {
        let mut config = ScoringConfig::default();
        config.criteria.push(Criterion {
            name: "sqft".to_string(),
            weight: 0.0,
            destination: None,
            mode: Mode::Linear {
                min: 5000.0,
                max: 6000.0,
                direction: Direction::HigherIsBetter,
            },
        });
        let with = calculate_score(&sample_property(), &config).unwrap();
        let without = calculate_score(&sample_property(), &ScoringConfig::default()).unwrap();
        assert!(approx(with.score, without.score));
    }

    #[test]
    fn test_zero_price_is_missing_price() {
        let mut prop = sample_property();
        prop.price = Some(0);
        let err = calculate_score(&prop, &ScoringConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::MissingPrice {
                listing_id: "111".to_string()
            }
        );
    }

    #[test]
    fn test_absent_and_negative_price_are_missing_price() {
        for price in [None, Some(-1)] {
            let mut prop = sample_property();
            prop.price = price;
            assert!(matches!(
                calculate_score(&prop, &ScoringConfig::default()),
                Err(ScoreError::MissingPrice { .. })
            ));
        }
    }

    #[test]
    fn test_breakdown_available_without_price() {
        let mut prop = sample_property();
        prop.price = None;
        let scorer = Scorer::new(&ScoringConfig::default()).unwrap();
        assert!(approx(scorer.breakdown(&prop).score, 82.222222222));
    }

    #[test]
    fn test_unknown_criterion_is_an_error() {
        let config = single("vibes", 10.0, lot_mode());
        match calculate_score(&sample_property(), &config) {
            Err(ScoreError::InvalidConfig(err)) => assert!(err.has_unknown_criterion()),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_cheaper_house_has_higher_ratio() {
        let mut cheap = sample_property();
        cheap.price = Some(150_000);
        let mut expensive = sample_property();
        expensive.price = Some(450_000);
        let config = ScoringConfig::default();
        let s_cheap = calculate_score(&cheap, &config).unwrap();
        let s_expensive = calculate_score(&expensive, &config).unwrap();
        assert_eq!(s_cheap.score, s_expensive.score);
        assert!(s_cheap.value_ratio > s_expensive.value_ratio);
    }

    #[test]
    fn test_summary_string() {
        let mut prop = sample_property();
        prop.has_garage = Some(true);
        prop.commute_minutes.clear();
        let result = calculate_score(&prop, &ScoringConfig::default()).unwrap();
        let summary = result.breakdown.summary();
        assert!(summary.starts_with("lot_size_acres=56"));
        assert!(summary.contains("commute=?"));
        assert!(summary.contains("+has_garage=15"));
        assert!(!summary.contains("has_basement"));
    }

    #[test]
    fn test_scorer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scorer>();
    }
}
