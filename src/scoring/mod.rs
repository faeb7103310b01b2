pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod validation;

pub use config::*;
pub use engine::{
    calculate_score, BonusContribution, CriterionContribution, ScoreBreakdown, ScoreResult, Scorer,
    PRICE_UNIT,
};
pub use error::{ConfigIssue, InvalidScoringConfig, ScoreError};
pub use validation::validate_scoring;
