//! Rebuild: re-score the whole listing history and order it by value.

use std::cmp::Ordering;

use tracing::warn;

use crate::property::Property;
use crate::scoring::{InvalidScoringConfig, ScoreResult, Scorer, ScoringConfig};

/// A property paired with its freshly computed score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProperty<'a> {
    pub property: &'a Property,
    pub result: ScoreResult,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking<'a> {
    /// Sorted by value ratio, then score (both descending), then listing id
    pub ranked: Vec<RankedProperty<'a>>,
    /// Listing ids left out because they have no usable price
    pub excluded: Vec<&'a str>,
}

impl<'a> Ranking<'a> {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn top(&self, n: usize) -> &[RankedProperty<'a>] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Ordering used for the ranked output.
pub fn compare(a: &RankedProperty<'_>, b: &RankedProperty<'_>) -> Ordering {
    b.result
        .value_ratio
        .total_cmp(&a.result.value_ratio)
        .then_with(|| b.result.score.total_cmp(&a.result.score))
        .then_with(|| a.property.listing_id.cmp(&b.property.listing_id))
}

/// Score every property and sort the results.
///
/// Properties are only borrowed: ranking never touches stored attributes, so
/// a config change re-ranks history without rewriting it.
pub fn rank<'a>(properties: &'a [Property], scorer: &Scorer) -> Ranking<'a> {
    let mut ranking = Ranking::default();

    for property in properties {
        match scorer.score(property) {
            Ok(result) => ranking.ranked.push(RankedProperty { property, result }),
            Err(err) => {
                warn!(listing_id = %property.listing_id, "excluded from ranking: {}", err);
                ranking.excluded.push(&property.listing_id);
            }
        }
    }

    ranking.ranked.sort_by(compare);
    ranking
}

/// Validate `config` and rank `properties` against it.
pub fn rank_with_config<'a>(
    properties: &'a [Property],
    config: &ScoringConfig,
) -> Result<Ranking<'a>, InvalidScoringConfig> {
    let scorer = Scorer::new(config)?;
    Ok(rank(properties, &scorer))
}
