use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listings store (defaults to ~/.config/listing-rank/listings.json)
    #[serde(default)]
    pub listings_path: Option<PathBuf>,

    /// Scores sheet (defaults to ~/.config/listing-rank/scores.tsv)
    #[serde(default)]
    pub scores_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. "info" or "listing_rank=debug"
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub commute: Option<CommuteConfig>,

    /// Scoring matrix; the built-in default is used when absent
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Labels of the configured commute destinations, in config order
    pub fn commute_labels(&self) -> Vec<String> {
        self.commute
            .as_ref()
            .map(|c| c.destinations.iter().map(|d| d.label.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommuteConfig {
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

/// A named commute destination. The address is consumed by the commute
/// lookup that populates each listing's `commute_minutes`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Destination {
    pub label: String,
    pub address: String,
}
