use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An enriched real-estate listing.
///
/// Attributes the enrichment provider could not supply are `None`. Boolean
/// features are three-valued: `Some(false)` means the provider reported the
/// feature absent, `None` means nobody knows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Property {
    pub listing_id: String,
    pub address: String,
    pub listing_url: String,
    pub date_added: Option<NaiveDate>,
    pub price: Option<i64>,           // Asking price in dollars
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub sqft: Option<u32>,
    pub lot_size_acres: Option<f64>,
    pub year_built: Option<u32>,
    pub hoa_monthly: Option<u32>,
    pub property_tax: Option<u32>,    // Most recent year
    pub tax_assessment: Option<u32>,  // Most recent year
    pub garage_spaces: Option<u32>,
    pub days_on_market: Option<u32>,
    pub property_type: Option<String>,
    pub has_garage: Option<bool>,
    pub has_basement: Option<bool>,
    pub has_fireplace: Option<bool>,
    pub has_pool: Option<bool>,
    pub has_cooling: Option<bool>,
    pub has_heating: Option<bool>,
    /// Drive time in minutes keyed by destination label ("Work", "School").
    pub commute_minutes: BTreeMap<String, u32>,
}

impl Property {
    /// Price in units of $100,000, or None when the price can't be ranked on
    pub fn price_units(&self) -> Option<f64> {
        match self.price {
            Some(p) if p > 0 => Some(p as f64 / 100_000.0),
            _ => None,
        }
    }

    /// Worst (longest) commute across all destinations
    pub fn worst_commute(&self) -> Option<u32> {
        self.commute_minutes.values().copied().max()
    }

    /// Address if known, otherwise the listing id
    pub fn display_name(&self) -> &str {
        if self.address.is_empty() {
            &self.listing_id
        } else {
            &self.address
        }
    }
}
