//! Name → accessor tables for criteria and bonuses.
//!
//! Criterion names are looked up once when a [`Scorer`](super::Scorer) is
//! built; a new criterion is a new row in [`CRITERIA`].

use crate::property::Property;

/// Per-criterion lookup context (currently just the commute destination).
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    pub destination: Option<&'a str>,
}

/// Returns the raw value for a criterion, or None when it can't be resolved.
pub type CriterionFn = fn(&Property, &ResolveContext<'_>) -> Option<f64>;

/// Returns the state of a boolean feature (None when unknown).
pub type BonusFn = fn(&Property) -> Option<bool>;

/// Criteria that accept a `destination` parameter.
pub const DESTINATION_CRITERIA: &[&str] = &["commute"];

pub const CRITERIA: &[(&str, CriterionFn)] = &[
    ("bedrooms", bedrooms),
    ("bathrooms", bathrooms),
    ("sqft", sqft),
    ("lot_size_acres", lot_size_acres),
    ("year_built", year_built),
    ("hoa_monthly", hoa_monthly),
    ("property_tax", property_tax),
    ("tax_assessment", tax_assessment),
    ("garage_spaces", garage_spaces),
    ("days_on_market", days_on_market),
    ("commute", commute),
];

pub const BONUSES: &[(&str, BonusFn)] = &[
    ("has_garage", has_garage),
    ("has_basement", has_basement),
    ("has_fireplace", has_fireplace),
    ("has_pool", has_pool),
    ("has_cooling", has_cooling),
    ("has_heating", has_heating),
];

// The enrichment provider reports unknown physical attributes as zero.
fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn bedrooms(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    known(p.bedrooms.map(f64::from))
}

fn bathrooms(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    known(p.bathrooms)
}

fn sqft(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    known(p.sqft.map(f64::from))
}

fn lot_size_acres(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    known(p.lot_size_acres)
}

fn year_built(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    known(p.year_built.map(f64::from))
}

fn hoa_monthly(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    p.hoa_monthly.map(f64::from)
}

fn property_tax(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    p.property_tax.map(f64::from)
}

fn tax_assessment(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    known(p.tax_assessment.map(f64::from))
}

fn garage_spaces(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    p.garage_spaces.map(f64::from)
}

fn days_on_market(p: &Property, _: &ResolveContext<'_>) -> Option<f64> {
    p.days_on_market.map(f64::from)
}

fn commute(p: &Property, ctx: &ResolveContext<'_>) -> Option<f64> {
    let minutes = match ctx.destination {
        Some(label) => p.commute_minutes.get(label).copied(),
        None => p.worst_commute(),
    };
    minutes.map(f64::from)
}

fn has_garage(p: &Property) -> Option<bool> {
    p.has_garage
}

fn has_basement(p: &Property) -> Option<bool> {
    p.has_basement
}

fn has_fireplace(p: &Property) -> Option<bool> {
    p.has_fireplace
}

fn has_pool(p: &Property) -> Option<bool> {
    p.has_pool
}

fn has_cooling(p: &Property) -> Option<bool> {
    p.has_cooling
}

fn has_heating(p: &Property) -> Option<bool> {
    p.has_heating
}

pub fn lookup_criterion(name: &str) -> Option<CriterionFn> {
    CRITERIA
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, resolve)| *resolve)
}

pub fn lookup_bonus(name: &str) -> Option<BonusFn> {
    BONUSES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, resolve)| *resolve)
}

pub fn accepts_destination(name: &str) -> bool {
    DESTINATION_CRITERIA.contains(&name)
}

pub fn criterion_names() -> impl Iterator<Item = &'static str> {
    CRITERIA.iter().map(|(n, _)| *n)
}

pub fn bonus_names() -> impl Iterator<Item = &'static str> {
    BONUSES.iter().map(|(n, _)| *n)
}
