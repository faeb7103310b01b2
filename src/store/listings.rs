use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::property::Property;

const STORE_VERSION: u32 = 1;

/// Append-only record of every enriched listing seen so far.
///
/// Scores are never stored here; they are recomputed from these records on
/// every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingStore {
    pub version: u32,
    #[serde(default)]
    pub listings: Vec<Property>,
}

impl Default for ListingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingStore {
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            listings: Vec::new(),
        }
    }

    pub fn contains(&self, listing_id: &str) -> bool {
        self.listings.iter().any(|p| p.listing_id == listing_id)
    }

    pub fn listing_ids(&self) -> HashSet<&str> {
        self.listings.iter().map(|p| p.listing_id.as_str()).collect()
    }

    pub fn get(&self, listing_id: &str) -> Option<&Property> {
        self.listings.iter().find(|p| p.listing_id == listing_id)
    }

    /// Append a listing unless its id is already stored.
    /// Stamps `date_added` when the record doesn't carry one.
    /// Returns false for duplicates.
    pub fn add(&mut self, mut property: Property, today: NaiveDate) -> bool {
        if self.contains(&property.listing_id) {
            return false;
        }
        property.date_added.get_or_insert(today);
        self.listings.push(property);
        true
    }
}

/// Get the default listings file path (~/.config/listing-rank/listings.json)
pub fn get_listings_path() -> PathBuf {
    crate::config::get_config_dir().join("listings.json")
}

/// Load the listing store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_listings(path: &Path) -> Result<ListingStore> {
    if !path.exists() {
        return Ok(ListingStore::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open listings file at {}", path.display()))?;

    let store: ListingStore = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse listings file at {}", path.display()))?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported listings store version: {}", store.version);
    }

    Ok(store)
}

/// Save the listing store atomically, creating the parent directory if needed.
pub fn save_listings(path: &Path, store: &ListingStore) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize listings")?;

    file.commit().context("Failed to save listings")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn listing(id: &str) -> Property {
        Property {
            listing_id: id.to_string(),
            address: format!("{} Main St", id),
            price: Some(250_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_listings(&dir.path().join("listings.json")).unwrap();
        assert_eq!(store.version, 1);
        assert!(store.listings.is_empty());
    }

    #[test]
    fn test_add_skips_duplicates() {
        let mut store = ListingStore::new();
        assert!(store.add(listing("1"), day(1)));
        assert!(!store.add(listing("1"), day(2)));
        assert!(store.add(listing("2"), day(2)));
        assert_eq!(store.listings.len(), 2);
        assert_eq!(store.get("1").unwrap().date_added, Some(day(1)));
        assert!(store.listing_ids().contains("2"));
    }

    #[test]
    fn test_add_keeps_existing_date() {
        let mut store = ListingStore::new();
        let mut prop = listing("1");
        prop.date_added = Some(day(5));
        store.add(prop, day(9));
        assert_eq!(store.get("1").unwrap().date_added, Some(day(5)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("listings.json");

        let mut store = ListingStore::new();
        let mut prop = listing("1");
        prop.commute_minutes.insert("Work".to_string(), 22);
        prop.has_garage = Some(true);
        store.add(prop, day(1));
        store.add(listing("2"), day(1));

        save_listings(&path, &store).unwrap();
        let loaded = load_listings(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        fs::write(&path, r#"{"version": 7, "listings": []}"#).unwrap();
        let err = load_listings(&path).unwrap_err();
        assert!(err.to_string().contains("version"));
    }
}
