//! The "Scores" sheet: rebuilt from scratch on every run as tab-separated
//! values, one row per ranked listing.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::rank::Ranking;

/// Get the default scores sheet path (~/.config/listing-rank/scores.tsv)
pub fn get_scores_path() -> PathBuf {
    crate::config::get_config_dir().join("scores.tsv")
}

/// Sheet headers, with one commute column per configured destination.
pub fn scores_headers(commute_labels: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = ["Value Ratio", "Score", "Address", "Listing Price"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    headers.extend(commute_labels.iter().map(|l| format!("Commute ({})", l)));
    headers.extend(
        [
            "Beds",
            "Baths",
            "SqFt",
            "Lot (acres)",
            "Garage",
            "Basement",
            "Fireplace",
            "Score Breakdown",
            "Listing ID",
            "Link",
        ]
        .iter()
        .map(|h| h.to_string()),
    );
    headers
}

/// Render the full sheet, header row first.
pub fn render_scores_sheet(ranking: &Ranking<'_>, commute_labels: &[String]) -> String {
    let mut lines = vec![scores_headers(commute_labels).join("\t")];

    for ranked in &ranking.ranked {
        let p = ranked.property;
        let r = &ranked.result;

        let mut row = vec![
            format!("{:.2}", r.value_ratio),
            format!("{:.1}", r.score),
            cell(&p.address),
            opt(p.price),
        ];
        row.extend(
            commute_labels
                .iter()
                .map(|l| opt(p.commute_minutes.get(l))),
        );
        row.extend([
            opt(p.bedrooms),
            opt(p.bathrooms),
            opt(p.sqft),
            opt(p.lot_size_acres),
            yes_no(p.has_garage),
            yes_no(p.has_basement),
            yes_no(p.has_fireplace),
            cell(&r.breakdown.summary()),
            cell(&p.listing_id),
            cell(&p.listing_url),
        ]);
        lines.push(row.join("\t"));
    }

    lines.join("\n") + "\n"
}

/// Replace the sheet at `path` with the current ranking.
pub fn write_scores_sheet(path: &Path, ranking: &Ranking<'_>, commute_labels: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(render_scores_sheet(ranking, commute_labels).as_bytes())
        .context("Failed to write scores sheet")?;
    file.commit().context("Failed to save scores sheet")?;

    Ok(())
}

/// Three-valued feature cell: Yes / No / blank when unknown
fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => String::new(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// Tabs and newlines would break the row layout
fn cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
