use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::property::Property;
use crate::rank::RankedProperty;
use crate::scoring::ScoreBreakdown;

/// Scores at or above this are highlighted green
const STRONG_SCORE: f64 = 75.0;
/// Scores at or above this are highlighted yellow
const FAIR_SCORE: f64 = 50.0;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal.
/// If incomplete is true, appends asterisk to indicate some criteria had no data
pub fn format_score(score: f64, incomplete: bool) -> String {
    if incomplete {
        format!("{:.1}*", score)
    } else {
        format!("{:.1}", score)
    }
}

/// Format a price in compact notation ($325k, $1.2M)
pub fn format_price(price: Option<i64>) -> String {
    let Some(price) = price else {
        return "-".to_string();
    };
    let price = price as f64;
    let formatted = if price >= 1_000_000.0 {
        format!("${:.1}M", price / 1_000_000.0)
    } else if price >= 1_000.0 {
        format!("${:.0}k", price / 1_000.0)
    } else {
        format!("${:.0}", price)
    };

    // Trim trailing .0 (e.g., "$1.0M" -> "$1M")
    formatted.replace(".0M", "M")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked listings as a table with columns: Index, Ratio, Score, Price, Address
/// No headers (minimal format)
/// Rows scoring >= 75 are green, >= 50 yellow when colors are on
pub fn format_ranked_table(ranked: &[RankedProperty], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No listings to rank.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 4;
    let ratio_width = 7;
    let score_width = 6;
    let price_width = 7;
    let separator = "  ";

    ranked
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let index_str = format!("{:>3}.", idx + 1);
            let ratio_str = format!("{:>width$.2}", item.result.value_ratio, width = ratio_width);
            let score_str = format!(
                "{:>width$}",
                format_score(item.result.score, item.result.incomplete),
                width = score_width
            );
            let price_str = format!(
                "{:>width$}",
                format_price(item.property.price),
                width = price_width
            );

            let fixed_width =
                index_width + 1 + ratio_width + score_width + price_width + separator.len() * 3;
            let name = item.property.display_name();
            let address = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(name, width - fixed_width),
                Some(_) => truncate(name, 20),
                None => name.to_string(),
            };

            if use_colors {
                let score = item.result.score;
                let ratio = if score >= STRONG_SCORE {
                    ratio_str.green().bold().to_string()
                } else if score >= FAIR_SCORE {
                    ratio_str.yellow().bold().to_string()
                } else {
                    ratio_str.bold().to_string()
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    ratio,
                    separator,
                    score_str,
                    separator,
                    price_str.cyan(),
                    separator,
                    address
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, ratio_str, separator, score_str, separator, price_str, separator, address
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked listings as tab-separated values for scripting
/// Columns: value_ratio, score, price, listing_id, address (no headers, no colors)
pub fn format_tsv(ranked: &[RankedProperty]) -> String {
    ranked
        .iter()
        .map(|item| {
            format!(
                "{:.2}\t{:.1}\t{}\t{}\t{}",
                item.result.value_ratio,
                item.result.score,
                item.property.price.unwrap_or_default(),
                item.property.listing_id,
                item.property.address
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single property with detailed multi-line output
pub fn format_property_detail(prop: &Property, use_colors: bool) -> String {
    let beds = prop.bedrooms.map_or("?".to_string(), |b| b.to_string());
    let baths = prop.bathrooms.map_or("?".to_string(), |b| b.to_string());
    let sqft = prop.sqft.map_or("?".to_string(), |s| s.to_string());
    let lot = prop
        .lot_size_acres
        .map_or("?".to_string(), |l| format!("{:.2}", l));
    let commutes = if prop.commute_minutes.is_empty() {
        "none".to_string()
    } else {
        prop.commute_minutes
            .iter()
            .map(|(label, minutes)| format!("{} {}m", label, minutes))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let title = prop.display_name();
    if use_colors {
        format!(
            "{}\n  Listing: {}\n  Price: {}\n  Size: {}bd/{}ba, {} sqft, {} acres\n  Commutes: {}\n  URL: {}",
            title.bold(),
            prop.listing_id.cyan(),
            format_price(prop.price).yellow(),
            beds,
            baths,
            sqft,
            lot,
            commutes,
            prop.listing_url.underline()
        )
    } else {
        format!(
            "{}\n  Listing: {}\n  Price: {}\n  Size: {}bd/{}ba, {} sqft, {} acres\n  Commutes: {}\n  URL: {}",
            title,
            prop.listing_id,
            format_price(prop.price),
            beds,
            baths,
            sqft,
            lot,
            commutes,
            prop.listing_url
        )
    }
}

/// Format a per-criterion breakdown, one line per criterion and awarded bonus
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut lines: Vec<String> = breakdown
        .criteria
        .iter()
        .map(|c| {
            let raw = c.raw.map_or("missing".to_string(), |v| format!("{}", v));
            let note = if c.counted { "" } else { " (skipped)" };
            format!(
                "  {:<18} {:<9} raw={:<8} sub={:>5.1}  w={:<5} -> {:>5.2}{}",
                c.label, c.mode, raw, c.normalized, c.weight, c.contribution, note
            )
        })
        .collect();

    lines.extend(
        breakdown
            .bonuses
            .iter()
            .filter(|b| b.awarded)
            .map(|b| format!("  {:<18} bonus     +{}", b.name, b.points)),
    );

    lines.push(format!(
        "  weighted avg {:.1} + bonus {:.1} = {:.1}",
        breakdown.weighted_average, breakdown.bonus_total, breakdown.score
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::rank;
    use crate::scoring::{Scorer, ScoringConfig};

    fn sample_property() -> Property {
        let mut prop = Property {
            listing_id: "111".to_string(),
            address: "123 Test St".to_string(),
            listing_url: "https://example.com/111".to_string(),
            price: Some(325_000),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            sqft: Some(1800),
            lot_size_acres: Some(3.0),
            has_garage: Some(true),
            ..Default::default()
        };
        prop.commute_minutes.insert("Work".to_string(), 15);
        prop
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(82.2222, false), "82.2");
        assert_eq!(format_score(57.0, true), "57.0*");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(325_000)), "$325k");
        assert_eq!(format_price(Some(1_240_000)), "$1.2M");
        assert_eq!(format_price(Some(2_000_000)), "$2M");
        assert_eq!(format_price(Some(950)), "$950");
        assert_eq!(format_price(None), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer address", 8), "a lon...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(format_ranked_table(&[], false), "No listings to rank.");
    }

    #[test]
    fn test_format_ranked_table_plain() {
        let props = vec![sample_property()];
        let scorer = Scorer::new(&ScoringConfig::default()).unwrap();
        let ranking = rank(&props, &scorer);
        let table = format_ranked_table(&ranking.ranked, false);
        assert!(table.starts_with("  1."));
        assert!(table.contains("$325k"));
        assert!(table.contains("97.2"));
    }

    #[test]
    fn test_format_tsv() {
        let props = vec![sample_property()];
        let scorer = Scorer::new(&ScoringConfig::default()).unwrap();
        let ranking = rank(&props, &scorer);
        let tsv = format_tsv(&ranking.ranked);
        let fields: Vec<&str> = tsv.split('\t').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[2], "325000");
        assert_eq!(fields[3], "111");
        assert_eq!(fields[4], "123 Test St");
    }

    #[test]
    fn test_format_property_detail() {
        let detail = format_property_detail(&sample_property(), false);
        assert!(detail.starts_with("123 Test St"));
        assert!(detail.contains("Listing: 111"));
        assert!(detail.contains("3bd/2ba"));
        assert!(detail.contains("Work 15m"));
    }

    #[test]
    fn test_format_breakdown() {
        let scorer = Scorer::new(&ScoringConfig::default()).unwrap();
        let mut prop = sample_property();
        prop.bathrooms = None;
        let text = format_breakdown(&scorer.breakdown(&prop));
        assert!(text.contains("lot_size_acres"));
        assert!(text.contains("raw=missing"));
        assert!(text.contains("has_garage"));
        assert!(text.contains("weighted avg"));
    }
}
