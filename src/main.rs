use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use listing_rank::config::Config;
use listing_rank::property::Property;
use listing_rank::scoring::Scorer;
use listing_rank::store::{self, ListingStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;

/// Number of listings summarised in the run log
const SUMMARY_TOP: usize = 3;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-score every stored listing and rebuild the scores sheet (default)
    Rank(RankArgs),
    /// Import enriched listings (JSON array) into the listings store
    Add {
        /// JSON file holding an array of listing records
        file: PathBuf,
    },
    /// Show the per-criterion score breakdown for one listing
    Explain {
        /// Listing id as stored in the listings store
        listing_id: String,
    },
    /// Check the scoring configuration and report every problem
    Validate,
}

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// Only print the first N listings
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Print tab-separated values instead of a table
    #[arg(long)]
    tsv: bool,

    /// Don't rewrite the scores sheet
    #[arg(long)]
    no_write: bool,
}

#[derive(Parser, Debug)]
#[command(name = "listing-rank")]
#[command(about = "Rank real-estate listings by desirability per dollar", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/listing-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Rank(RankArgs::default()));
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match listing_rank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let level = listing_rank::telemetry::resolve_level(config.log_level.as_deref(), cli.verbose);
    if let Err(e) = listing_rank::telemetry::init(&level) {
        eprintln!("{}", e);
        std::process::exit(EXIT_CONFIG);
    }
    let run_id = chrono::Local::now().format("%Y%m%dT%H%M%S").to_string();
    let run_span = tracing::info_span!("run", id = %run_id).entered();

    // Validate scoring config at startup, before anything is scored
    let effective_scoring = config.scoring.clone().unwrap_or_default();
    let commute_labels = config.commute_labels();
    let scorer = match Scorer::with_destinations(&effective_scoring, &commute_labels) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("Scoring config errors:");
            for issue in err.issues() {
                eprintln!("  - {}", issue);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match command {
        Commands::Validate => {
            println!(
                "Scoring config OK: {} criteria, {} bonuses",
                effective_scoring.criteria.len(),
                effective_scoring.bonuses.len()
            );
            EXIT_SUCCESS
        }
        Commands::Rank(args) => run_rank(&config, &scorer, &commute_labels, &args),
        Commands::Add { file } => run_add(&config, &file),
        Commands::Explain { listing_id } => run_explain(&config, &scorer, &listing_id),
    };

    info!("finished in {:.1?}", start_time.elapsed());
    drop(run_span);
    std::process::exit(code);
}

fn listings_path(config: &Config) -> PathBuf {
    config
        .listings_path
        .clone()
        .unwrap_or_else(store::get_listings_path)
}

fn load_store(config: &Config) -> Option<ListingStore> {
    let path = listings_path(config);
    match store::load_listings(&path) {
        Ok(s) => Some(s),
        Err(e) => {
            error!("{:#}", e);
            None
        }
    }
}

fn run_rank(config: &Config, scorer: &Scorer, commute_labels: &[String], args: &RankArgs) -> i32 {
    let Some(listings) = load_store(config) else {
        return EXIT_STORAGE;
    };
    info!("read {} listings", listings.listings.len());

    let ranking = listing_rank::rank::rank(&listings.listings, scorer);
    let mut code = EXIT_SUCCESS;

    if !args.no_write {
        let scores_path = config
            .scores_path
            .clone()
            .unwrap_or_else(store::get_scores_path);
        match store::write_scores_sheet(&scores_path, &ranking, commute_labels) {
            Ok(()) => info!(
                "scores sheet rebuilt with {} listings at {}",
                ranking.len(),
                scores_path.display()
            ),
            Err(e) => {
                // Stored listings are untouched; only the derived sheet is stale
                error!("failed to rebuild scores sheet: {:#}", e);
                code = EXIT_STORAGE;
            }
        }
    }

    let shown = match args.top {
        Some(n) => ranking.top(n),
        None => &ranking.ranked[..],
    };
    if args.tsv {
        let tsv = listing_rank::output::format_tsv(shown);
        if !tsv.is_empty() {
            println!("{}", tsv);
        }
    } else {
        let use_colors = listing_rank::output::should_use_colors();
        println!("{}", listing_rank::output::format_ranked_table(shown, use_colors));
    }

    for ranked in ranking.top(SUMMARY_TOP) {
        info!(
            "ratio={:.2} score={:.1} {} {}",
            ranked.result.value_ratio,
            ranked.result.score,
            ranked.property.display_name(),
            listing_rank::output::format_price(ranked.property.price)
        );
    }
    info!(
        ranked = ranking.len(),
        excluded = ranking.excluded_count(),
        "rank complete"
    );
    if ranking.excluded_count() > 0 {
        warn!(
            "{} listing(s) excluded for missing price: {}",
            ranking.excluded_count(),
            ranking.excluded.join(", ")
        );
    }

    code
}

fn read_import(path: &Path) -> Result<Vec<Property>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open import file at {}", path.display()))?;
    let listings: Vec<Property> = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse listings in {}", path.display()))?;
    Ok(listings)
}

fn run_add(config: &Config, file: &Path) -> i32 {
    let incoming = match read_import(file) {
        Ok(l) => l,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_STORAGE;
        }
    };
    let Some(mut listings) = load_store(config) else {
        return EXIT_STORAGE;
    };

    let today = chrono::Local::now().date_naive();
    let mut added = 0;
    let mut duplicates = 0;
    let mut invalid = 0;

    for property in incoming {
        if property.listing_id.trim().is_empty() {
            warn!("skipping listing without id: {}", property.display_name());
            invalid += 1;
            continue;
        }
        if property.price_units().is_none() {
            warn!(
                listing_id = %property.listing_id,
                "listing has no usable price and will be left out of rankings"
            );
        }
        if listings.add(property, today) {
            added += 1;
        } else {
            duplicates += 1;
        }
    }

    if added > 0 {
        if let Err(e) = store::save_listings(&listings_path(config), &listings) {
            error!("{:#}", e);
            return EXIT_STORAGE;
        }
    }

    info!(added, duplicates, invalid, "import complete");
    println!(
        "Added: {} | Dup: {} | Invalid: {} | Total stored: {}",
        added,
        duplicates,
        invalid,
        listings.listings.len()
    );
    EXIT_SUCCESS
}

fn run_explain(config: &Config, scorer: &Scorer, listing_id: &str) -> i32 {
    let Some(listings) = load_store(config) else {
        return EXIT_STORAGE;
    };
    let Some(property) = listings.get(listing_id) else {
        eprintln!("No stored listing with id {}", listing_id);
        return EXIT_CONFIG;
    };

    let use_colors = listing_rank::output::should_use_colors();
    println!(
        "{}",
        listing_rank::output::format_property_detail(property, use_colors)
    );
    println!();

    match scorer.score(property) {
        Ok(result) => {
            println!("{}", listing_rank::output::format_breakdown(&result.breakdown));
            println!("  value ratio {:.2} per $100k", result.value_ratio);
        }
        Err(e) => {
            println!(
                "{}",
                listing_rank::output::format_breakdown(&scorer.breakdown(property))
            );
            println!("  value ratio unavailable: {}", e);
        }
    }
    EXIT_SUCCESS
}
