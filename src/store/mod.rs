pub mod listings;
pub mod scores;

pub use listings::{get_listings_path, load_listings, save_listings, ListingStore};
pub use scores::{get_scores_path, render_scores_sheet, scores_headers, write_scores_sheet};
