//! Crawler module for listing traversal and ad extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with challenge-page detection
//! - Ad-link extraction and pagination from listing pages
//! - Field extraction from ad detail pages
//! - Overall run coordination and pacing

mod coordinator;
mod detail;
mod fetcher;
mod listing;

pub use coordinator::{run_scrape, Coordinator};
pub use detail::{extract_ad_details, AdSelectors};
pub use fetcher::{build_http_client, fetch_html, fetch_page, FetchOutcome};
pub use listing::{
    extract_ad_links, next_page_url, parse_listing, ListingSelectors, ParsedListing,
};
