//! Scrape coordinator - main run orchestration logic
//!
//! This module contains the page-by-page, ad-by-ad loop that coordinates
//! all aspects of one scrape run:
//! - Fetching listing pages and walking their pagination
//! - Fetching every ad's detail page and extracting a record
//! - Degrading gracefully on fetch failures
//! - Pacing requests so the target server is never hammered
//!
//! The loop is fully sequential: one request in flight at a time, state
//! owned by a single task.

use crate::config::Config;
use crate::crawler::detail::{extract_ad_details, AdSelectors};
use crate::crawler::fetcher::{build_http_client, fetch_html};
use crate::crawler::listing::{next_page_url, parse_listing, ListingSelectors};
use crate::record::AdRecord;
use crate::HarvestError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    listing_selectors: ListingSelectors,
    ad_selectors: AdSelectors,
    base_url: Url,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Compiles both selector tables and builds the HTTP client once; the
    /// run itself borrows them.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid base URL or selector, or client build failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.scraper.base_url)?;
        let listing_selectors = ListingSelectors::compile(&config.selectors.listing)?;
        let ad_selectors = AdSelectors::compile(&config.selectors.ad)?;
        let client = build_http_client(&config.http)?;

        Ok(Self {
            config,
            client,
            listing_selectors,
            ad_selectors,
            base_url,
        })
    }

    /// Runs the main scrape loop
    ///
    /// Walks listing pages from the configured base URL, collecting one
    /// record per reachable ad. The loop stops when:
    /// - the configured page limit is reached,
    /// - a listing page yields zero ad links,
    /// - the next-page URL is absent or equals the current one.
    ///
    /// A failed listing fetch does not end the run by itself: the next
    /// page is computed from the URL alone and the loop continues after a
    /// longer backoff. A failed detail fetch skips that ad only.
    ///
    /// Fetch failures never escape this method; the accumulated records
    /// (possibly empty) are always returned.
    pub async fn run(&self) -> Vec<AdRecord> {
        let mut records = Vec::new();
        let mut current_url = Some(self.base_url.clone());
        let mut page_count: u32 = 0;
        let max_pages = self.config.scraper.max_pages;

        while let Some(page_url) = current_url.take() {
            if let Some(max) = max_pages {
                if page_count >= max {
                    tracing::info!("Reached the page limit of {max}; stopping");
                    break;
                }
            }
            page_count += 1;

            match max_pages {
                Some(max) => {
                    tracing::info!("--- Scraping page {page_count}/{max}: {page_url} ---")
                }
                None => tracing::info!("--- Scraping page {page_count}: {page_url} ---"),
            }

            let Some(body) = fetch_html(&self.client, page_url.as_str()).await else {
                tracing::error!("Failed to fetch listing page: {page_url}");
                if page_count >= max_pages.unwrap_or(u32::MAX) {
                    break;
                }
                // Degrade: advance by URL arithmetic alone and keep going
                let next = next_page_url(
                    &page_url,
                    None,
                    &self.listing_selectors,
                    &self.config.pagination,
                );
                if next.as_ref() == Some(&page_url) {
                    break;
                }
                current_url = next;
                self.pause(self.config.scraper.failure_backoff_ms).await;
                continue;
            };

            let parsed = parse_listing(
                &body,
                &page_url,
                &self.base_url,
                &self.listing_selectors,
                &self.config.pagination,
            );

            if parsed.ad_links.is_empty() {
                tracing::info!(
                    "No ad links found on {page_url}; end of listings or stale selectors"
                );
                break;
            }

            let total = parsed.ad_links.len();
            for (index, ad_link) in parsed.ad_links.iter().enumerate() {
                tracing::info!("Processing ad {}/{total}: {ad_link}", index + 1);

                match fetch_html(&self.client, ad_link.as_str()).await {
                    Some(ad_body) => {
                        let record = {
                            let document = Html::parse_document(&ad_body);
                            extract_ad_details(ad_link, &document, &self.ad_selectors)
                        };
                        records.push(record);
                    }
                    None => {
                        tracing::warn!("Could not fetch ad detail page, skipping: {ad_link}");
                    }
                }

                self.pause(self.config.scraper.detail_delay_ms).await;
            }

            match parsed.next_page {
                Some(next) if next == page_url => {
                    tracing::info!("Next-page URL equals the current one; stopping pagination");
                    break;
                }
                Some(next) => {
                    current_url = Some(next);
                    self.pause(self.config.scraper.listing_delay_ms).await;
                }
                None => {
                    tracing::info!("No next page found; stopping");
                }
            }
        }

        if records.is_empty() {
            tracing::warn!("No ad records were collected");
        } else {
            tracing::info!(
                "Collection finished: {} ads processed across {page_count} page(s)",
                records.len()
            );
        }

        records
    }

    async fn pause(&self, millis: u64) {
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

/// Runs a complete scrape with the given configuration
///
/// Convenience wrapper: builds a [`Coordinator`] and runs it.
///
/// # Arguments
///
/// * `config` - The validated scraper configuration
///
/// # Returns
///
/// * `Ok(Vec<AdRecord>)` - The collected records, possibly empty
/// * `Err(HarvestError)` - The coordinator could not be constructed
pub async fn run_scrape(config: Config) -> Result<Vec<AdRecord>, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
