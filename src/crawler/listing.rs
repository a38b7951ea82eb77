//! Listing-page traversal
//!
//! A listing page yields two things: the detail-page links of the ads it
//! shows, and the URL of the next listing page. Link extraction walks the
//! configured ad-card selector in document order; next-page resolution
//! first tries a configured "next page" link selector and falls back to
//! incrementing the page-offset query parameter.

use crate::config::{ListingSelectorsConfig, PaginationConfig};
use crate::url::{next_offset_url, offset_value};
use crate::ConfigError;
use scraper::{Html, Selector};
use url::Url;

/// Offset sentinels of the selector-tier rejection heuristic. Offset "0"
/// and a missing parameter both indicate the first page; a candidate
/// claiming offset "1" while the current page is past "1" is a stale link
/// back to the start.
const FIRST_PAGE_OFFSET: &str = "0";
const PAGE_ONE_OFFSET: &str = "1";

/// Compiled listing-page selectors
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// One ad summary card
    pub ad_card: Selector,
    /// The link inside a card, relative to the card
    pub ad_link: Selector,
    /// The "next page" link, when the site exposes one
    pub next_page_link: Option<Selector>,
}

impl ListingSelectors {
    /// Compiles the configured selector strings
    ///
    /// # Returns
    ///
    /// * `Ok(ListingSelectors)` - All selectors compiled
    /// * `Err(ConfigError)` - A selector string is invalid
    pub fn compile(config: &ListingSelectorsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            ad_card: compile_selector("listing.ad-card", &config.ad_card)?,
            ad_link: compile_selector("listing.ad-link", &config.ad_link)?,
            next_page_link: config
                .next_page_link
                .as_deref()
                .map(|s| compile_selector("listing.next-page-link", s))
                .transpose()?,
        })
    }
}

fn compile_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Everything the coordinator needs from one parsed listing page
#[derive(Debug, Clone)]
pub struct ParsedListing {
    /// Detail-page URLs in document order
    pub ad_links: Vec<Url>,
    /// URL of the next listing page, `None` when pagination is exhausted
    pub next_page: Option<Url>,
}

/// Parses a listing page body in one pass
///
/// # Arguments
///
/// * `body` - The HTML body of the listing page
/// * `current_url` - The URL the page was fetched from
/// * `base_url` - The configured base URL ad links are resolved against
/// * `selectors` - Compiled listing selectors
/// * `pagination` - Offset-parameter tuning
pub fn parse_listing(
    body: &str,
    current_url: &Url,
    base_url: &Url,
    selectors: &ListingSelectors,
    pagination: &PaginationConfig,
) -> ParsedListing {
    let document = Html::parse_document(body);
    ParsedListing {
        ad_links: extract_ad_links(&document, base_url, selectors),
        next_page: next_page_url(current_url, Some(&document), selectors, pagination),
    }
}

/// Extracts the ad detail-page links from a listing page
///
/// Selects all ad-card nodes, takes the first descendant link carrying an
/// `href` within each, and resolves it against the base URL. A card without
/// a usable link is skipped with a warning; it does not abort the page.
pub fn extract_ad_links(
    document: &Html,
    base_url: &Url,
    selectors: &ListingSelectors,
) -> Vec<Url> {
    let mut links = Vec::new();

    let cards: Vec<_> = document.select(&selectors.ad_card).collect();
    if cards.is_empty() {
        tracing::warn!("No ad cards matched on this listing page; check the ad-card selector");
        return links;
    }

    for (index, card) in cards.iter().enumerate() {
        let href = card
            .select(&selectors.ad_link)
            .find_map(|link| link.value().attr("href"));

        match href {
            Some(href) => match base_url.join(href) {
                Ok(ad_url) => links.push(ad_url),
                Err(e) => {
                    tracing::warn!("Ad card #{} link {href:?} did not resolve: {e}", index + 1);
                }
            },
            None => {
                tracing::warn!("No usable link found in ad card #{}", index + 1);
            }
        }
    }

    tracing::info!("{} ad links extracted from this page", links.len());
    links
}

/// Computes the URL of the next listing page
///
/// Two-tier policy:
///
/// 1. **Selector-based**: when a next-page selector is configured and the
///    document is available, resolve the matched `href` against
///    `current_url`. The candidate is rejected (and the fallback used) when
///    it equals the current URL, points at the first page, or regresses
///    pagination.
/// 2. **Parameter-increment fallback**: rewrite the page-offset query
///    parameter, see [`next_offset_url`]. This tier also runs when no
///    document is available, so a failed listing fetch can still advance.
///
/// `None` means "stop paginating".
pub fn next_page_url(
    current_url: &Url,
    document: Option<&Html>,
    selectors: &ListingSelectors,
    pagination: &PaginationConfig,
) -> Option<Url> {
    if let (Some(document), Some(selector)) = (document, selectors.next_page_link.as_ref()) {
        if let Some(candidate) = select_next_candidate(document, current_url, selector) {
            if accepts_candidate(current_url, &candidate, pagination) {
                tracing::info!("Next page via selector: {candidate}");
                return Some(candidate);
            }
            tracing::info!(
                "Next-page selector matched {candidate}, but it does not advance from \
                 {current_url}; ignoring"
            );
        }
    }

    next_offset_url(current_url, pagination)
}

/// Resolves the href matched by the next-page selector, if any
fn select_next_candidate(document: &Html, current_url: &Url, selector: &Selector) -> Option<Url> {
    let href = document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("href"))?;

    match current_url.join(href) {
        Ok(candidate) => Some(candidate),
        Err(e) => {
            tracing::warn!("Next-page href {href:?} did not resolve: {e}");
            None
        }
    }
}

/// Checks that a selector-tier candidate actually advances pagination
fn accepts_candidate(current_url: &Url, candidate: &Url, pagination: &PaginationConfig) -> bool {
    if candidate == current_url {
        return false;
    }

    let param = pagination.offset_param.as_str();
    let current_offset = offset_value(current_url, param);

    match offset_value(candidate, param) {
        // Parameter-less candidates point back at the first page
        None => false,
        Some(offset) if offset == FIRST_PAGE_OFFSET => false,
        Some(offset) => {
            // A stale "next" link must not jump back to page one once
            // pagination has moved past it
            !(offset == PAGE_ONE_OFFSET && current_offset.as_deref() != Some(PAGE_ONE_OFFSET))
        }
    }
}
