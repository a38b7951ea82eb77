use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Garimpo
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub output: OutputConfig,
    pub selectors: SelectorsConfig,
}

/// Scrape-run behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Listing URL the run starts from
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum number of listing pages to walk; absent means unbounded
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Pause between successive listing-page fetches (milliseconds)
    #[serde(rename = "listing-delay-ms")]
    pub listing_delay_ms: u64,

    /// Pause between successive detail-page fetches (milliseconds)
    #[serde(rename = "detail-delay-ms")]
    pub detail_delay_ms: u64,

    /// Longer pause applied after a fetch failure (milliseconds)
    #[serde(rename = "failure-backoff-ms")]
    pub failure_backoff_ms: u64,
}

/// HTTP client identity and limits
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header value sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Additional request headers (browser-mimicking Accept, Accept-Language, ...)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Pagination-parameter tuning
///
/// The target site encodes the requested results page in a query parameter;
/// its name and the offset value of the second page vary per site layout,
/// so both are configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Name of the page-offset query parameter
    #[serde(rename = "offset-param", default = "default_offset_param")]
    pub offset_param: String,

    /// Offset value of the second page (the first page carries no parameter)
    #[serde(rename = "second-page-offset", default = "default_second_page_offset")]
    pub second_page_offset: u32,
}

fn default_offset_param() -> String {
    "o".to_string()
}

fn default_second_page_offset() -> u32 {
    2
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            offset_param: default_offset_param(),
            second_page_offset: default_second_page_offset(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the exported tables are written into (created if absent)
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Prefix of the timestamped output filenames
    #[serde(rename = "filename-prefix")]
    pub filename_prefix: String,
}

/// Selector tables for both page kinds
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorsConfig {
    pub listing: ListingSelectorsConfig,
    pub ad: AdSelectorsConfig,
}

/// CSS selectors applied to listing pages
#[derive(Debug, Clone, Deserialize)]
pub struct ListingSelectorsConfig {
    /// One ad summary card
    #[serde(rename = "ad-card")]
    pub ad_card: String,

    /// The link inside an ad card, relative to the card
    #[serde(rename = "ad-link")]
    pub ad_link: String,

    /// The "next page" link; when absent, pagination falls back to
    /// offset-parameter increments
    #[serde(rename = "next-page-link", default)]
    pub next_page_link: Option<String>,
}

/// CSS selectors applied to ad detail pages
#[derive(Debug, Clone, Deserialize)]
pub struct AdSelectorsConfig {
    pub title: String,
    pub price: String,
    pub description: String,

    #[serde(rename = "location-neighborhood")]
    pub location_neighborhood: String,

    #[serde(rename = "location-city-state-cep")]
    pub location_city_state_cep: String,

    #[serde(rename = "date-posted")]
    pub date_posted: String,

    #[serde(rename = "seller-name")]
    pub seller_name: String,

    /// Primary image element; its `src` (or `data-src`) attribute is taken
    pub image: String,

    /// Container of the free-form label/value specification section
    #[serde(rename = "details-section")]
    pub details_section: String,

    /// One label/value item inside the details section
    #[serde(rename = "detail-item")]
    pub detail_item: String,

    /// The label node, relative to a detail item
    #[serde(rename = "detail-item-label")]
    pub detail_item_label: String,

    /// Candidate value nodes, relative to a detail item, tried in order
    #[serde(rename = "detail-item-value")]
    pub detail_item_value: Vec<String>,
}
