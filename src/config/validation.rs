use crate::config::types::{
    AdSelectorsConfig, Config, HttpConfig, ListingSelectorsConfig, OutputConfig, ScraperConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_listing_selectors(&config.selectors.listing)?;
    validate_ad_selectors(&config.selectors.ad)?;
    if config.pagination.offset_param.is_empty() {
        return Err(ConfigError::Validation(
            "pagination offset-param cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates scrape-run configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be HTTP or HTTPS, got scheme '{}'",
            url.scheme()
        )));
    }

    if let Some(max_pages) = config.max_pages {
        if max_pages < 1 {
            return Err(ConfigError::Validation(format!(
                "max-pages must be >= 1 when set, got {max_pages}"
            )));
        }
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    for (name, value) in &config.headers {
        reqwest::header::HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ConfigError::Validation(format!("invalid header name '{name}': {e}"))
        })?;
        reqwest::header::HeaderValue::from_str(value).map_err(|e| {
            ConfigError::Validation(format!("invalid value for header '{name}': {e}"))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    if config.filename_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "filename-prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every listing-page selector compiles
fn validate_listing_selectors(config: &ListingSelectorsConfig) -> Result<(), ConfigError> {
    check_selector("listing.ad-card", &config.ad_card)?;
    check_selector("listing.ad-link", &config.ad_link)?;
    if let Some(next_page) = &config.next_page_link {
        check_selector("listing.next-page-link", next_page)?;
    }
    Ok(())
}

/// Validates that every ad-page selector compiles
fn validate_ad_selectors(config: &AdSelectorsConfig) -> Result<(), ConfigError> {
    check_selector("ad.title", &config.title)?;
    check_selector("ad.price", &config.price)?;
    check_selector("ad.description", &config.description)?;
    check_selector("ad.location-neighborhood", &config.location_neighborhood)?;
    check_selector("ad.location-city-state-cep", &config.location_city_state_cep)?;
    check_selector("ad.date-posted", &config.date_posted)?;
    check_selector("ad.seller-name", &config.seller_name)?;
    check_selector("ad.image", &config.image)?;
    check_selector("ad.details-section", &config.details_section)?;
    check_selector("ad.detail-item", &config.detail_item)?;
    check_selector("ad.detail-item-label", &config.detail_item_label)?;

    if config.detail_item_value.is_empty() {
        return Err(ConfigError::Validation(
            "ad.detail-item-value must list at least one selector".to_string(),
        ));
    }
    for (i, selector) in config.detail_item_value.iter().enumerate() {
        check_selector(&format!("ad.detail-item-value[{i}]"), selector)?;
    }

    Ok(())
}

/// Checks that a single selector string compiles
fn check_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
