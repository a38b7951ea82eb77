use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use garimpo::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max pages: {:?}", config.scraper.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn valid_config_toml() -> &'static str {
        r#"
[scraper]
base-url = "https://www.olx.com.br/brasil?q=imoveis"
max-pages = 3
listing-delay-ms = 5000
detail-delay-ms = 2500
failure-backoff-ms = 10000

[http]
user-agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"
timeout-secs = 30

[http.headers]
Accept = "text/html,application/xhtml+xml"
Accept-Language = "en-US,en;q=0.9,pt-BR;q=0.8"

[output]
data-dir = "./data"
filename-prefix = "olx_imoveis_anuncios"

[selectors.listing]
ad-card = "section.olx-adcard"
ad-link = "a"

[selectors.ad]
title = "div#description-title span"
price = "div#price-box-container span.olx-text--title-large"
description = "div[data-section='description'] span"
location-neighborhood = "div#location span.olx-text--semibold"
location-city-state-cep = "div#location span.olx-color-neutral-110"
date-posted = "div.ad-date span"
seller-name = "div.seller span"
image = "div#gallery img"
details-section = "div#details"
detail-item = "div.detail-item"
detail-item-label = "span.olx-text--overline"
detail-item-value = ["a.detail-value", "span.detail-value"]
"#
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(valid_config_toml());
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.max_pages, Some(3));
        assert_eq!(config.scraper.listing_delay_ms, 5000);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.headers.len(), 2);
        assert_eq!(config.pagination.offset_param, "o");
        assert_eq!(config.pagination.second_page_offset, 2);
        assert_eq!(config.selectors.listing.next_page_link, None);
        assert_eq!(config.selectors.ad.detail_item_value.len(), 2);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_invalid_selector() {
        let content = valid_config_toml().replace(
            r#"ad-card = "section.olx-adcard""#,
            r#"ad-card = "section..[[""#,
        );
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidSelector { .. }
        ));
    }

    #[test]
    fn test_load_config_with_invalid_base_url() {
        let content = valid_config_toml().replace(
            r#"base-url = "https://www.olx.com.br/brasil?q=imoveis""#,
            r#"base-url = "not a url""#,
        );
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_unbounded_pages_when_absent() {
        let content = valid_config_toml().replace("max-pages = 3\n", "");
        let file = create_temp_config(&content);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.scraper.max_pages, None);
    }
}
