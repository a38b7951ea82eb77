use crate::config::PaginationConfig;
use url::Url;

/// Returns the value of the page-offset query parameter, if present.
///
/// When the parameter occurs more than once, the first occurrence wins.
pub fn offset_value(url: &Url, param: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
}

/// Rewrites the offset query parameter to `value`, preserving every other
/// query parameter unchanged.
///
/// The offset parameter is appended at the end of the query string; any
/// existing occurrences are removed first.
pub fn with_offset(url: &Url, param: &str, value: u32) -> Url {
    let mut rewritten = url.clone();
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = rewritten.query_pairs_mut();
        pairs.clear();
        for (key, val) in &others {
            pairs.append_pair(key, val);
        }
        pairs.append_pair(param, &value.to_string());
    }

    rewritten
}

/// Computes the next listing-page URL by incrementing the offset parameter.
///
/// The site's convention: the first page carries no offset parameter, the
/// second page is `o=2`. Accordingly:
/// - no offset parameter -> next offset is the configured second-page value;
/// - parseable offset `n` -> next offset is `n + 1`;
/// - unparseable offset -> treated as `0`, next offset is `1`.
///
/// Returns `None` when the rewritten URL is identical to the input, which
/// signals the end of pagination.
pub fn next_offset_url(current: &Url, pagination: &PaginationConfig) -> Option<Url> {
    let param = pagination.offset_param.as_str();

    let next_offset = match offset_value(current, param) {
        None => pagination.second_page_offset,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => n + 1,
            Err(_) => {
                tracing::warn!(
                    "Could not parse offset parameter '{param}={raw}' in {current}; treating as 0"
                );
                1
            }
        },
    };

    let candidate = with_offset(current, param, next_offset);
    if candidate == *current {
        tracing::warn!(
            "Rewritten next-page URL equals the current one ({current}); end of pagination"
        );
        None
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> PaginationConfig {
        PaginationConfig::default()
    }

    #[test]
    fn test_first_page_without_offset() {
        let current = Url::parse("https://example.com/brasil?q=imoveis").unwrap();
        let next = next_offset_url(&current, &pagination()).unwrap();
        assert_eq!(offset_value(&next, "o").as_deref(), Some("2"));
    }

    #[test]
    fn test_increment_existing_offset() {
        let current = Url::parse("https://example.com/brasil?q=imoveis&o=5").unwrap();
        let next = next_offset_url(&current, &pagination()).unwrap();
        assert_eq!(offset_value(&next, "o").as_deref(), Some("6"));
    }

    #[test]
    fn test_unparseable_offset_becomes_one() {
        let current = Url::parse("https://example.com/brasil?o=abc").unwrap();
        let next = next_offset_url(&current, &pagination()).unwrap();
        assert_eq!(offset_value(&next, "o").as_deref(), Some("1"));
    }

    #[test]
    fn test_other_parameters_preserved() {
        let current = Url::parse("https://example.com/brasil?q=imoveis&sf=1&o=2").unwrap();
        let next = next_offset_url(&current, &pagination()).unwrap();
        assert_eq!(offset_value(&next, "q").as_deref(), Some("imoveis"));
        assert_eq!(offset_value(&next, "sf").as_deref(), Some("1"));
        assert_eq!(offset_value(&next, "o").as_deref(), Some("3"));
    }

    #[test]
    fn test_no_query_at_all() {
        let current = Url::parse("https://example.com/brasil").unwrap();
        let next = next_offset_url(&current, &pagination()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/brasil?o=2");
    }

    #[test]
    fn test_with_offset_replaces_all_occurrences() {
        let current = Url::parse("https://example.com/?o=1&o=7&q=x").unwrap();
        let rewritten = with_offset(&current, "o", 3);
        let offsets: Vec<_> = rewritten
            .query_pairs()
            .filter(|(k, _)| k == "o")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(offsets, vec!["3"]);
    }

    #[test]
    fn test_custom_offset_param() {
        let cfg = PaginationConfig {
            offset_param: "pagina".to_string(),
            second_page_offset: 2,
        };
        let current = Url::parse("https://example.com/busca?pagina=3").unwrap();
        let next = next_offset_url(&current, &cfg).unwrap();
        assert_eq!(offset_value(&next, "pagina").as_deref(), Some("4"));
    }

    #[test]
    fn test_offset_value_missing() {
        let current = Url::parse("https://example.com/brasil?q=imoveis").unwrap();
        assert_eq!(offset_value(&current, "o"), None);
    }
}
