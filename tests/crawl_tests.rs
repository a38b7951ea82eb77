//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full listing -> pagination -> detail -> record cycle end-to-end.

use garimpo::config::{
    AdSelectorsConfig, Config, HttpConfig, ListingSelectorsConfig, OutputConfig,
    PaginationConfig, ScraperConfig, SelectorsConfig,
};
use garimpo::crawler::Coordinator;
use garimpo::export::save_records;
use garimpo::record::FieldValue;
use std::collections::BTreeMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, max_pages: Option<u32>) -> Config {
    Config {
        scraper: ScraperConfig {
            base_url: base_url.to_string(),
            max_pages,
            // Very short pacing for testing
            listing_delay_ms: 1,
            detail_delay_ms: 1,
            failure_backoff_ms: 1,
        },
        http: HttpConfig {
            user_agent: "TestAgent/1.0".to_string(),
            timeout_secs: 5,
            headers: BTreeMap::new(),
        },
        pagination: PaginationConfig::default(),
        output: OutputConfig {
            data_dir: "./data".to_string(),
            filename_prefix: "test".to_string(),
        },
        selectors: SelectorsConfig {
            listing: ListingSelectorsConfig {
                ad_card: "section.card".to_string(),
                ad_link: "a".to_string(),
                next_page_link: None,
            },
            ad: AdSelectorsConfig {
                title: "h1.title".to_string(),
                price: "h2.price".to_string(),
                description: "div.description".to_string(),
                location_neighborhood: "span.bairro".to_string(),
                location_city_state_cep: "span.cidade".to_string(),
                date_posted: "span.date".to_string(),
                seller_name: "span.seller".to_string(),
                image: "div.gallery img".to_string(),
                details_section: "div#details".to_string(),
                detail_item: "div.item".to_string(),
                detail_item_label: "span.label".to_string(),
                detail_item_value: vec!["span.value".to_string()],
            },
        },
    }
}

/// A listing page showing one card per ad path
fn listing_page(ad_paths: &[&str]) -> String {
    let cards: String = ad_paths
        .iter()
        .map(|p| format!(r#"<section class="card"><a href="{p}">anúncio</a></section>"#))
        .collect();
    format!("<html><body>{cards}</body></html>")
}

/// A detail page with a title, a price, and one detail item
fn detail_page(title: &str, price: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="title">{title}</h1>
            <h2 class="price">{price}</h2>
            <div class="description">Descrição do imóvel.</div>
            <span class="bairro">Centro</span>
            <div id="details">
                <div class="item">
                    <span class="label">Quartos</span>
                    <span class="value">2</span>
                </div>
            </div>
        </body></html>"#
    )
}

fn html_response(body: String) -> ResponseTemplate {
    // `set_body_raw` lets us pin the Content-Type; `set_body_string` would
    // force `text/plain` and win over a later `insert_header`.
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

#[tokio::test]
async fn test_two_page_crawl_collects_all_ads() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/imoveis?q=casa", mock_server.uri());

    // A third listing page must never be requested with max-pages = 2.
    // More specific listing mocks are mounted first; the plain-path mock
    // at the end serves the first page.
    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .and(query_param("o", "3"))
        .respond_with(html_response(listing_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .and(query_param("o", "2"))
        .respond_with(html_response(listing_page(&["/anuncio/3"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anuncio/1"))
        .respond_with(html_response(detail_page("Casa um", "R$ 100.000")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anuncio/2"))
        .respond_with(html_response(detail_page("Casa dois", "R$ 1.250,50")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anuncio/3"))
        .respond_with(html_response(detail_page("Casa três", "Sob Consulta")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .respond_with(html_response(listing_page(&["/anuncio/1", "/anuncio/2"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, Some(2));
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await;

    assert_eq!(records.len(), 3, "expected one record per reachable ad");
    for record in &records {
        assert!(!record.url().is_empty());
        assert_eq!(record.get("quartos"), Some(&FieldValue::Int(2)));
    }

    assert_eq!(
        records[0].get("titulo"),
        Some(&FieldValue::Text("Casa um".to_string()))
    );
    assert_eq!(records[1].get("preco"), Some(&FieldValue::Float(1250.50)));
    // "Sob Consulta" has no parseable price
    assert_eq!(records[2].get("preco"), Some(&FieldValue::Null));
    assert_eq!(
        records[2].get("preco_str"),
        Some(&FieldValue::Text("Sob Consulta".to_string()))
    );

    // The batch exports cleanly after the crawl
    let tmp = tempfile::tempdir().unwrap();
    let output = OutputConfig {
        data_dir: tmp.path().to_str().unwrap().to_string(),
        filename_prefix: "crawl".to_string(),
    };
    let files = save_records(&records, &output).expect("Export failed");
    assert!(files.csv.exists());
    assert!(files.xlsx.exists());
}

#[tokio::test]
async fn test_detail_failure_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/imoveis?q=casa", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/anuncio/1"))
        .respond_with(html_response(detail_page("Casa um", "R$ 100.000")))
        .mount(&mock_server)
        .await;

    // The second detail page is broken
    Mock::given(method("GET"))
        .and(path("/anuncio/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anuncio/3"))
        .respond_with(html_response(detail_page("Casa três", "R$ 300.000")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .respond_with(html_response(listing_page(&[
            "/anuncio/1",
            "/anuncio/2",
            "/anuncio/3",
        ])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, Some(1));
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await;

    // The failed detail page is skipped, the run continues
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].get("titulo"),
        Some(&FieldValue::Text("Casa um".to_string()))
    );
    assert_eq!(
        records[1].get("titulo"),
        Some(&FieldValue::Text("Casa três".to_string()))
    );
}

#[tokio::test]
async fn test_challenge_page_yields_no_records() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/imoveis?q=casa", mock_server.uri());

    // The "listing page" is a block page; it must not be treated as a document
    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .respond_with(html_response(
            "<html><title>Attention Required! | Cloudflare</title></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, Some(1));
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_listing_without_ads_stops_the_run() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/imoveis?q=casa", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .respond_with(html_response(listing_page(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Unbounded page limit: only the zero-links condition can stop this run
    let config = create_test_config(&base_url, None);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_failed_listing_fetch_degrades_to_next_page() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/imoveis?q=casa", mock_server.uri());

    // Page two works; more specific mock mounted first
    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .and(query_param("o", "2"))
        .respond_with(html_response(listing_page(&["/anuncio/1"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anuncio/1"))
        .respond_with(html_response(detail_page("Casa um", "R$ 100.000")))
        .mount(&mock_server)
        .await;

    // The first page fails
    Mock::given(method("GET"))
        .and(path("/imoveis"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, Some(2));
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await;

    // The run advanced past the broken first page via the offset fallback
    assert_eq!(records.len(), 1);
}
