//! Ad detail-page field extraction
//!
//! One visited detail page becomes one [`AdRecord`]. Fixed fields are each
//! independently optional: a selector that matches nothing sets the field
//! to `Null` with a warning and extraction moves on. The free-form
//! specification section ("Quartos: 2", "Área útil: 120m²", ...) is walked
//! item by item, producing dynamically named fields merged in at the end.

use crate::config::AdSelectorsConfig;
use crate::record::{AdRecord, FieldValue};
use crate::text::{clean_text, extract_number, extract_price};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Detail labels containing one of these keywords hold counts or
/// measurements; their values go through the integer extractor.
const NUMERIC_LABEL_KEYWORDS: &[&str] =
    &["quarto", "banheiro", "vaga", "andar", "área", "tamanho"];

/// Compiled ad-page selectors
#[derive(Debug, Clone)]
pub struct AdSelectors {
    title: Selector,
    price: Selector,
    description: Selector,
    location_neighborhood: Selector,
    location_city_state_cep: Selector,
    date_posted: Selector,
    seller_name: Selector,
    image: Selector,
    details_section: Selector,
    detail_item: Selector,
    detail_item_label: Selector,
    detail_item_value: Vec<Selector>,
}

impl AdSelectors {
    /// Compiles the configured selector strings
    ///
    /// # Returns
    ///
    /// * `Ok(AdSelectors)` - All selectors compiled
    /// * `Err(ConfigError)` - A selector string is invalid
    pub fn compile(config: &AdSelectorsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title: compile_selector("ad.title", &config.title)?,
            price: compile_selector("ad.price", &config.price)?,
            description: compile_selector("ad.description", &config.description)?,
            location_neighborhood: compile_selector(
                "ad.location-neighborhood",
                &config.location_neighborhood,
            )?,
            location_city_state_cep: compile_selector(
                "ad.location-city-state-cep",
                &config.location_city_state_cep,
            )?,
            date_posted: compile_selector("ad.date-posted", &config.date_posted)?,
            seller_name: compile_selector("ad.seller-name", &config.seller_name)?,
            image: compile_selector("ad.image", &config.image)?,
            details_section: compile_selector("ad.details-section", &config.details_section)?,
            detail_item: compile_selector("ad.detail-item", &config.detail_item)?,
            detail_item_label: compile_selector(
                "ad.detail-item-label",
                &config.detail_item_label,
            )?,
            detail_item_value: config
                .detail_item_value
                .iter()
                .enumerate()
                .map(|(i, s)| compile_selector(&format!("ad.detail-item-value[{i}]"), s))
                .collect::<Result<_, _>>()?,
        })
    }
}

fn compile_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Extracts one flat record from an ad detail page
///
/// Every fixed field is present in the result, explicitly `Null` when its
/// selector matched nothing. Dynamically discovered detail fields are
/// merged in last and overwrite fixed fields on a name collision.
pub fn extract_ad_details(ad_url: &Url, document: &Html, selectors: &AdSelectors) -> AdRecord {
    let mut record = AdRecord::new(ad_url);

    record.set(
        "titulo",
        select_text(document, &selectors.title, "titulo", ad_url).into(),
    );

    // The price keeps both the raw text and the parsed value
    let price_text = select_text(document, &selectors.price, "preco", ad_url);
    let price = price_text.as_deref().and_then(extract_price);
    record.set("preco_str", price_text.into());
    record.set("preco", price.into());

    record.set(
        "descricao",
        select_text(document, &selectors.description, "descricao", ad_url).into(),
    );
    record.set(
        "local_bairro",
        select_text(
            document,
            &selectors.location_neighborhood,
            "local_bairro",
            ad_url,
        )
        .into(),
    );
    record.set(
        "local_cidade_estado_cep",
        select_text(
            document,
            &selectors.location_city_state_cep,
            "local_cidade_estado_cep",
            ad_url,
        )
        .into(),
    );
    record.set(
        "data_publicacao",
        select_text(document, &selectors.date_posted, "data_publicacao", ad_url).into(),
    );
    record.set(
        "nome_vendedor",
        select_text(document, &selectors.seller_name, "nome_vendedor", ad_url).into(),
    );

    let details = extract_detail_items(document, selectors, ad_url);
    record.merge_details(details);

    record.set("imagem_principal_url", extract_image(document, selectors, ad_url));

    tracing::debug!(
        "Extracted record for {ad_url} ({} fields)",
        record.len()
    );
    record
}

/// Selects the first match of `selector` and returns its cleaned text
///
/// A miss (or text that cleans to nothing) logs a warning and yields `None`.
fn select_text(
    document: &Html,
    selector: &Selector,
    field: &str,
    ad_url: &Url,
) -> Option<String> {
    match document.select(selector).next() {
        Some(element) => clean_text(&element_text(element)),
        None => {
            tracing::warn!("Selector for '{field}' matched nothing at {ad_url}");
            None
        }
    }
}

/// Joins an element's text segments with single spaces
fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Walks the free-form specification section, producing label/value fields
///
/// Within the details-section node, every detail-item container is
/// inspected: its label becomes the (lowercased, cleaned) field name, and
/// the candidate value selectors are tried in order, scoped to the same
/// container, taking the first non-empty match. Items without a label or a
/// value are skipped with a warning.
fn extract_detail_items(
    document: &Html,
    selectors: &AdSelectors,
    ad_url: &Url,
) -> Vec<(String, FieldValue)> {
    let mut items = Vec::new();

    let Some(section) = document.select(&selectors.details_section).next() else {
        tracing::warn!("Details section not found for ad: {ad_url}");
        return items;
    };

    let containers: Vec<_> = section.select(&selectors.detail_item).collect();
    if containers.is_empty() {
        tracing::warn!("No detail items found inside the details section for {ad_url}");
    }

    for container in containers {
        let label = container
            .select(&selectors.detail_item_label)
            .next()
            .map(element_text)
            .and_then(|text| clean_text(&text))
            .map(|text| text.to_lowercase());

        let Some(label) = label else {
            tracing::warn!("Detail item without a label at {ad_url}");
            continue;
        };

        let value = selectors.detail_item_value.iter().find_map(|selector| {
            container
                .select(selector)
                .next()
                .map(element_text)
                .and_then(|text| clean_text(&text))
        });

        match value {
            Some(value) => items.push((label.clone(), coerce_detail_value(&label, value))),
            None => {
                tracing::warn!("No value found for detail label '{label}' at {ad_url}");
            }
        }
    }

    items
}

/// Coerces a detail value through the integer extractor when its label
/// names a count or measurement; other labels keep the cleaned text.
fn coerce_detail_value(label: &str, value: String) -> FieldValue {
    if NUMERIC_LABEL_KEYWORDS
        .iter()
        .any(|keyword| label.contains(keyword))
    {
        extract_number(&value).into()
    } else {
        FieldValue::Text(value)
    }
}

/// Extracts the primary image URL from its `src` attribute, falling back
/// to `data-src` for lazily loaded galleries.
fn extract_image(document: &Html, selectors: &AdSelectors, ad_url: &Url) -> FieldValue {
    match document.select(&selectors.image).next() {
        Some(element) => {
            let src = element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("data-src"));
            src.map(str::to_string).into()
        }
        None => {
            tracing::warn!("No image matched for ad: {ad_url}");
            FieldValue::Null
        }
    }
}
