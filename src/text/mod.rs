//! Text and number normalization for scraped content
//!
//! Raw text pulled out of HTML carries newlines, indentation, and the
//! site's numeric formatting. These helpers turn it into clean strings,
//! prices, and integers. They never panic on odd input; a value that
//! cannot be interpreted comes back as `None`.

use once_cell::sync::Lazy;
use regex::Regex;

/// First maximal run of digits, dots, and commas (a price-like token)
static PRICE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d.,]+").unwrap());

/// First maximal run of digits
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Collapses all whitespace runs (including newlines) to single spaces and
/// trims the ends.
///
/// Returns `None` when nothing remains after cleaning. Idempotent:
/// `clean_text(&clean_text(s)?) == clean_text(s)`.
///
/// # Examples
///
/// ```
/// use garimpo::text::clean_text;
///
/// assert_eq!(clean_text("  Olá   mundo  \n  teste "), Some("Olá mundo teste".to_string()));
/// assert_eq!(clean_text("   \n\t "), None);
/// ```
pub fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Extracts a numeric price from a price text (e.g. "R$ 150.000").
///
/// Locates the first run of digits, dots, and commas and interprets it with
/// the Brazilian convention: `.` is a thousands separator, `,` is the
/// decimal separator. Returns `None` when no such run exists or the run
/// does not form a valid number ("Sob Consulta", a lone comma, ...); a
/// failed conversion is logged at warning level.
pub fn extract_price(price_text: &str) -> Option<f64> {
    let run = PRICE_RUN.find(price_text)?;
    let cleaned = run.as_str().replace('.', "").replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Could not convert price text to a number: {price_text:?}");
            None
        }
    }
}

/// Extracts the first integer found in a text (e.g. "2 quartos" -> 2).
///
/// Returns `None` when the text contains no digits, or when the digit run
/// does not fit an `i64`.
pub fn extract_number(text: &str) -> Option<i64> {
    let run = DIGIT_RUN.find(text)?;
    match run.as_str().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Digit run too large for an integer: {text:?}");
            None
        }
    }
}
