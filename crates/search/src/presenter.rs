//! Match → display card
//!
//! Metadata is read leniently: a missing or mistyped field falls back to its
//! default and never affects the other fields or records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stocklytic_vector::{Match, Metadata};

pub const NAME_MAX_LENGTH: usize = 25;
pub const DESCRIPTION_MAX_LENGTH: usize = 135;
pub const ELLIPSIS: &str = "...";

const DEFAULT_NAME: &str = "N/A";
const DEFAULT_TICKER: &str = "N/A";
const DEFAULT_DESCRIPTION: &str = "No description available.";
const DEFAULT_SECTOR: &str = "Sector Unknown";

/// Card shown for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub id: String,
    pub score: f32,
    pub name: String,
    pub ticker: String,
    pub sector: String,
    pub description: String,
    pub earnings_growth: String,
    pub earnings_positive: bool,
    pub revenue_growth: String,
    pub revenue_positive: bool,
    pub link: String,
}

/// Shorten `text` to `max_length` characters plus an ellipsis
///
/// Text within the limit is returned unchanged.
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() > max_length {
        let mut truncated: String = text.chars().take(max_length).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        text.to_string()
    }
}

/// Render a fractional growth value as a percentage, e.g. 0.1234 → "12.34%"
pub fn format_growth(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Turns index matches into display cards
#[derive(Debug, Clone)]
pub struct Presenter {
    quote_base_url: String,
}

impl Presenter {
    pub fn new(quote_base_url: impl Into<String>) -> Self {
        Self {
            quote_base_url: quote_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Quote page used when a record has no website
    pub fn quote_url(&self, ticker: &str) -> String {
        format!("{}/quote.ashx?t={}", self.quote_base_url, ticker)
    }

    pub fn present(&self, m: &Match) -> DisplayRecord {
        let empty = Metadata::new();
        let metadata = m.metadata.as_ref().unwrap_or(&empty);

        let ticker = text_field(metadata, "Ticker").unwrap_or(DEFAULT_TICKER);
        let earnings = number_field(metadata, "Earnings_Growth");
        let revenue = number_field(metadata, "Revenue_Growth");

        let link = match text_field(metadata, "website").map(str::trim) {
            Some(website) if is_web_url(website) => website.to_string(),
            _ => self.quote_url(ticker),
        };

        DisplayRecord {
            id: m.id.clone(),
            score: m.score,
            name: truncate(
                text_field(metadata, "Name").unwrap_or(DEFAULT_NAME),
                NAME_MAX_LENGTH,
            ),
            ticker: ticker.to_string(),
            sector: text_field(metadata, "Sector")
                .unwrap_or(DEFAULT_SECTOR)
                .to_string(),
            description: truncate(
                text_field(metadata, "text").unwrap_or(DEFAULT_DESCRIPTION),
                DESCRIPTION_MAX_LENGTH,
            ),
            earnings_growth: format_growth(earnings),
            earnings_positive: earnings > 0.0,
            revenue_growth: format_growth(revenue),
            revenue_positive: revenue > 0.0,
            link,
        }
    }

    /// Present every match, keeping the service's order
    pub fn present_all(&self, matches: &[Match]) -> Vec<DisplayRecord> {
        matches.iter().map(|m| self.present(m)).collect()
    }
}

fn text_field<'a>(metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(Value::as_str)
}

/// Only http(s) links are rendered; anything else could run script in an href
fn is_web_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

fn number_field(metadata: &Metadata, key: &str) -> f64 {
    metadata.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
