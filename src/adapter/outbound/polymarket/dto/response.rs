//! Polymarket API response types.
//!
//! Two API surfaces:
//! - **Gamma API** (`gamma-api.polymarket.com`) - market discovery.
//!   Uses [`GammaMarket`].
//! - **CLOB API** (`clob.polymarket.com`) - order book per outcome token.
//!   Uses [`BookResponse`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Market data from the Gamma API.
///
/// Response format: flat JSON array (no wrapper object). Outcome names
/// and token ids arrive as JSON-encoded strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    pub condition_id: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub closed: bool,
    /// ISO-8601 end of the trading window.
    #[serde(default)]
    pub end_date: Option<String>,
    /// JSON-encoded outcome names (e.g., `["Yes", "No"]`).
    #[serde(default)]
    pub outcomes: Option<String>,
    /// JSON-encoded CLOB token IDs, aligned with `outcomes`.
    #[serde(default)]
    pub clob_token_ids: Option<String>,
}

impl GammaMarket {
    /// End date, if present and well-formed.
    pub fn resolves_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.end_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| debug!(error = %e, raw, "Unparseable endDate"))
            .ok()
    }

    /// Parse the JSON-encoded CLOB token IDs.
    pub fn token_ids(&self) -> Vec<String> {
        self.decode(self.clob_token_ids.as_deref(), "clob_token_ids")
    }

    /// Parse the JSON-encoded outcome names.
    pub fn outcome_names(&self) -> Vec<String> {
        self.decode(self.outcomes.as_deref(), "outcomes")
    }

    /// YES and NO token ids for a binary Yes/No market, or `None` for
    /// anything else.
    pub fn yes_no_tokens(&self) -> Option<(String, String)> {
        let names = self.outcome_names();
        let tokens = self.token_ids();
        if names.len() != 2 || tokens.len() != 2 {
            return None;
        }
        let position = |wanted: &str| names.iter().position(|n| n.eq_ignore_ascii_case(wanted));
        let yes = position("yes")?;
        let no = position("no")?;
        Some((tokens[yes].clone(), tokens[no].clone()))
    }

    fn decode(&self, raw: Option<&str>, field: &'static str) -> Vec<String> {
        raw.and_then(|s| {
            serde_json::from_str::<Vec<String>>(s)
                .map_err(|e| {
                    debug!(
                        error = %e,
                        raw = %s,
                        condition_id = %self.condition_id,
                        field,
                        "Failed to parse JSON-encoded field"
                    );
                })
                .ok()
        })
        .unwrap_or_default()
    }
}

/// CLOB order book for one outcome token.
#[derive(Debug, Deserialize)]
pub struct BookResponse {
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
}

/// Price level as sent by the CLOB (strings, not decimals).
#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel {
    pub price: String,
    pub size: String,
}

impl BookLevel {
    fn parse(&self) -> Option<(Decimal, Decimal)> {
        Some((self.price.parse().ok()?, self.size.parse().ok()?))
    }
}

impl BookResponse {
    /// Lowest ask with positive size.
    #[must_use]
    pub fn best_ask(&self) -> Option<(Decimal, Decimal)> {
        self.asks
            .iter()
            .filter_map(BookLevel::parse)
            .filter(|(_, size)| *size > Decimal::ZERO)
            .min_by(|a, b| a.0.cmp(&b.0))
    }
}
