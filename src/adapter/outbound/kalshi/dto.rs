//! Kalshi API response types.
//!
//! Order books are bid-only ladders of `[price_cents, quantity]` per side.
//! A YES bid at X cents is a NO ask at `100 - X`, so asks are derived
//! from the opposite side's best bid.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::venue::Side;

/// `GET /markets` envelope.
#[derive(Debug, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub markets: Vec<KalshiMarket>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KalshiMarket {
    pub ticker: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
}

impl KalshiMarket {
    /// Title, falling back to the subtitle.
    #[must_use]
    pub fn question(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.subtitle.as_deref())
            .filter(|q| !q.trim().is_empty())
    }
}

/// `GET /markets/{ticker}/orderbook` envelope.
#[derive(Debug, Deserialize)]
pub struct OrderbookResponse {
    #[serde(default)]
    pub orderbook: Orderbook,
}

/// Bid ladders in cents. Either side may be `null` when empty.
#[derive(Debug, Default, Deserialize)]
pub struct Orderbook {
    #[serde(default)]
    pub yes: Option<Vec<[i64; 2]>>,
    #[serde(default)]
    pub no: Option<Vec<[i64; 2]>>,
}

const CENTS: Decimal = Decimal::ONE_HUNDRED;

impl Orderbook {
    /// Best ask for `side` as `(price, size)`.
    #[must_use]
    pub fn best_ask(&self, side: Side) -> Option<(Decimal, Decimal)> {
        let opposite = match side {
            Side::Yes => self.no.as_deref(),
            Side::No => self.yes.as_deref(),
        };
        let [cents, qty] = opposite?
            .iter()
            .filter(|[cents, qty]| (1..=99).contains(cents) && *qty > 0)
            .max_by_key(|[cents, _]| *cents)
            .copied()?;
        let price = Decimal::ONE - Decimal::from(cents) / CENTS;
        Some((price, Decimal::from(qty)))
    }
}
