//! Polymarket REST API client.
//!
//! Supports two API surfaces:
//! - **Gamma API** (`gamma-api.polymarket.com`) - market discovery
//! - **CLOB API** (`clob.polymarket.com`) - order book per outcome token

use async_trait::async_trait;
use tracing::{debug, info};

use super::dto::response::{BookResponse, GammaMarket};
use super::settings::PolymarketConfig;
use crate::adapter::outbound::http::{HttpConfig, RetryingHttp};
use crate::domain::quote::MarketQuote;
use crate::domain::venue::{OutcomeRefs, Side, Venue, VenueEvent};
use crate::error::Result;
use crate::port::outbound::venue::QuoteSource;

/// Read-only Polymarket quote source.
pub struct PolymarketClient {
    http: RetryingHttp,
    gamma_url: String,
    clob_url: String,
    limit: usize,
}

impl PolymarketClient {
    #[must_use]
    pub fn from_config(config: &PolymarketConfig, http: &HttpConfig, limit: usize) -> Self {
        Self {
            http: RetryingHttp::from_config(http),
            gamma_url: config.gamma_url.trim_end_matches('/').to_string(),
            clob_url: config.clob_url.trim_end_matches('/').to_string(),
            limit,
        }
    }

    /// Fetch active markets from the Gamma API.
    pub async fn get_gamma_markets(&self) -> Result<Vec<GammaMarket>> {
        let url = format!(
            "{}/markets?active=true&closed=false&limit={}",
            self.gamma_url, self.limit
        );

        info!(url = %url, "Fetching active markets (Gamma)");

        let markets: Vec<GammaMarket> = self.http.get_json(&url).await?.unwrap_or_default();
        debug!(count = markets.len(), "Fetched markets from Gamma");

        Ok(markets)
    }

    /// Fetch the CLOB book for one outcome token.
    pub async fn get_book(&self, token_id: &str) -> Result<Option<BookResponse>> {
        let url = format!("{}/book?token_id={}", self.clob_url, token_id);
        self.http.get_json(&url).await
    }
}

/// Normalize a Gamma market into a venue event, dropping closed and
/// non-binary markets.
pub(crate) fn to_event(market: GammaMarket) -> Option<VenueEvent> {
    if market.closed || !market.active {
        return None;
    }
    let (yes, no) = market.yes_no_tokens()?;
    let question = market.question.clone().filter(|q| !q.trim().is_empty())?;
    Some(VenueEvent::new(
        Venue::Polymarket,
        market.condition_id.clone(),
        question,
        market.resolves_at(),
        OutcomeRefs::new(yes, no),
    ))
}

#[async_trait]
impl QuoteSource for PolymarketClient {
    fn venue(&self) -> Venue {
        Venue::Polymarket
    }

    async fn list_active_events(&self) -> Result<Vec<VenueEvent>> {
        let markets = self.get_gamma_markets().await?;
        let total = markets.len();
        let events: Vec<VenueEvent> = markets.into_iter().filter_map(to_event).collect();
        debug!(total, binary = events.len(), "Normalized Polymarket markets");
        Ok(events)
    }

    async fn get_quote(&self, event: &VenueEvent, side: Side) -> Result<Option<MarketQuote>> {
        let token = event.outcomes().for_side(side);
        let Some(book) = self.get_book(token).await? else {
            return Ok(None);
        };
        Ok(book.best_ask().map(|(price, size)| {
            MarketQuote::new(Venue::Polymarket, event.id().clone(), side, price, size)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(outcomes: &str, closed: bool) -> GammaMarket {
        GammaMarket {
            condition_id: "0xc".into(),
            question: Some("Will it rain?".into()),
            active: true,
            closed,
            end_date: Some("2026-11-01T00:00:00Z".into()),
            outcomes: Some(outcomes.into()),
            clob_token_ids: Some(r#"["t1", "t2"]"#.into()),
        }
    }

    #[test]
    fn binary_market_becomes_event() {
        let event = to_event(market(r#"["Yes", "No"]"#, false)).unwrap();
        assert_eq!(event.venue(), Venue::Polymarket);
        assert_eq!(event.id().as_str(), "0xc");
        assert_eq!(event.outcomes().for_side(Side::Yes), "t1");
        assert_eq!(event.outcomes().for_side(Side::No), "t2");
        assert!(event.resolves_at().is_some());
    }

    #[test]
    fn closed_or_non_binary_markets_are_dropped() {
        assert!(to_event(market(r#"["Yes", "No"]"#, true)).is_none());
        assert!(to_event(market(r#"["Up", "Down"]"#, false)).is_none());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = PolymarketClient::from_config(
            &PolymarketConfig {
                gamma_url: "https://gamma.test/".into(),
                clob_url: "https://clob.test/".into(),
            },
            &HttpConfig::default(),
            10,
        );
        assert_eq!(client.gamma_url, "https://gamma.test");
        assert_eq!(client.venue(), Venue::Polymarket);
    }
}
