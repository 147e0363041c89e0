//! Kalshi REST API client (public market data).

use async_trait::async_trait;
use tracing::{debug, info};

use super::dto::{KalshiMarket, MarketsResponse, OrderbookResponse};
use super::settings::KalshiConfig;
use crate::adapter::outbound::http::{HttpConfig, RetryingHttp};
use crate::domain::quote::MarketQuote;
use crate::domain::venue::{OutcomeRefs, Side, Venue, VenueEvent};
use crate::error::Result;
use crate::port::outbound::venue::QuoteSource;

/// Read-only Kalshi quote source.
pub struct KalshiClient {
    http: RetryingHttp,
    base_url: String,
    limit: usize,
}

impl KalshiClient {
    #[must_use]
    pub fn from_config(config: &KalshiConfig, http: &HttpConfig, limit: usize) -> Self {
        Self {
            http: RetryingHttp::from_config(http),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit,
        }
    }

    pub async fn get_open_markets(&self) -> Result<Vec<KalshiMarket>> {
        let url = format!("{}/markets?limit={}&status=open", self.base_url, self.limit);

        info!(url = %url, "Fetching open markets (Kalshi)");

        let response: Option<MarketsResponse> = self.http.get_json(&url).await?;
        let markets = response.map(|r| r.markets).unwrap_or_default();
        debug!(count = markets.len(), "Fetched markets from Kalshi");

        Ok(markets)
    }

    pub async fn get_orderbook(&self, ticker: &str) -> Result<Option<OrderbookResponse>> {
        let url = format!("{}/markets/{}/orderbook", self.base_url, ticker);
        self.http.get_json(&url).await
    }
}

pub(crate) fn to_event(market: KalshiMarket) -> Option<VenueEvent> {
    if market
        .status
        .as_deref()
        .is_some_and(|s| !s.eq_ignore_ascii_case("open") && !s.eq_ignore_ascii_case("active"))
    {
        return None;
    }
    let question = market.question()?.to_string();
    Some(VenueEvent::new(
        Venue::Kalshi,
        market.ticker.clone(),
        question,
        market.close_time,
        OutcomeRefs::shared(market.ticker),
    ))
}

#[async_trait]
impl QuoteSource for KalshiClient {
    fn venue(&self) -> Venue {
        Venue::Kalshi
    }

    async fn list_active_events(&self) -> Result<Vec<VenueEvent>> {
        let markets = self.get_open_markets().await?;
        Ok(markets.into_iter().filter_map(to_event).collect())
    }

    async fn get_quote(&self, event: &VenueEvent, side: Side) -> Result<Option<MarketQuote>> {
        let ticker = event.outcomes().for_side(side);
        let Some(response) = self.get_orderbook(ticker).await? else {
            return Ok(None);
        };
        Ok(quote_side(event, &response, side))
    }

    /// Both sides of a Kalshi market share one orderbook.
    async fn get_quotes(
        &self,
        event: &VenueEvent,
    ) -> Result<(Option<MarketQuote>, Option<MarketQuote>)> {
        let ticker = event.outcomes().for_side(Side::Yes);
        let Some(response) = self.get_orderbook(ticker).await? else {
            return Ok((None, None));
        };
        Ok((
            quote_side(event, &response, Side::Yes),
            quote_side(event, &response, Side::No),
        ))
    }
}

fn quote_side(event: &VenueEvent, response: &OrderbookResponse, side: Side) -> Option<MarketQuote> {
    response
        .orderbook
        .best_ask(side)
        .map(|(price, size)| MarketQuote::new(Venue::Kalshi, event.id().clone(), side, price, size))
}
