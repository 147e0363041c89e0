//! Venue ports for quotes and order placement.
//!
//! These are the only integration points with the venues. Quote sources
//! are read-only; order clients are only used in live mode.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::id::EventId;
use crate::domain::money::{Price, Volume};
use crate::domain::quote::MarketQuote;
use crate::domain::venue::{Side, Venue, VenueEvent};
use crate::error::Result;

/// Read-only market data for one venue.
///
/// Calls may block for an unbounded time; callers wrap them in timeouts.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Venue served by this source.
    fn venue(&self) -> Venue;

    /// List currently tradable binary events.
    async fn list_active_events(&self) -> Result<Vec<VenueEvent>>;

    /// Best ask for one side of an event, or `None` if the venue has no
    /// quote for it.
    async fn get_quote(&self, event: &VenueEvent, side: Side) -> Result<Option<MarketQuote>>;

    /// YES and NO quotes for an event. Sources that serve both sides from
    /// one request override this; the default asks for each side in turn.
    async fn get_quotes(
        &self,
        event: &VenueEvent,
    ) -> Result<(Option<MarketQuote>, Option<MarketQuote>)> {
        let yes = self.get_quote(event, Side::Yes).await?;
        let no = self.get_quote(event, Side::No).await?;
        Ok((yes, no))
    }
}

/// A single limit order for one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub venue: Venue,
    pub event_id: EventId,
    /// Venue handle for the side (token id or ticker).
    pub outcome_ref: String,
    pub side: Side,
    /// Limit price.
    pub price: Price,
    pub size: Volume,
}

/// Result reported by a venue order client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderResult {
    Filled { filled_price: Price, filled_size: Volume },
    Failed { reason: String },
}

/// Places orders on one venue.
///
/// The engine issues at most one call per leg per execution and never
/// retries; a returned `Err` is treated the same as [`OrderResult::Failed`].
#[async_trait]
pub trait OrderClient: Send + Sync {
    fn venue(&self) -> Venue;

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResult>;
}
