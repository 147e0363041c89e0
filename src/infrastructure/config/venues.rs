//! Venue endpoint configuration.

use serde::Deserialize;

use crate::adapter::outbound::http::HttpConfig;
use crate::adapter::outbound::kalshi::KalshiConfig;
use crate::adapter::outbound::polymarket::PolymarketConfig;

/// `[venues.*]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenuesConfig {
    #[serde(default)]
    pub polymarket: PolymarketConfig,
    #[serde(default)]
    pub kalshi: KalshiConfig,
    #[serde(default)]
    pub http: HttpConfig,
}
