//! Per-venue fee rates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::economics::FeeSchedule;

/// Fee rates as a fraction of notional.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeesConfig {
    #[serde(default = "default_polymarket_fee")]
    pub polymarket: Decimal,
    #[serde(default = "default_kalshi_fee")]
    pub kalshi: Decimal,
}

const fn default_polymarket_fee() -> Decimal {
    dec!(0.005)
}

const fn default_kalshi_fee() -> Decimal {
    dec!(0.003)
}

impl FeesConfig {
    #[must_use]
    pub const fn schedule(&self) -> FeeSchedule {
        FeeSchedule::new(self.polymarket, self.kalshi)
    }
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            polymarket: default_polymarket_fee(),
            kalshi: default_kalshi_fee(),
        }
    }
}
