//! Leg placement and quote timeouts.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionAppConfig {
    /// Upper bound on one leg's placement in milliseconds.
    #[serde(default = "default_leg_timeout_ms")]
    pub leg_timeout_ms: u64,
    /// Fractional price worsening applied to simulated fills.
    #[serde(default)]
    pub sim_slippage: Decimal,
    /// Timeout for each venue listing and quote request in milliseconds.
    #[serde(default = "default_quote_timeout_ms")]
    pub quote_timeout_ms: u64,
}

const fn default_leg_timeout_ms() -> u64 {
    10_000
}

const fn default_quote_timeout_ms() -> u64 {
    5_000
}

impl ExecutionAppConfig {
    #[must_use]
    pub const fn leg_timeout(&self) -> Duration {
        Duration::from_millis(self.leg_timeout_ms)
    }

    #[must_use]
    pub const fn quote_timeout(&self) -> Duration {
        Duration::from_millis(self.quote_timeout_ms)
    }
}

impl Default for ExecutionAppConfig {
    fn default() -> Self {
        Self {
            leg_timeout_ms: default_leg_timeout_ms(),
            sim_slippage: Decimal::ZERO,
            quote_timeout_ms: default_quote_timeout_ms(),
        }
    }
}
