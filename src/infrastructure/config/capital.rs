//! Capital ceiling configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CapitalConfig {
    /// Hard limit on capital committed to in-flight executions (USD).
    #[serde(default = "default_ceiling")]
    pub ceiling: Decimal,
    /// Largest share of the ceiling a single opportunity may use.
    #[serde(default = "default_max_position_fraction")]
    pub max_position_fraction: Decimal,
}

const fn default_ceiling() -> Decimal {
    dec!(5000)
}

const fn default_max_position_fraction() -> Decimal {
    dec!(0.2)
}

impl Default for CapitalConfig {
    fn default() -> Self {
        Self {
            ceiling: default_ceiling(),
            max_position_fraction: default_max_position_fraction(),
        }
    }
}
