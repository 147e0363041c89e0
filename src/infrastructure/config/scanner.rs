//! Matching and scanning thresholds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerAppConfig {
    /// Minimum net edge (fraction of payout) to emit an opportunity.
    #[serde(default = "default_min_net_edge")]
    pub min_net_edge: Decimal,
    /// Minimum question similarity for two events to pair.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Contracts per leg before position sizing.
    #[serde(default = "default_stake")]
    pub stake: Decimal,
    /// Events kept from each venue listing per cycle.
    #[serde(default = "default_max_events_per_venue")]
    pub max_events_per_venue: usize,
    /// Reuse pairings across cycles while both events stay listed.
    #[serde(default = "default_pairing_cache")]
    pub pairing_cache: bool,
}

const fn default_min_net_edge() -> Decimal {
    dec!(0.005)
}

const fn default_similarity_threshold() -> f64 {
    0.2
}

const fn default_stake() -> Decimal {
    dec!(100)
}

const fn default_max_events_per_venue() -> usize {
    30
}

const fn default_pairing_cache() -> bool {
    true
}

impl Default for ScannerAppConfig {
    fn default() -> Self {
        Self {
            min_net_edge: default_min_net_edge(),
            similarity_threshold: default_similarity_threshold(),
            stake: default_stake(),
            max_events_per_venue: default_max_events_per_venue(),
            pairing_cache: default_pairing_cache(),
        }
    }
}
