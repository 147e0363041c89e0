//! Kalshi endpoint configuration.

use serde::Deserialize;

/// Kalshi public trade API.
#[derive(Debug, Clone, Deserialize)]
pub struct KalshiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".into()
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}
