//! Polymarket endpoint configuration.

use serde::Deserialize;

/// Polymarket API endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PolymarketConfig {
    /// Gamma API base URL (market discovery).
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,
    /// CLOB API base URL (order books).
    #[serde(default = "default_clob_url")]
    pub clob_url: String,
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".into()
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".into()
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            gamma_url: default_gamma_url(),
            clob_url: default_clob_url(),
        }
    }
}
