//! Polymarket venue adapter.

mod client;
pub mod dto;
mod settings;

pub use client::PolymarketClient;
pub use settings::PolymarketConfig;
