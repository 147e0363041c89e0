//! Kalshi venue adapter.

mod client;
pub mod dto;
mod settings;

pub use client::KalshiClient;
pub use settings::KalshiConfig;
