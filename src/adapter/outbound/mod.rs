//! Outbound adapters (driven side).

pub mod http;
pub mod kalshi;
pub mod llm;
pub mod notifier;
pub mod polymarket;
pub mod status;
pub mod validator;
