//! LLM adapter modules.
//!
//! Provides implementations of the [`Llm`](crate::port::outbound::llm::Llm) trait
//! for Anthropic Claude and OpenAI.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::error::{ConfigError, Error, Result};

/// Instructions shared by every provider.
pub(crate) const SYSTEM_PROMPT: &str = "You compare prediction market questions from two \
venues. Answer on the first line with exactly YES if both questions resolve on the same \
real-world outcome over the same window, or NO otherwise. Give a one-sentence rationale on \
the second line.";

fn api_key(var: &'static str) -> Result<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(Error::Config(ConfigError::MissingField { field: var })),
    }
}

fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|err| {
        warn!(error = %err, "Failed to build LLM HTTP client, using defaults");
        Client::new()
    })
}
