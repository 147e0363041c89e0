//! Opportunity validation settings.

use std::time::Duration;

use serde::Deserialize;

/// Which validator backs the gate when validation is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// Ask the configured LLM provider.
    #[default]
    Llm,
    /// Net-edge floor only.
    Threshold,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationAppConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Milliseconds before an unanswered validation counts as unavailable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub validator: ValidatorKind,
}

const fn default_timeout_ms() -> u64 {
    8_000
}

impl ValidationAppConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ValidationAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: default_timeout_ms(),
            validator: ValidatorKind::default(),
        }
    }
}
