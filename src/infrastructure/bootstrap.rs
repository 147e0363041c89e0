//! Composition root: turns a [`Config`] into a wired scan service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::kalshi::KalshiClient;
use crate::adapter::outbound::llm::anthropic::Anthropic;
use crate::adapter::outbound::llm::openai::OpenAi;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::notifier::{DiscordConfig, DiscordNotifier, LogNotifier};
use crate::adapter::outbound::polymarket::PolymarketClient;
use crate::adapter::outbound::status::StatusWriter;
use crate::adapter::outbound::validator::{LlmValidator, ThresholdValidator};
use crate::application::cycle::ScanService;
use crate::application::execution::ExecutionEngine;
use crate::application::guard::CapitalGuard;
use crate::application::matcher::EventMatcher;
use crate::application::portfolio::PortfolioLedger;
use crate::application::scanner::OpportunityScanner;
use crate::application::validation::ValidationGate;
use crate::domain::execution::ExecutionMode;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::validation::ValidatorKind;
use crate::port::outbound::llm::Llm;
use crate::port::outbound::notifier::{Notifier, NotifierRegistry};
use crate::port::outbound::validator::OpportunityValidator;
use crate::port::outbound::venue::QuoteSource;

/// Everything the scheduler needs to run.
pub struct Runtime {
    pub service: Arc<ScanService>,
    pub status: StatusWriter,
}

/// Build notifier registry from configuration.
///
/// Must be called from within a tokio runtime when a chat notifier is enabled.
#[must_use]
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    register_telegram(&mut registry, config);

    if config.discord.enabled {
        match DiscordConfig::from_env(config.discord.notify_opportunities) {
            Some(dc_config) => {
                registry.register(Box::new(DiscordNotifier::new(dc_config)));
                info!("Discord notifier enabled");
            }
            None => warn!("Discord enabled but DISCORD_WEBHOOK_URL not set"),
        }
    }

    registry
}

#[cfg(feature = "telegram")]
fn register_telegram(registry: &mut NotifierRegistry, config: &Config) {
    if !config.telegram.enabled {
        return;
    }
    match TelegramConfig::from_env(
        config.telegram.notify_opportunities,
        config.telegram.notify_executions,
    ) {
        Some(tg_config) => {
            registry.register(Box::new(TelegramNotifier::new(tg_config)));
            info!("Telegram notifier enabled");
        }
        None => warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set"),
    }
}

#[cfg(not(feature = "telegram"))]
fn register_telegram(_registry: &mut NotifierRegistry, config: &Config) {
    if config.telegram.enabled {
        warn!("Telegram enabled in config but the binary was built without the telegram feature");
    }
}

/// Build the LLM client for the configured provider.
///
/// # Errors
///
/// Returns a config error if the provider's API key is not set.
pub fn build_llm(config: &Config) -> Result<Arc<dyn Llm>> {
    let timeout = config.validation.timeout();
    let llm: Arc<dyn Llm> = match config.llm.provider {
        LlmProvider::Anthropic => {
            let c = &config.llm.anthropic;
            Arc::new(Anthropic::from_env(
                c.model.clone(),
                c.max_tokens,
                c.temperature,
                timeout,
            )?)
        }
        LlmProvider::OpenAi => {
            let c = &config.llm.openai;
            Arc::new(OpenAi::from_env(
                c.model.clone(),
                c.max_tokens,
                c.temperature,
                timeout,
            )?)
        }
    };
    Ok(llm)
}

/// Build the validation gate, or a pass-through gate when disabled.
///
/// # Errors
///
/// Returns a config error if the LLM validator is selected without an API key.
pub fn build_validation_gate(config: &Config) -> Result<ValidationGate> {
    if !config.validation.enabled {
        return Ok(ValidationGate::disabled());
    }

    let validator: Arc<dyn OpportunityValidator> = match config.validation.validator {
        ValidatorKind::Llm => Arc::new(LlmValidator::new(build_llm(config)?)),
        ValidatorKind::Threshold => Arc::new(ThresholdValidator::new(config.scanner.min_net_edge)),
    };
    info!(validator = validator.name(), "Opportunity validation enabled");
    Ok(ValidationGate::new(validator, config.validation.timeout()))
}

/// Wire venues, matcher, scanner, gate, guard, ledger and engine.
///
/// # Errors
///
/// Returns a config error for live mode (no venue order client is bundled)
/// or when the validation gate cannot be built.
pub fn build_runtime(config: &Config) -> Result<Runtime> {
    if config.mode == ExecutionMode::Live {
        return Err(ConfigError::InvalidValue {
            field: "mode",
            reason: "live mode requires venue order clients, which this build does not include"
                .to_string(),
        }
        .into());
    }

    let limit = config.scanner.max_events_per_venue;
    let polymarket: Arc<dyn QuoteSource> = Arc::new(PolymarketClient::from_config(
        &config.venues.polymarket,
        &config.venues.http,
        limit,
    ));
    let kalshi: Arc<dyn QuoteSource> = Arc::new(KalshiClient::from_config(
        &config.venues.kalshi,
        &config.venues.http,
        limit,
    ));

    let mut matcher = EventMatcher::new(config.scanner.similarity_threshold);
    if !config.scanner.pairing_cache {
        matcher = matcher.without_cache();
    }
    let scanner = OpportunityScanner::new(config.scanner_config());
    let gate = build_validation_gate(config)?;

    let notifier: Arc<dyn Notifier> = Arc::new(build_notifier_registry(config));
    let guard = Arc::new(CapitalGuard::new(config.capital.ceiling));
    let portfolio = Arc::new(PortfolioLedger::new());
    let engine = Arc::new(ExecutionEngine::new(
        Arc::clone(&guard),
        portfolio,
        Arc::clone(&notifier),
        config.engine_config(),
    ));

    let service = Arc::new(ScanService::new(
        polymarket,
        kalshi,
        matcher,
        scanner,
        gate,
        engine,
        notifier,
        config.cycle_config(),
    ));
    let status = StatusWriter::new(config.status_file.clone(), config.mode, guard.snapshot());

    info!(
        mode = %config.mode,
        ceiling = %config.capital.ceiling,
        min_net_edge = %config.scanner.min_net_edge,
        validation = config.validation.enabled,
        "Runtime assembled"
    );

    Ok(Runtime { service, status })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[tokio::test]
    async fn live_mode_is_rejected() {
        let err = build_runtime(&config("mode = \"live\"")).err().unwrap();
        assert!(err.to_string().contains("mode"));
    }

    #[tokio::test]
    async fn sim_runtime_starts_at_epoch_zero() {
        let runtime = build_runtime(&config("")).unwrap();
        assert_eq!(runtime.service.epoch(), 0);
        assert_eq!(runtime.service.engine().mode(), ExecutionMode::Sim);
        assert_eq!(runtime.status.snapshot().capital.ceiling, rust_decimal_macros::dec!(5000));
    }

    #[test]
    fn disabled_validation_builds_pass_through_gate() {
        let gate = build_validation_gate(&config("")).unwrap();
        assert!(!gate.is_enabled());
    }

    #[test]
    fn threshold_validation_needs_no_key() {
        let gate = build_validation_gate(&config(
            "[validation]\nenabled = true\nvalidator = \"threshold\"",
        ))
        .unwrap();
        assert!(gate.is_enabled());
    }

    #[test]
    fn registry_always_logs() {
        let registry = build_notifier_registry(&config(""));
        assert_eq!(registry.len(), 1);
    }
}
