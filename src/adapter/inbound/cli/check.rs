//! Handler for `check config`.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::domain::execution::ExecutionMode;
use crate::error::Result;
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::validation::ValidatorKind;

fn env_present(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| !v.trim().is_empty())
}

/// Validate the configuration file without starting the scanner.
pub fn execute_config(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Mode", config.mode);
    output::field("Capital", config.capital.ceiling);
    output::field("Max position", config.capital.max_position_fraction);
    output::field("Min net edge", config.scanner.min_net_edge);
    output::field("Similarity", config.scanner.similarity_threshold);
    output::field("Stake", config.scanner.stake);
    output::field(
        "Fees",
        format!(
            "polymarket {} / kalshi {}",
            config.fees.polymarket, config.fees.kalshi
        ),
    );
    output::field("Interval", format!("{}s", config.scheduler.scan_interval_secs));

    if config.mode == ExecutionMode::Live {
        output::warning("Live mode is configured but no venue order client is bundled");
    }

    if config.validation.enabled {
        match config.validation.validator {
            ValidatorKind::Threshold => output::field("Validation", "threshold"),
            ValidatorKind::Llm => {
                let var = match config.llm.provider {
                    LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
                    LlmProvider::OpenAi => "OPENAI_API_KEY",
                };
                if env_present(var) {
                    output::success("LLM validation configured");
                } else {
                    output::warning(&format!("LLM validation enabled but {var} is not set"));
                }
            }
        }
    } else {
        output::field("Validation", "disabled");
    }

    if config.telegram.enabled {
        if env_present("TELEGRAM_BOT_TOKEN") && env_present("TELEGRAM_CHAT_ID") {
            output::success("Telegram integration configured");
        } else {
            output::warning(
                "Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is missing",
            );
        }
    }
    if config.discord.enabled && !env_present("DISCORD_WEBHOOK_URL") {
        output::warning("Discord enabled but DISCORD_WEBHOOK_URL is missing");
    }

    output::success("Configuration check complete");
    Ok(())
}
