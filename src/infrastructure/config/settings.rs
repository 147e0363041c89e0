//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file, then environment overrides
//! (`CAPITAL_USD`, `MODE`, `KALSHI_BASE_URL`) are applied and the result is
//! validated.
//!
//! # Example
//!
//! ```no_run
//! use crossedge::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::capital::CapitalConfig;
use super::discord::DiscordAppConfig;
use super::execution::ExecutionAppConfig;
use super::fees::FeesConfig;
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::scanner::ScannerAppConfig;
use super::scheduler::SchedulerConfig;
use super::telegram::TelegramAppConfig;
use super::validation::ValidationAppConfig;
use super::venues::VenuesConfig;
use crate::application::cycle::CycleConfig;
use crate::application::execution::EngineConfig;
use crate::application::scanner::ScannerConfig;
use crate::domain::execution::ExecutionMode;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// `sim` or `live`. Defaults to sim.
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Where the JSON status snapshot is written after each cycle.
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub capital: CapitalConfig,

    #[serde(default)]
    pub scanner: ScannerAppConfig,

    #[serde(default)]
    pub fees: FeesConfig,

    #[serde(default)]
    pub execution: ExecutionAppConfig,

    #[serde(default)]
    pub validation: ValidationAppConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub venues: VenuesConfig,

    #[serde(default)]
    pub telegram: TelegramAppConfig,

    #[serde(default)]
    pub discord: DiscordAppConfig,
}

fn default_status_file() -> PathBuf {
    PathBuf::from("crossedge-status.json")
}

/// Parse `sim` / `live` (case-insensitive; `simulated` and `paper` mean sim).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for anything else.
pub fn parse_mode(raw: &str) -> std::result::Result<ExecutionMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "sim" | "simulated" | "paper" => Ok(ExecutionMode::Sim),
        "live" => Ok(ExecutionMode::Live),
        other => Err(ConfigError::InvalidValue {
            field: "mode",
            reason: format!("expected sim or live, got {other:?}"),
        }),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides,
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An override variable holds an unparseable value
    /// - Validation fails
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or for any reason
    /// listed on [`Config::parse_toml`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(raw) = env_var("CAPITAL_USD") {
            self.capital.ceiling =
                Decimal::from_str(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                    field: "CAPITAL_USD",
                    reason: e.to_string(),
                })?;
        }
        if let Some(raw) = env_var("MODE") {
            self.mode = parse_mode(&raw)?;
        }
        if let Some(url) = env_var("KALSHI_BASE_URL") {
            self.venues.kalshi.base_url = url;
        }
        Ok(())
    }

    /// Apply command-line overrides, which win over file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the result no longer validates.
    pub fn apply_overrides(
        &mut self,
        mode: Option<ExecutionMode>,
        capital: Option<Decimal>,
    ) -> Result<()> {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(capital) = capital {
            self.capital.ceiling = capital;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.to_string(),
            }
        }

        let unit_fraction = |v: Decimal| v >= Decimal::ZERO && v < Decimal::ONE;

        if self.capital.ceiling <= Decimal::ZERO {
            return Err(invalid("ceiling", "must be greater than 0").into());
        }
        let fraction = self.capital.max_position_fraction;
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(invalid("max_position_fraction", "must be in (0, 1]").into());
        }
        if self.scanner.min_net_edge < Decimal::ZERO {
            return Err(invalid("min_net_edge", "must be 0 or greater").into());
        }
        let threshold = self.scanner.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(invalid("similarity_threshold", "must be in (0, 1]").into());
        }
        if self.scanner.stake <= Decimal::ZERO {
            return Err(invalid("stake", "must be greater than 0").into());
        }
        if self.scanner.max_events_per_venue == 0 {
            return Err(invalid("max_events_per_venue", "must be greater than 0").into());
        }
        if !unit_fraction(self.fees.polymarket) {
            return Err(invalid("fees.polymarket", "must be in [0, 1)").into());
        }
        if !unit_fraction(self.fees.kalshi) {
            return Err(invalid("fees.kalshi", "must be in [0, 1)").into());
        }
        if !unit_fraction(self.execution.sim_slippage) {
            return Err(invalid("sim_slippage", "must be in [0, 1)").into());
        }
        if self.execution.leg_timeout_ms == 0 {
            return Err(invalid("leg_timeout_ms", "must be greater than 0").into());
        }
        if self.execution.quote_timeout_ms == 0 {
            return Err(invalid("quote_timeout_ms", "must be greater than 0").into());
        }
        if self.validation.enabled && self.validation.timeout_ms == 0 {
            return Err(invalid("validation.timeout_ms", "must be greater than 0").into());
        }
        if self.scheduler.scan_interval_secs == 0 {
            return Err(invalid("scan_interval_secs", "must be greater than 0").into());
        }
        if self.venues.http.retry_max_attempts == 0 {
            return Err(invalid("retry_max_attempts", "must be greater than 0").into());
        }
        if self.venues.polymarket.gamma_url.is_empty() {
            return Err(ConfigError::MissingField { field: "gamma_url" }.into());
        }
        if self.venues.polymarket.clob_url.is_empty() {
            return Err(ConfigError::MissingField { field: "clob_url" }.into());
        }
        if self.venues.kalshi.base_url.is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            min_net_edge: self.scanner.min_net_edge,
            stake: self.scanner.stake,
            fees: self.fees.schedule(),
            ceiling: self.capital.ceiling,
            max_position_fraction: self.capital.max_position_fraction,
        }
    }

    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            mode: self.mode,
            leg_timeout: self.execution.leg_timeout(),
            sim_slippage: self.execution.sim_slippage,
            fees: self.fees.schedule(),
        }
    }

    #[must_use]
    pub fn cycle_config(&self) -> CycleConfig {
        CycleConfig {
            quote_timeout: self.execution.quote_timeout(),
            max_events_per_venue: self.scanner.max_events_per_venue,
        }
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
