use std::fs;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use crossedge::domain::execution::ExecutionMode;
use crossedge::error::{ConfigError, Error};
use crossedge::infrastructure::config::llm::LlmProvider;
use crossedge::infrastructure::config::settings::Config;
use crossedge::infrastructure::config::validation::ValidatorKind;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn full_config_loads() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
mode = "sim"
status_file = "/tmp/crossedge-test-status.json"

[logging]
level = "debug"
format = "json"

[capital]
ceiling = 2500
max_position_fraction = 0.1

[scanner]
min_net_edge = 0.01
similarity_threshold = 0.35
stake = 50
max_events_per_venue = 10
pairing_cache = false

[fees]
polymarket = 0.0
kalshi = 0.007

[execution]
leg_timeout_ms = 4000
sim_slippage = 0.01

[validation]
enabled = true
timeout_ms = 5000
validator = "threshold"

[llm]
provider = "anthropic"

[scheduler]
scan_interval_secs = 15

[telegram]
enabled = false
"#,
    );

    let config = assert_ok!(Config::load(&path));

    assert_eq!(config.mode, ExecutionMode::Sim);
    assert_eq!(config.capital.ceiling, dec!(2500));
    assert_eq!(config.scanner.min_net_edge, dec!(0.01));
    assert_eq!(config.scanner.max_events_per_venue, 10);
    assert!(!config.scanner.pairing_cache);
    assert_eq!(config.fees.kalshi, dec!(0.007));
    assert_eq!(config.execution.leg_timeout().as_millis(), 4000);
    assert!(config.validation.enabled);
    assert_eq!(config.validation.validator, ValidatorKind::Threshold);
    assert_eq!(config.llm.provider, LlmProvider::Anthropic);
    assert_eq!(config.scheduler.interval().as_secs(), 15);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_file_is_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = assert_err!(Config::load(dir.path().join("absent.toml")));
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[capital\nceiling = 10");
    let err = assert_err!(Config::load(&path));
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn zero_ceiling_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[capital]\nceiling = 0\n");
    let err = Config::load(&path).expect_err("zero ceiling");
    assert!(err.to_string().contains("ceiling"));
}

#[test]
fn fee_rate_of_one_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[fees]\nkalshi = 1.0\n");
    let err = Config::load(&path).expect_err("fee too high");
    assert!(err.to_string().contains("fees.kalshi"));
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "mode = \"yolo\"\n");
    assert!(Config::load(&path).is_err());
}

#[test]
fn similarity_threshold_must_be_positive() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[scanner]\nsimilarity_threshold = 0.0\n");
    let err = Config::load(&path).expect_err("zero threshold");
    assert!(err.to_string().contains("similarity_threshold"));
}
