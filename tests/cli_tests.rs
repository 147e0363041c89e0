use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use crossedge::adapter::outbound::status::StatusWriter;
use crossedge::application::guard::CapitalGuard;
use crossedge::domain::execution::ExecutionMode;

fn crossedge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_crossedge"));
    cmd.env_remove("MODE")
        .env_remove("CAPITAL_USD")
        .env_remove("KALSHI_BASE_URL")
        .env("RUST_LOG", "off");
    cmd
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn check_config_accepts_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[capital]\nceiling = 1000\n");

    crossedge()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1000"));
}

#[test]
fn check_config_rejects_invalid_values() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[capital]\nmax_position_fraction = 1.5\n");

    crossedge()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("max_position_fraction"));
}

#[test]
fn check_config_fails_for_missing_file() {
    let dir = TempDir::new().expect("temp dir");

    crossedge()
        .args(["check", "config", "--config"])
        .arg(dir.path().join("nope.toml"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn status_without_file_exits_nonzero() {
    let dir = TempDir::new().expect("temp dir");

    crossedge()
        .args(["status", "--status-file"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn status_prints_written_snapshot_as_json() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("status.json");
    let guard = CapitalGuard::new(dec!(750));
    let writer = StatusWriter::new(path.clone(), ExecutionMode::Sim, guard.snapshot());
    writer.write().expect("write status");

    crossedge()
        .args(["status", "--json", "--status-file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"status\""))
        .stdout(predicate::str::contains("750"));
}

#[test]
fn run_refuses_live_mode() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "[capital]\nceiling = 1000\n");

    crossedge()
        .args(["run", "--mode", "live", "--once", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("live mode"));
}

#[test]
fn run_rejects_non_positive_capital_override() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "");

    crossedge()
        .args(["run", "--once", "--capital", "0", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ceiling"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    crossedge().arg("frobnicate").assert().failure().code(2);
}
