//! CLI output formatting.
//!
//! Human-readable lines by default, one JSON object per line with `--json`,
//! and nothing but warnings and errors with `--quiet`.

use std::fmt::Display;
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde_json::{json, Value};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn current() -> OutputConfig {
    *OUTPUT
        .get_or_init(|| RwLock::new(OutputConfig::default()))
        .read()
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT
        .get_or_init(|| RwLock::new(OutputConfig::default()))
        .write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

fn json_line(kind: &str, payload: Value) -> String {
    json!({ "type": kind, "payload": payload }).to_string()
}

/// Print either the JSON envelope or the human line, honoring `--quiet`
/// for the latter. `always` lines ignore quiet.
fn emit(kind: &str, payload: Value, human: impl FnOnce() -> String, always: bool) {
    let config = current();
    if config.json {
        println!("{}", json_line(kind, payload));
    } else if always || !config.quiet {
        println!("{}", human());
    }
}

/// Print the application banner line.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "crossedge", "version": version }),
        || format!("crossedge {version}\n"),
        false,
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": &value }),
        || format!("  {label:<14} {value}"),
        false,
    );
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), || format!("\n{title}"), false);
}

pub fn success(message: &str) {
    emit(
        "success",
        json!({ "message": message }),
        || format!("  ✓ {message}"),
        false,
    );
}

/// Warnings are printed even in quiet mode.
pub fn warning(message: &str) {
    emit(
        "warning",
        json!({ "message": message }),
        || format!("  ⚠ {message}"),
        true,
    );
}

/// Errors go to stderr in every mode.
pub fn error(message: &str) {
    if current().json {
        eprintln!("{}", json_line("error", json!({ "message": message })));
    } else {
        eprintln!("  × {message}");
    }
}

/// Emit a serializable value as a single JSON line.
pub fn json_value(kind: &str, value: &impl serde::Serialize) {
    match serde_json::to_value(value) {
        Ok(payload) => println!("{}", json_line(kind, payload)),
        Err(e) => error(&format!("failed to serialize {kind}: {e}")),
    }
}
