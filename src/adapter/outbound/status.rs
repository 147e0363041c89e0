//! Status file for external monitoring.
//!
//! Writes a JSON snapshot that `crossedge status` and external tools can
//! poll while the scan loop runs.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::application::guard::GuardSnapshot;
use crate::application::portfolio::PortfolioSummary;
use crate::domain::execution::ExecutionMode;
use crate::error::Result;
use crate::port::outbound::notifier::ScanSummaryEvent;

/// Current status file format version.
const STATUS_VERSION: &str = "1";

/// Top-level status file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFile {
    /// Schema version for forward compatibility.
    pub version: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub mode: ExecutionMode,
    pub capital: GuardSnapshot,
    pub portfolio: PortfolioSummary,
    /// Number of scan cycles started.
    pub epoch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scan: Option<StatusScan>,
}

/// Counts from the most recent completed scan cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusScan {
    pub epoch: u64,
    pub events_a: usize,
    pub events_b: usize,
    pub pairs: usize,
    pub opportunities: usize,
    pub settled: usize,
}

impl From<&ScanSummaryEvent> for StatusScan {
    fn from(summary: &ScanSummaryEvent) -> Self {
        Self {
            epoch: summary.epoch,
            events_a: summary.events_a,
            events_b: summary.events_b,
            pairs: summary.pairs,
            opportunities: summary.opportunities,
            settled: summary.settled,
        }
    }
}

/// Writer for the status file.
///
/// Holds the latest snapshot behind a lock and writes it atomically.
pub struct StatusWriter {
    path: PathBuf,
    status: Mutex<StatusFile>,
}

impl StatusWriter {
    #[must_use]
    pub fn new(path: PathBuf, mode: ExecutionMode, capital: GuardSnapshot) -> Self {
        let now = Utc::now();
        let status = StatusFile {
            version: STATUS_VERSION.to_string(),
            pid: std::process::id(),
            started_at: now,
            updated_at: now,
            mode,
            capital,
            portfolio: PortfolioSummary::default(),
            epoch: 0,
            last_scan: None,
        };

        Self {
            path,
            status: Mutex::new(status),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the runtime portion of the snapshot.
    pub fn update(
        &self,
        capital: GuardSnapshot,
        portfolio: PortfolioSummary,
        epoch: u64,
        last_scan: Option<&ScanSummaryEvent>,
    ) {
        let mut status = self.status.lock();
        status.capital = capital;
        status.portfolio = portfolio;
        status.epoch = epoch;
        if let Some(summary) = last_scan {
            status.last_scan = Some(StatusScan::from(summary));
        }
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StatusFile {
        self.status.lock().clone()
    }

    /// Write the current status to the file atomically.
    ///
    /// Writes to a sibling temp file and renames it over the target.
    /// Creates the parent directory if it doesn't exist.
    pub fn write(&self) -> Result<()> {
        let json = {
            let mut status = self.status.lock();
            status.updated_at = Utc::now();
            serde_json::to_string_pretty(&*status)?
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}

/// Read a status file written by [`StatusWriter`].
///
/// # Errors
///
/// Returns an IO error if the file is missing, or a JSON error if it is
/// not a valid snapshot.
pub fn read_status(path: &Path) -> Result<StatusFile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn capital() -> GuardSnapshot {
        GuardSnapshot {
            ceiling: dec!(1000),
            committed: dec!(0),
            available: dec!(1000),
            active_reservations: 0,
        }
    }

    #[test]
    fn write_then_read_preserves_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("status.json");
        let writer = StatusWriter::new(path.clone(), ExecutionMode::Sim, capital());

        let summary = ScanSummaryEvent {
            epoch: 3,
            events_a: 10,
            events_b: 12,
            pairs: 4,
            opportunities: 2,
            settled: 1,
            committed: dec!(0),
            ceiling: dec!(1000),
        };
        writer.update(capital(), PortfolioSummary::default(), 3, Some(&summary));
        writer.write().unwrap();

        let status = read_status(&path).unwrap();
        assert_eq!(status.version, STATUS_VERSION);
        assert_eq!(status.pid, std::process::id());
        assert_eq!(status.mode, ExecutionMode::Sim);
        assert_eq!(status.epoch, 3);
        assert_eq!(status.capital.ceiling, dec!(1000));
        assert_eq!(status.last_scan.unwrap().pairs, 4);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn update_without_summary_keeps_previous_scan() {
        let writer = StatusWriter::new(PathBuf::from("unused.json"), ExecutionMode::Sim, capital());
        let summary = ScanSummaryEvent {
            epoch: 1,
            ..ScanSummaryEvent::default()
        };
        writer.update(capital(), PortfolioSummary::default(), 1, Some(&summary));
        writer.update(capital(), PortfolioSummary::default(), 2, None);

        let snapshot = writer.snapshot();
        assert_eq!(snapshot.epoch, 2);
        assert_eq!(snapshot.last_scan.map(|s| s.epoch), Some(1));
    }

    #[test]
    fn reading_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_status(&dir.path().join("absent.json")).is_err());
    }
}
