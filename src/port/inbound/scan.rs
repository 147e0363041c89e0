//! Scan-cycle entry point.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::execution::{ExecutionRecord, ExecutionState};
use crate::domain::id::OpportunityKey;

/// Why an opportunity was not handed to the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Validator answered "no".
    NotConfirmed { rationale: String },
    /// Validator errored or timed out.
    ValidatorUnavailable { reason: String },
}

/// What happened to one opportunity in a cycle.
#[derive(Debug, Clone, Serialize)]
pub enum ExecutionOutcome {
    /// The engine drove a record to a terminal state.
    Completed(ExecutionRecord),
    /// The opportunity never reached the engine.
    Skipped { key: OpportunityKey, reason: SkipReason },
}

impl ExecutionOutcome {
    #[must_use]
    pub fn key(&self) -> OpportunityKey {
        match self {
            Self::Completed(record) => record.key(),
            Self::Skipped { key, .. } => *key,
        }
    }

    /// Terminal state, if the engine ran.
    #[must_use]
    pub fn state(&self) -> Option<ExecutionState> {
        match self {
            Self::Completed(record) => Some(record.state()),
            Self::Skipped { .. } => None,
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&ExecutionRecord> {
        match self {
            Self::Completed(record) => Some(record),
            Self::Skipped { .. } => None,
        }
    }
}

/// Runs one detect-validate-execute pass.
///
/// Driven by the scheduler on a period and by `run --once`. Never fails:
/// every problem is logged or represented in the returned outcomes.
#[async_trait]
pub trait ScanCycle: Send + Sync {
    async fn run_scan_cycle(&self) -> Vec<ExecutionOutcome>;
}
