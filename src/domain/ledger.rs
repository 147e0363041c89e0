//! Portfolio ledger rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::execution::{ExecutionRecord, ExecutionState};
use super::id::{ExecutionId, OpportunityKey};
use super::money::{Amount, Volume};

/// Classification of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Both legs filled; P&L is the realized arbitrage.
    Settled,
    /// One leg filled; the open leg is carried as unrealized P&L.
    Unhedged,
    /// No capital ever left the account.
    NoFill,
}

/// One row per terminal execution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub execution_id: ExecutionId,
    pub key: OpportunityKey,
    pub state: ExecutionState,
    pub kind: EntryKind,
    pub realized_pnl: Amount,
    /// Open position marked at zero payout. Zero unless a leg is unhedged.
    pub unrealized_pnl: Amount,
    pub fees_paid: Amount,
    pub capital_held: Amount,
    pub unhedged_exposure: Amount,
    pub hedged_size: Volume,
    pub duration_ms: i64,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build the row for a terminal record. Returns `None` while the
    /// record is still in flight.
    #[must_use]
    pub fn from_record(record: &ExecutionRecord) -> Option<Self> {
        if !record.state().is_terminal() {
            return None;
        }
        let settlement = record.settlement().cloned().unwrap_or_default();
        let kind = match record.state() {
            ExecutionState::Settled => EntryKind::Settled,
            ExecutionState::PartiallyFilled => EntryKind::Unhedged,
            _ => EntryKind::NoFill,
        };

        Some(Self {
            execution_id: record.id(),
            key: record.key(),
            state: record.state(),
            kind,
            realized_pnl: settlement.realized_pnl,
            unrealized_pnl: settlement.unrealized_pnl,
            fees_paid: settlement.fees_paid,
            capital_held: record.capital_held(),
            unhedged_exposure: settlement.unhedged_exposure,
            hedged_size: settlement.hedged_size,
            duration_ms: record.duration().num_milliseconds(),
            recorded_at: Utc::now(),
        })
    }

    /// Realized plus unrealized.
    #[must_use]
    pub fn net_pnl(&self) -> Amount {
        self.realized_pnl + self.unrealized_pnl
    }

    /// Realized P&L per hedged contract, for settled rows.
    #[must_use]
    pub fn edge_captured(&self) -> Option<Decimal> {
        if self.kind != EntryKind::Settled || self.hedged_size.is_zero() {
            return None;
        }
        Some(self.realized_pnl / self.hedged_size)
    }
}
