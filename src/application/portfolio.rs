//! Append-only portfolio ledger.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::{EntryKind, LedgerEntry};
use crate::domain::money::Amount;

/// Aggregate view over all ledger entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub entries: usize,
    pub total_realized_pnl: Amount,
    /// Worst-case mark of legs left open by partial fills.
    pub total_unrealized_pnl: Amount,
    pub total_fees: Amount,
    pub wins: usize,
    pub losses: usize,
    pub unhedged: usize,
    /// Mean realized P&L per hedged contract over settled entries.
    pub average_edge_captured: Option<Decimal>,
}

/// Records one entry per terminal execution. Entries are never mutated
/// or removed; readers may query concurrently with appends.
#[derive(Debug, Default)]
pub struct PortfolioLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl PortfolioLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: LedgerEntry) {
        self.entries.write().push(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of all entries in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.read().clone()
    }

    #[must_use]
    pub fn total_realized_pnl(&self) -> Amount {
        self.entries.read().iter().map(|e| e.realized_pnl).sum()
    }

    #[must_use]
    pub fn total_unrealized_pnl(&self) -> Amount {
        self.entries.read().iter().map(|e| e.unrealized_pnl).sum()
    }

    #[must_use]
    pub fn total_fees(&self) -> Amount {
        self.entries.read().iter().map(|e| e.fees_paid).sum()
    }

    /// Executions that ended with one leg filled.
    #[must_use]
    pub fn unhedged_count(&self) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|e| e.kind == EntryKind::Unhedged)
            .count()
    }

    #[must_use]
    pub fn win_count(&self) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|e| e.net_pnl() > Decimal::ZERO)
            .count()
    }

    #[must_use]
    pub fn loss_count(&self) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|e| e.net_pnl() < Decimal::ZERO)
            .count()
    }

    #[must_use]
    pub fn average_edge_captured(&self) -> Option<Decimal> {
        average_edge(&self.entries.read())
    }

    #[must_use]
    pub fn summary(&self) -> PortfolioSummary {
        let entries = self.entries.read();
        PortfolioSummary {
            entries: entries.len(),
            total_realized_pnl: entries.iter().map(|e| e.realized_pnl).sum(),
            total_unrealized_pnl: entries.iter().map(|e| e.unrealized_pnl).sum(),
            total_fees: entries.iter().map(|e| e.fees_paid).sum(),
            wins: entries
                .iter()
                .filter(|e| e.net_pnl() > Decimal::ZERO)
                .count(),
            losses: entries
                .iter()
                .filter(|e| e.net_pnl() < Decimal::ZERO)
                .count(),
            unhedged: entries
                .iter()
                .filter(|e| e.kind == EntryKind::Unhedged)
                .count(),
            average_edge_captured: average_edge(&entries),
        }
    }
}

fn average_edge(entries: &[LedgerEntry]) -> Option<Decimal> {
    let edges: Vec<Decimal> = entries.iter().filter_map(LedgerEntry::edge_captured).collect();
    if edges.is_empty() {
        return None;
    }
    let total: Decimal = edges.iter().sum();
    Some(total / Decimal::from(edges.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionState;
    use crate::domain::id::{ExecutionId, OpportunityKey};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn entry(kind: EntryKind, pnl: Decimal, hedged: Decimal) -> LedgerEntry {
        open_entry(kind, pnl, Decimal::ZERO, hedged)
    }

    fn open_entry(kind: EntryKind, pnl: Decimal, open: Decimal, hedged: Decimal) -> LedgerEntry {
        let state = match kind {
            EntryKind::Settled => ExecutionState::Settled,
            EntryKind::Unhedged => ExecutionState::PartiallyFilled,
            EntryKind::NoFill => ExecutionState::LegFailed,
        };
        LedgerEntry {
            execution_id: ExecutionId::generate(),
            key: OpportunityKey::from_raw(1),
            state,
            kind,
            realized_pnl: pnl,
            unrealized_pnl: open,
            fees_paid: dec!(0.1),
            capital_held: dec!(100),
            unhedged_exposure: dec!(0),
            hedged_size: hedged,
            duration_ms: 5,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn empty_ledger_has_no_average() {
        let ledger = PortfolioLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.average_edge_captured(), None);
        assert_eq!(ledger.summary(), PortfolioSummary::default());
    }

    #[test]
    fn aggregates_wins_losses_and_edge() {
        let ledger = PortfolioLedger::new();
        ledger.append(entry(EntryKind::Settled, dec!(3), dec!(100)));
        ledger.append(entry(EntryKind::Settled, dec!(1), dec!(50)));
        ledger.append(open_entry(EntryKind::Unhedged, dec!(-0.1), dec!(-45), dec!(0)));
        ledger.append(entry(EntryKind::NoFill, dec!(0), dec!(0)));

        let summary = ledger.summary();
        assert_eq!(summary.entries, 4);
        assert_eq!(summary.total_realized_pnl, dec!(3.9));
        assert_eq!(summary.total_unrealized_pnl, dec!(-45));
        assert_eq!(summary.total_fees, dec!(0.4));
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.unhedged, 1);
        // (0.03 + 0.02) / 2
        assert_eq!(summary.average_edge_captured, Some(dec!(0.025)));

        assert_eq!(ledger.win_count(), 2);
        assert_eq!(ledger.loss_count(), 1);
        assert_eq!(ledger.total_realized_pnl(), dec!(3.9));
        assert_eq!(ledger.total_unrealized_pnl(), dec!(-45));
        assert_eq!(ledger.total_fees(), dec!(0.4));
        assert_eq!(ledger.unhedged_count(), 1);
    }

    #[test]
    fn entries_preserve_append_order() {
        let ledger = PortfolioLedger::new();
        ledger.append(entry(EntryKind::Settled, dec!(1), dec!(1)));
        ledger.append(entry(EntryKind::NoFill, dec!(0), dec!(0)));

        let kinds: Vec<_> = ledger.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Settled, EntryKind::NoFill]);
    }
}
