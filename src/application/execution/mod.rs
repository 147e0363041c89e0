//! Execution engine.
//!
//! Drives one [`ExecutionRecord`] per opportunity through the state
//! machine:
//!
//! ```text
//! Detected ─► Reserved ─► Leg1Pending ─► Leg2Pending ─► Settled
//!    │           │             │              ├────► PartiallyFilled
//!    ▼           ▼             ├──► Aborted   └────► LegFailed
//! ReservationFailed  Aborted   └──► LegFailed
//! ```
//!
//! Capital is reserved through the [`CapitalGuard`] before any leg is
//! placed and released exactly once when the record goes terminal.

mod leg;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::application::guard::CapitalGuard;
use crate::application::portfolio::PortfolioLedger;
use crate::domain::economics::FeeSchedule;
use crate::domain::execution::{
    ExecutionMode, ExecutionRecord, ExecutionState, LegOutcome, LegSlot, Settlement,
};
use crate::domain::id::OpportunityKey;
use crate::domain::ledger::LedgerEntry;
use crate::domain::money::Amount;
use crate::domain::opportunity::Opportunity;
use crate::domain::venue::Venue;
use crate::error::ExecutionError;
use crate::port::outbound::notifier::{Event, ExecutionEvent, Notifier, PartialFillEvent};
use crate::port::outbound::venue::OrderClient;

use self::leg::LegPlacer;

/// Engine settings.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub mode: ExecutionMode,
    /// Upper bound on one leg's placement and confirmation.
    pub leg_timeout: Duration,
    /// Fractional price worsening applied to simulated fills.
    pub sim_slippage: Decimal,
    pub fees: FeeSchedule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sim,
            leg_timeout: Duration::from_secs(10),
            sim_slippage: Decimal::ZERO,
            fees: FeeSchedule::zero(),
        }
    }
}

struct Inflight {
    cancel: watch::Sender<bool>,
    state: ExecutionState,
}

/// Executes opportunities under the capital guard.
pub struct ExecutionEngine {
    mode: ExecutionMode,
    guard: Arc<CapitalGuard>,
    portfolio: Arc<PortfolioLedger>,
    notifier: Arc<dyn Notifier>,
    placer: LegPlacer,
    inflight: Mutex<HashMap<OpportunityKey, Inflight>>,
}

impl ExecutionEngine {
    #[must_use]
    pub fn new(
        guard: Arc<CapitalGuard>,
        portfolio: Arc<PortfolioLedger>,
        notifier: Arc<dyn Notifier>,
        config: EngineConfig,
    ) -> Self {
        Self {
            mode: config.mode,
            guard,
            portfolio,
            notifier,
            placer: LegPlacer::new(config.mode, config.fees, config.sim_slippage, config.leg_timeout),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Register the order client for its venue. Only consulted in live mode.
    #[must_use]
    pub fn with_order_client(mut self, client: Arc<dyn OrderClient>) -> Self {
        self.placer.add_client(client);
        self
    }

    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[must_use]
    pub fn has_order_client(&self, venue: Venue) -> bool {
        self.placer.has_client(venue)
    }

    #[must_use]
    pub fn guard(&self) -> &Arc<CapitalGuard> {
        &self.guard
    }

    #[must_use]
    pub fn portfolio(&self) -> &Arc<PortfolioLedger> {
        &self.portfolio
    }

    /// Executions currently holding capital.
    #[must_use]
    pub fn inflight_count(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Request cancellation of the in-flight execution for `key`.
    ///
    /// Returns `true` if the signal reached an execution that had not yet
    /// confirmed a fill. Orders already sent are still awaited up to the
    /// leg timeout; a fill they report wins over the cancellation, so a
    /// filled leg is never left off the books.
    pub fn cancel(&self, key: OpportunityKey) -> bool {
        let inflight = self.inflight.lock();
        let Some(entry) = inflight.get(&key) else {
            debug!(key = %key, "Nothing in flight to cancel");
            return false;
        };
        if !entry.state.is_cancellable() {
            warn!(key = %key, state = %entry.state, "Cancellation refused after fill");
            return false;
        }
        entry.cancel.send_replace(true);
        info!(key = %key, "Cancellation requested");
        true
    }

    /// Drive `opportunity` to a terminal record.
    ///
    /// Never fails: every problem becomes a terminal state with a failure
    /// reason on the returned record.
    pub async fn execute(&self, opportunity: &Opportunity) -> ExecutionRecord {
        let key = opportunity.key();
        let mut record = ExecutionRecord::new(key, self.mode);
        let size = opportunity.stake();
        let amount = self.placer.capital_required(opportunity, size);

        let reservation = match self.guard.reserve(key, amount) {
            Ok(reservation) => reservation,
            Err(rejection) => {
                let reason = ExecutionError::from(rejection).to_string();
                finish(&mut record, ExecutionState::ReservationFailed, Settlement::no_fill(reason));
                self.conclude(&record, opportunity);
                return record;
            }
        };

        advance(&mut record, ExecutionState::Reserved);
        if let Err(e) = record.attach_reservation(reservation.id(), amount) {
            error!(key = %key, error = %e, "Could not attach reservation");
        }
        let mut cancel_rx = self.register(key, record.state());

        if *cancel_rx.borrow() {
            finish(&mut record, ExecutionState::Aborted, cancelled());
            self.conclude(&record, opportunity);
            return record;
        }

        advance(&mut record, ExecutionState::Leg1Pending);
        self.track(key, record.state());

        // Leg A is polled first so its placement is always initiated first.
        let leg_a = self.placer.place(opportunity.leg_a(), size);
        let leg_b = self.placer.place(opportunity.leg_b(), size);
        tokio::pin!(leg_a);
        tokio::pin!(leg_b);

        let mut done_a = false;
        let mut done_b = false;
        let mut listening = true;
        let mut cancel_requested = false;

        // Both legs are sent on their first poll, so a cancellation can only
        // stop waiting for them, never unsend them. Legs already in flight
        // are drained; any fill they report is booked as usual.
        while !(done_a && done_b) {
            tokio::select! {
                biased;

                changed = cancel_rx.changed(), if listening && record.state().is_cancellable() => {
                    match changed {
                        Ok(()) if *cancel_rx.borrow() => {
                            cancel_requested = true;
                            listening = false;
                            debug!(key = %key, "Cancelled; draining legs in flight");
                        }
                        Ok(()) => {}
                        Err(_) => listening = false,
                    }
                }
                outcome = &mut leg_a, if !done_a => {
                    done_a = true;
                    self.on_leg(&mut record, LegSlot::A, outcome);
                }
                outcome = &mut leg_b, if !done_b => {
                    done_b = true;
                    self.on_leg(&mut record, LegSlot::B, outcome);
                }
            }
        }

        if cancel_requested && record.filled_legs() == 0 {
            finish(&mut record, ExecutionState::Aborted, cancelled());
        } else {
            if cancel_requested {
                warn!(key = %key, "Cancellation lost to a fill");
            }
            settle(&mut record);
        }
        self.conclude(&record, opportunity);
        record
    }

    fn on_leg(&self, record: &mut ExecutionRecord, slot: LegSlot, outcome: LegOutcome) {
        let filled = outcome.is_filled();
        if let Err(e) = record.record_leg(slot, outcome) {
            error!(key = %record.key(), error = %e, "Could not record leg");
        }
        if filled && record.state() == ExecutionState::Leg1Pending {
            advance(record, ExecutionState::Leg2Pending);
            self.track(record.key(), record.state());
        }
    }

    fn register(&self, key: OpportunityKey, state: ExecutionState) -> watch::Receiver<bool> {
        let (cancel, rx) = watch::channel(false);
        self.inflight.lock().insert(key, Inflight { cancel, state });
        rx
    }

    fn track(&self, key: OpportunityKey, state: ExecutionState) {
        if let Some(entry) = self.inflight.lock().get_mut(&key) {
            entry.state = state;
        }
    }

    /// Terminal bookkeeping: release, ledger, alerts.
    fn conclude(&self, record: &ExecutionRecord, opportunity: &Opportunity) {
        let key = record.key();

        // Only a record that reserved was registered; a refused duplicate
        // must not drop the live entry for its key.
        if let Some(reservation) = record.reservation() {
            self.inflight.lock().remove(&key);
            if let Err(e) = self.guard.release(reservation, spent(record)) {
                error!(key = %key, reservation = %reservation, error = %e, "Release failed");
            }
        }
        if let Some(entry) = LedgerEntry::from_record(record) {
            self.portfolio.append(entry);
        }

        let pnl = record.realized_pnl().unwrap_or_default();
        match record.state() {
            ExecutionState::PartiallyFilled => {
                error!(
                    key = %key,
                    execution = %record.id(),
                    pnl = %pnl,
                    unrealized = %record.unrealized_pnl().unwrap_or_default(),
                    reason = record.failure_reason().unwrap_or_default(),
                    "Partial fill left unhedged exposure"
                );
            }
            ExecutionState::Settled => {
                info!(key = %key, execution = %record.id(), pnl = %pnl, "Execution settled");
            }
            state => {
                info!(
                    key = %key,
                    execution = %record.id(),
                    state = %state,
                    reason = record.failure_reason().unwrap_or_default(),
                    "Execution ended"
                );
            }
        }

        self.notifier
            .notify(Event::ExecutionCompleted(ExecutionEvent::from(record)));
        if let Some(partial) = PartialFillEvent::from_record(record, opportunity.question()) {
            self.notifier.notify(Event::PartialFill(partial));
        }
    }
}

/// Pick the terminal state from the two leg outcomes.
fn settle(record: &mut ExecutionRecord) {
    let (state, settlement) = match (record.leg(LegSlot::A), record.leg(LegSlot::B)) {
        (LegOutcome::Filled(a), LegOutcome::Filled(b)) => {
            (ExecutionState::Settled, Settlement::from_fills(a, b))
        }
        (LegOutcome::Filled(fill), other) | (other, LegOutcome::Filled(fill)) => {
            let reason = ExecutionError::PartiallyFilled(leg_reason(other)).to_string();
            (
                ExecutionState::PartiallyFilled,
                Settlement::unhedged(fill, reason),
            )
        }
        (a, b) => {
            let reason = ExecutionError::LegFailed(format!("{}; {}", leg_reason(a), leg_reason(b)));
            (ExecutionState::LegFailed, Settlement::no_fill(reason.to_string()))
        }
    };
    finish(record, state, settlement);
}

fn leg_reason(outcome: &LegOutcome) -> String {
    match outcome {
        LegOutcome::Failed { venue, side, reason } => format!("{venue} {side}: {reason}"),
        LegOutcome::Pending => "leg never resolved".to_string(),
        LegOutcome::Filled(fill) => format!("{} {} filled", fill.venue, fill.side),
    }
}

fn cancelled() -> Settlement {
    Settlement::no_fill(ExecutionError::Cancelled.to_string())
}

/// Dollars actually paid out across filled legs.
fn spent(record: &ExecutionRecord) -> Amount {
    [LegSlot::A, LegSlot::B]
        .into_iter()
        .filter_map(|slot| record.leg(slot).fill())
        .map(|fill| fill.notional() + fill.fee)
        .sum()
}

fn advance(record: &mut ExecutionRecord, to: ExecutionState) {
    let from = record.state();
    match record.transition(to) {
        Ok(()) => debug!(key = %record.key(), %from, %to, "Execution transition"),
        Err(e) => error!(key = %record.key(), error = %e, "Illegal execution transition"),
    }
}

fn finish(record: &mut ExecutionRecord, to: ExecutionState, settlement: Settlement) {
    let from = record.state();
    match record.finish(to, settlement) {
        Ok(()) => debug!(key = %record.key(), %from, %to, "Execution transition"),
        Err(e) => error!(key = %record.key(), error = %e, "Illegal execution transition"),
    }
}
