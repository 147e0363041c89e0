//! Execution records and their state machine.
//!
//! A record is created when the engine accepts an opportunity, moves
//! forward through the pending states, and is frozen once it reaches a
//! terminal state. History is append-only.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{EventId, ExecutionId, OpportunityKey, ReservationId};
use super::money::{Amount, Price, Volume, CONTRACT_PAYOUT};
use super::venue::{Side, Venue};

/// Execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
    Detected,
    Reserved,
    /// Legs in flight, no fill confirmed yet.
    Leg1Pending,
    /// One leg filled, waiting on the other.
    Leg2Pending,
    Settled,
    ReservationFailed,
    /// No leg filled.
    LegFailed,
    /// Exactly one leg filled. Unhedged exposure.
    PartiallyFilled,
    Aborted,
}

impl ExecutionState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Settled
                | Self::ReservationFailed
                | Self::LegFailed
                | Self::PartiallyFilled
                | Self::Aborted
        )
    }

    /// Whether external cancellation may still abort the record.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Reserved | Self::Leg1Pending)
    }

    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        use ExecutionState::*;
        matches!(
            (self, to),
            (Detected, Reserved)
                | (Detected, ReservationFailed)
                | (Reserved, Leg1Pending)
                | (Reserved, Aborted)
                | (Leg1Pending, Leg2Pending)
                | (Leg1Pending, LegFailed)
                | (Leg1Pending, Aborted)
                | (Leg2Pending, Settled)
                | (Leg2Pending, PartiallyFilled)
                | (Leg2Pending, LegFailed)
        )
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Whether legs are simulated or routed to venue order clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    #[serde(alias = "simulated")]
    Sim,
    Live,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim => f.write_str("sim"),
            Self::Live => f.write_str("live"),
        }
    }
}

/// Which of the two legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegSlot {
    A,
    B,
}

/// A confirmed fill on one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegFill {
    pub venue: Venue,
    pub event_id: EventId,
    pub side: Side,
    pub filled_price: Price,
    pub filled_size: Volume,
    pub fee: Amount,
}

impl LegFill {
    #[must_use]
    pub fn notional(&self) -> Amount {
        self.filled_price * self.filled_size
    }
}

/// Resolution of a single leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegOutcome {
    Pending,
    Filled(LegFill),
    Failed {
        venue: Venue,
        side: Side,
        reason: String,
    },
}

impl LegOutcome {
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        matches!(self, Self::Filled(_))
    }

    #[must_use]
    pub const fn fill(&self) -> Option<&LegFill> {
        match self {
            Self::Filled(fill) => Some(fill),
            _ => None,
        }
    }
}

/// One recorded state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: ExecutionState,
    pub to: ExecutionState,
    pub at: DateTime<Utc>,
}

/// Final figures written to a record when it reaches a terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Locked in: hedged payout less what the hedge cost, and fees.
    pub realized_pnl: Amount,
    /// Open position marked at zero payout.
    pub unrealized_pnl: Amount,
    pub fees_paid: Amount,
    /// Contracts (as notional dollars) left without a hedge.
    pub unhedged_exposure: Amount,
    /// Contracts held on both sides.
    pub hedged_size: Volume,
    pub failure_reason: Option<String>,
}

impl Settlement {
    /// Both legs filled: payout of the hedged size minus what was paid.
    #[must_use]
    pub fn from_fills(a: &LegFill, b: &LegFill) -> Self {
        let hedged_size = a.filled_size.min(b.filled_size);
        let fees_paid = a.fee + b.fee;

        // Any size beyond the hedge is a naked position on the larger leg.
        let residual = (a.filled_size - b.filled_size).abs();
        let residual_price = if a.filled_size > b.filled_size {
            a.filled_price
        } else {
            b.filled_price
        };
        let open_cost = residual * residual_price;
        let realized_pnl = CONTRACT_PAYOUT * hedged_size - a.notional() - b.notional()
            + open_cost
            - fees_paid;

        Self {
            realized_pnl,
            unrealized_pnl: -open_cost,
            fees_paid,
            unhedged_exposure: open_cost,
            hedged_size,
            failure_reason: None,
        }
    }

    /// One leg filled, the other did not. Only the fee is realized; the
    /// position stays open and is marked at its worst case.
    #[must_use]
    pub fn unhedged(fill: &LegFill, reason: impl Into<String>) -> Self {
        let exposure = fill.notional() + fill.fee;
        Self {
            realized_pnl: -fill.fee,
            unrealized_pnl: -fill.notional(),
            fees_paid: fill.fee,
            unhedged_exposure: exposure,
            hedged_size: Decimal::ZERO,
            failure_reason: Some(reason.into()),
        }
    }

    /// Nothing filled.
    #[must_use]
    pub fn no_fill(reason: impl Into<String>) -> Self {
        Self {
            failure_reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// One attempt to realize an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    id: ExecutionId,
    key: OpportunityKey,
    mode: ExecutionMode,
    state: ExecutionState,
    history: Vec<Transition>,
    leg_a: LegOutcome,
    leg_b: LegOutcome,
    reservation: Option<ReservationId>,
    capital_held: Amount,
    settlement: Option<Settlement>,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    #[must_use]
    pub fn new(key: OpportunityKey, mode: ExecutionMode) -> Self {
        Self {
            id: ExecutionId::generate(),
            key,
            mode,
            state: ExecutionState::Detected,
            history: Vec::new(),
            leg_a: LegOutcome::Pending,
            leg_b: LegOutcome::Pending,
            reservation: None,
            capital_held: Decimal::ZERO,
            settlement: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move to a non-terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the move is not legal
    /// or `to` is terminal (use [`Self::finish`] for those).
    pub fn transition(&mut self, to: ExecutionState) -> Result<(), DomainError> {
        if to.is_terminal() || !self.state.can_transition_to(to) {
            return Err(self.refuse(to));
        }
        self.push(to);
        Ok(())
    }

    /// Move to a terminal state and freeze the record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if `to` is not terminal or
    /// not reachable from the current state.
    pub fn finish(&mut self, to: ExecutionState, settlement: Settlement) -> Result<(), DomainError> {
        if !to.is_terminal() || !self.state.can_transition_to(to) {
            return Err(self.refuse(to));
        }
        self.push(to);
        self.settlement = Some(settlement);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Attach the capital reservation backing this attempt.
    ///
    /// # Errors
    ///
    /// Fails once the record is terminal.
    pub fn attach_reservation(
        &mut self,
        reservation: ReservationId,
        amount: Amount,
    ) -> Result<(), DomainError> {
        self.ensure_open(ExecutionState::Reserved)?;
        self.reservation = Some(reservation);
        self.capital_held = amount;
        Ok(())
    }

    /// Record the outcome of one leg.
    ///
    /// # Errors
    ///
    /// Fails once the record is terminal.
    pub fn record_leg(&mut self, slot: LegSlot, outcome: LegOutcome) -> Result<(), DomainError> {
        self.ensure_open(self.state)?;
        match slot {
            LegSlot::A => self.leg_a = outcome,
            LegSlot::B => self.leg_b = outcome,
        }
        Ok(())
    }

    fn ensure_open(&self, to: ExecutionState) -> Result<(), DomainError> {
        if self.state.is_terminal() {
            return Err(self.refuse(to));
        }
        Ok(())
    }

    fn refuse(&self, to: ExecutionState) -> DomainError {
        DomainError::InvalidTransition {
            from: self.state,
            to,
        }
    }

    fn push(&mut self, to: ExecutionState) {
        self.history.push(Transition {
            from: self.state,
            to,
            at: Utc::now(),
        });
        self.state = to;
    }

    #[must_use]
    pub const fn id(&self) -> ExecutionId {
        self.id
    }

    #[must_use]
    pub const fn key(&self) -> OpportunityKey {
        self.key
    }

    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[must_use]
    pub const fn state(&self) -> ExecutionState {
        self.state
    }

    #[must_use]
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    #[must_use]
    pub const fn leg(&self, slot: LegSlot) -> &LegOutcome {
        match slot {
            LegSlot::A => &self.leg_a,
            LegSlot::B => &self.leg_b,
        }
    }

    #[must_use]
    pub fn filled_legs(&self) -> usize {
        [&self.leg_a, &self.leg_b]
            .into_iter()
            .filter(|leg| leg.is_filled())
            .count()
    }

    #[must_use]
    pub const fn reservation(&self) -> Option<ReservationId> {
        self.reservation
    }

    #[must_use]
    pub const fn capital_held(&self) -> Amount {
        self.capital_held
    }

    #[must_use]
    pub const fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Realized P&L, known only once terminal.
    #[must_use]
    pub fn realized_pnl(&self) -> Option<Amount> {
        self.settlement.as_ref().map(|s| s.realized_pnl)
    }

    #[must_use]
    pub fn unrealized_pnl(&self) -> Option<Amount> {
        self.settlement.as_ref().map(|s| s.unrealized_pnl)
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.settlement
            .as_ref()
            .and_then(|s| s.failure_reason.as_deref())
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.created_at
    }
}
