//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about
//! system events such as detected opportunities, terminal executions,
//! and unhedged partial fills.

use rust_decimal::Decimal;

use crate::domain::execution::{ExecutionMode, ExecutionRecord, ExecutionState, LegSlot};
use crate::domain::id::{ExecutionId, OpportunityKey};
use crate::domain::opportunity::Opportunity;
use crate::domain::venue::{Side, Venue};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// Scanner emitted an opportunity.
    OpportunityDetected(OpportunityEvent),
    /// Validator did not confirm an opportunity.
    ValidationRejected(ValidationEvent),
    /// Execution reached a terminal state.
    ExecutionCompleted(ExecutionEvent),
    /// One leg filled and the other did not.
    PartialFill(PartialFillEvent),
    /// Scan cycle finished.
    ScanCompleted(ScanSummaryEvent),
}

/// Delivery urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Normal,
    High,
}

impl Event {
    #[must_use]
    pub const fn priority(&self) -> Priority {
        match self {
            Self::PartialFill(_) => Priority::High,
            _ => Priority::Normal,
        }
    }
}

/// Opportunity detection event.
#[derive(Debug, Clone)]
pub struct OpportunityEvent {
    pub key: OpportunityKey,
    pub question: String,
    pub orientation: String,
    pub net_edge: Decimal,
    pub stake: Decimal,
    pub expected_profit: Decimal,
}

impl From<&Opportunity> for OpportunityEvent {
    fn from(opp: &Opportunity) -> Self {
        Self {
            key: opp.key(),
            question: opp.question().to_string(),
            orientation: opp.orientation().to_string(),
            net_edge: opp.net_edge(),
            stake: opp.stake(),
            expected_profit: opp.expected_profit(),
        }
    }
}

/// Validator rejection event.
#[derive(Debug, Clone)]
pub struct ValidationEvent {
    pub key: OpportunityKey,
    pub question: String,
    pub rationale: String,
}

/// Terminal execution event.
#[derive(Debug, Clone)]
pub struct ExecutionEvent {
    pub key: OpportunityKey,
    pub execution_id: ExecutionId,
    pub mode: ExecutionMode,
    pub state: ExecutionState,
    pub realized_pnl: Decimal,
    pub fees_paid: Decimal,
    pub failure_reason: Option<String>,
}

impl ExecutionEvent {
    #[must_use]
    pub fn success(&self) -> bool {
        self.state == ExecutionState::Settled
    }
}

impl From<&ExecutionRecord> for ExecutionEvent {
    fn from(record: &ExecutionRecord) -> Self {
        let settlement = record.settlement().cloned().unwrap_or_default();
        Self {
            key: record.key(),
            execution_id: record.id(),
            mode: record.mode(),
            state: record.state(),
            realized_pnl: settlement.realized_pnl,
            fees_paid: settlement.fees_paid,
            failure_reason: settlement.failure_reason,
        }
    }
}

/// Unhedged exposure left by a partial fill.
#[derive(Debug, Clone)]
pub struct PartialFillEvent {
    pub key: OpportunityKey,
    pub execution_id: ExecutionId,
    pub question: String,
    pub filled_venue: Venue,
    pub filled_side: Side,
    pub exposure: Decimal,
    pub reason: String,
}

impl PartialFillEvent {
    /// Build from a `PartiallyFilled` record, or `None` for any other record.
    #[must_use]
    pub fn from_record(record: &ExecutionRecord, question: &str) -> Option<Self> {
        if record.state() != ExecutionState::PartiallyFilled {
            return None;
        }
        let fill = record
            .leg(LegSlot::A)
            .fill()
            .or_else(|| record.leg(LegSlot::B).fill())?;
        let settlement = record.settlement()?;

        Some(Self {
            key: record.key(),
            execution_id: record.id(),
            question: question.to_string(),
            filled_venue: fill.venue,
            filled_side: fill.side,
            exposure: settlement.unhedged_exposure,
            reason: settlement.failure_reason.clone().unwrap_or_default(),
        })
    }
}

/// Scan cycle summary.
#[derive(Debug, Clone, Default)]
pub struct ScanSummaryEvent {
    pub epoch: u64,
    pub events_a: usize,
    pub events_b: usize,
    pub pairs: usize,
    pub opportunities: usize,
    pub settled: usize,
    pub committed: Decimal,
    pub ceiling: Decimal,
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method must not block or perform slow I/O synchronously
/// - Spawn a task or push onto a channel for slow operations
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}
