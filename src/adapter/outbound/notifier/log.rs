use tracing::{debug, error, info, warn};

use crate::port::outbound::notifier::{Event, Notifier};

/// Notifier that writes every event to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::OpportunityDetected(e) => info!(
                key = %e.key,
                question = %e.question,
                orientation = %e.orientation,
                net_edge = %e.net_edge,
                stake = %e.stake,
                expected_profit = %e.expected_profit,
                "Opportunity detected"
            ),
            Event::ValidationRejected(e) => info!(
                key = %e.key,
                question = %e.question,
                rationale = %e.rationale,
                "Opportunity not confirmed"
            ),
            Event::ExecutionCompleted(e) if e.success() => info!(
                key = %e.key,
                execution_id = %e.execution_id,
                mode = %e.mode,
                realized_pnl = %e.realized_pnl,
                fees = %e.fees_paid,
                "Execution settled"
            ),
            Event::ExecutionCompleted(e) => warn!(
                key = %e.key,
                execution_id = %e.execution_id,
                mode = %e.mode,
                state = %e.state,
                reason = e.failure_reason.as_deref().unwrap_or(""),
                "Execution did not settle"
            ),
            Event::PartialFill(e) => error!(
                key = %e.key,
                execution_id = %e.execution_id,
                question = %e.question,
                venue = %e.filled_venue,
                side = %e.filled_side,
                exposure = %e.exposure,
                reason = %e.reason,
                "UNHEDGED partial fill"
            ),
            Event::ScanCompleted(e) => debug!(
                epoch = e.epoch,
                events_a = e.events_a,
                events_b = e.events_b,
                pairs = e.pairs,
                opportunities = e.opportunities,
                settled = e.settled,
                committed = %e.committed,
                ceiling = %e.ceiling,
                "Scan summary"
            ),
        }
    }
}

/// Notifier that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}
