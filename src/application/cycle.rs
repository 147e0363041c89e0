//! One detect-validate-execute pass across both venues.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use parking_lot::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::execution::ExecutionEngine;
use crate::application::matcher::EventMatcher;
use crate::application::scanner::OpportunityScanner;
use crate::application::validation::ValidationGate;
use crate::domain::execution::ExecutionState;
use crate::domain::id::EventId;
use crate::domain::opportunity::Opportunity;
use crate::domain::pair::EventPair;
use crate::domain::quote::{MarketQuote, QuoteBook};
use crate::domain::venue::{Venue, VenueEvent};
use crate::error::ValidationError;
use crate::port::inbound::scan::{ExecutionOutcome, ScanCycle, SkipReason};
use crate::port::outbound::notifier::{
    Event, Notifier, OpportunityEvent, ScanSummaryEvent, ValidationEvent,
};
use crate::port::outbound::venue::QuoteSource;

/// Limits applied to venue calls within a cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleConfig {
    /// Timeout for each listing and each quote request.
    pub quote_timeout: Duration,
    /// Events kept from each venue listing.
    pub max_events_per_venue: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            quote_timeout: Duration::from_secs(5),
            max_events_per_venue: 30,
        }
    }
}

/// Scan-cycle service wiring sources, matcher, scanner, gate and engine.
pub struct ScanService {
    source_a: Arc<dyn QuoteSource>,
    source_b: Arc<dyn QuoteSource>,
    matcher: EventMatcher,
    scanner: OpportunityScanner,
    gate: ValidationGate,
    engine: Arc<ExecutionEngine>,
    notifier: Arc<dyn Notifier>,
    config: CycleConfig,
    epoch: AtomicU64,
    last_summary: RwLock<Option<ScanSummaryEvent>>,
}

impl ScanService {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_a: Arc<dyn QuoteSource>,
        source_b: Arc<dyn QuoteSource>,
        matcher: EventMatcher,
        scanner: OpportunityScanner,
        gate: ValidationGate,
        engine: Arc<ExecutionEngine>,
        notifier: Arc<dyn Notifier>,
        config: CycleConfig,
    ) -> Self {
        Self {
            source_a,
            source_b,
            matcher,
            scanner,
            gate,
            engine,
            notifier,
            config,
            epoch: AtomicU64::new(0),
            last_summary: RwLock::new(None),
        }
    }

    /// Epoch of the most recently started cycle.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn last_summary(&self) -> Option<ScanSummaryEvent> {
        self.last_summary.read().clone()
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<ExecutionEngine> {
        &self.engine
    }

    async fn list(&self, source: &Arc<dyn QuoteSource>) -> Vec<VenueEvent> {
        match timeout(self.config.quote_timeout, source.list_active_events()).await {
            Ok(Ok(mut events)) => {
                events.truncate(self.config.max_events_per_venue);
                events
            }
            Ok(Err(e)) => {
                warn!(venue = %source.venue(), error = %e, "Event listing failed");
                Vec::new()
            }
            Err(_) => {
                warn!(venue = %source.venue(), "Event listing timed out");
                Vec::new()
            }
        }
    }

    fn source_for(&self, venue: Venue) -> &Arc<dyn QuoteSource> {
        if self.source_b.venue() == venue {
            &self.source_b
        } else {
            &self.source_a
        }
    }

    async fn quotes(&self, event: &VenueEvent) -> [Option<MarketQuote>; 2] {
        let source = self.source_for(event.venue());
        match timeout(self.config.quote_timeout, source.get_quotes(event)).await {
            Ok(Ok((yes, no))) => [yes, no],
            Ok(Err(e)) => {
                debug!(venue = %event.venue(), event = %event.id(), error = %e, "Quote failed");
                [None, None]
            }
            Err(_) => {
                debug!(venue = %event.venue(), event = %event.id(), "Quote timed out");
                [None, None]
            }
        }
    }

    /// Fetch both sides of every event that appears in a pair.
    async fn collect_quotes(&self, pairs: &[EventPair]) -> QuoteBook {
        let mut seen: HashSet<(Venue, EventId)> = HashSet::new();
        let wanted: Vec<&VenueEvent> = pairs
            .iter()
            .flat_map(|p| [p.a(), p.b()])
            .filter(|event| seen.insert((event.venue(), event.id().clone())))
            .collect();

        join_all(wanted.into_iter().map(|event| self.quotes(event)))
            .await
            .into_iter()
            .flatten()
            .flatten()
            .collect()
    }

    async fn gate(&self, opportunity: &Opportunity) -> Option<SkipReason> {
        match self.gate.check(opportunity).await {
            Ok(decision) if decision.confirmed => None,
            Ok(decision) => {
                self.notifier
                    .notify(Event::ValidationRejected(ValidationEvent {
                        key: opportunity.key(),
                        question: opportunity.question().to_string(),
                        rationale: decision.rationale.clone(),
                    }));
                info!(key = %opportunity.key(), rationale = %decision.rationale, "Opportunity not confirmed");
                Some(SkipReason::NotConfirmed {
                    rationale: decision.rationale,
                })
            }
            Err(ValidationError::ValidatorUnavailable(reason)) => {
                self.notifier
                    .notify(Event::ValidationRejected(ValidationEvent {
                        key: opportunity.key(),
                        question: opportunity.question().to_string(),
                        rationale: reason.clone(),
                    }));
                Some(SkipReason::ValidatorUnavailable { reason })
            }
        }
    }
}

#[async_trait]
impl ScanCycle for ScanService {
    async fn run_scan_cycle(&self) -> Vec<ExecutionOutcome> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let (events_a, events_b) =
            tokio::join!(self.list(&self.source_a), self.list(&self.source_b));

        let report = self.matcher.match_events(&events_a, &events_b);
        let quotes = self.collect_quotes(&report.pairs).await;
        let opportunities = self.scanner.scan(&report.pairs, &quotes, epoch);

        debug!(
            epoch,
            events_a = events_a.len(),
            events_b = events_b.len(),
            pairs = report.pairs.len(),
            ambiguous = report.ambiguous.len(),
            quotes = quotes.len(),
            opportunities = opportunities.len(),
            "Scan priced"
        );

        for opportunity in &opportunities {
            self.notifier
                .notify(Event::OpportunityDetected(OpportunityEvent::from(opportunity)));
        }

        let verdicts = join_all(opportunities.iter().map(|o| self.gate(o))).await;

        let mut skipped = Vec::new();
        let mut approved = Vec::new();
        for (opportunity, verdict) in opportunities.iter().zip(verdicts) {
            match verdict {
                Some(reason) => skipped.push(ExecutionOutcome::Skipped {
                    key: opportunity.key(),
                    reason,
                }),
                None => approved.push(opportunity),
            }
        }
        // One at a time in edge order: the best opportunity claims capital
        // first and a later one only sees what it left.
        let mut records = Vec::with_capacity(approved.len());
        for opportunity in approved {
            records.push(self.engine.execute(opportunity).await);
        }

        let settled = records
            .iter()
            .filter(|r| r.state() == ExecutionState::Settled)
            .count();
        let guard = self.engine.guard();
        let summary = ScanSummaryEvent {
            epoch,
            events_a: events_a.len(),
            events_b: events_b.len(),
            pairs: report.pairs.len(),
            opportunities: opportunities.len(),
            settled,
            committed: guard.committed(),
            ceiling: guard.ceiling(),
        };

        info!(
            epoch,
            pairs = summary.pairs,
            opportunities = summary.opportunities,
            executed = records.len(),
            settled,
            skipped = skipped.len(),
            "Scan cycle complete"
        );

        self.notifier.notify(Event::ScanCompleted(summary.clone()));
        *self.last_summary.write() = Some(summary);

        records
            .into_iter()
            .map(ExecutionOutcome::Completed)
            .chain(skipped)
            .collect()
    }
}
