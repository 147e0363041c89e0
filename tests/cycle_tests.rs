//! End-to-end scan cycles over in-memory venues.

mod harness;
mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crossedge::adapter::outbound::validator::ThresholdValidator;
use crossedge::application::cycle::{CycleConfig, ScanService};
use crossedge::application::execution::{EngineConfig, ExecutionEngine};
use crossedge::application::guard::CapitalGuard;
use crossedge::application::matcher::EventMatcher;
use crossedge::application::portfolio::PortfolioLedger;
use crossedge::application::scanner::{OpportunityScanner, ScannerConfig};
use crossedge::application::validation::ValidationGate;
use crossedge::domain::economics::FeeSchedule;
use crossedge::domain::execution::ExecutionState;
use crossedge::domain::venue::Venue;
use crossedge::port::inbound::scan::{ScanCycle, SkipReason};
use crossedge::port::outbound::notifier::Event;
use crossedge::port::outbound::venue::QuoteSource;

use harness::RecordingNotifier;
use support::fixtures::{kalshi_event, polymarket_event};
use support::venue::StaticQuoteSource;

const FED: &str = "Will the Fed cut interest rates in December 2025?";
const FED_KALSHI: &str = "Fed cuts interest rates in December 2025";
const BTC: &str = "Will Bitcoin close above 150k on Friday?";
const BTC_KALSHI: &str = "Bitcoin closes above 150k Friday";

fn service(
    polymarket: StaticQuoteSource,
    kalshi: StaticQuoteSource,
    gate: ValidationGate,
    ceiling: Decimal,
    notifier: &RecordingNotifier,
) -> ScanService {
    let notifier: Arc<RecordingNotifier> = Arc::new(notifier.clone());
    let engine = Arc::new(ExecutionEngine::new(
        Arc::new(CapitalGuard::new(ceiling)),
        Arc::new(PortfolioLedger::new()),
        notifier.clone(),
        EngineConfig::default(),
    ));
    let scanner = OpportunityScanner::new(ScannerConfig {
        min_net_edge: dec!(0.005),
        stake: dec!(100),
        fees: FeeSchedule::zero(),
        ceiling,
        max_position_fraction: Decimal::ONE,
    });
    let polymarket: Arc<dyn QuoteSource> = Arc::new(polymarket);
    let kalshi: Arc<dyn QuoteSource> = Arc::new(kalshi);

    ScanService::new(
        polymarket,
        kalshi,
        EventMatcher::new(0.2),
        scanner,
        gate,
        engine,
        notifier,
        CycleConfig {
            quote_timeout: Duration::from_secs(1),
            max_events_per_venue: 30,
        },
    )
}

fn fed_sources() -> (StaticQuoteSource, StaticQuoteSource) {
    (
        StaticQuoteSource::new(Venue::Polymarket).with_event(
            polymarket_event("poly-fed", FED),
            dec!(0.45),
            dec!(0.57),
        ),
        StaticQuoteSource::new(Venue::Kalshi).with_event(
            kalshi_event("KXFED", FED_KALSHI),
            dec!(0.50),
            dec!(0.52),
        ),
    )
}

#[tokio::test]
async fn cycle_detects_and_settles_in_sim() {
    let notifier = RecordingNotifier::new();
    let (poly, kalshi) = fed_sources();
    let service = service(poly, kalshi, ValidationGate::disabled(), dec!(5000), &notifier);

    let outcomes = service.run_scan_cycle().await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].state(), Some(ExecutionState::Settled));
    let record = outcomes[0].record().expect("completed record");
    assert_eq!(record.realized_pnl(), Some(dec!(3)));

    assert_eq!(service.epoch(), 1);
    let summary = service.last_summary().expect("summary");
    assert_eq!(summary.pairs, 1);
    assert_eq!(summary.opportunities, 1);
    assert_eq!(summary.settled, 1);
    assert_eq!(summary.committed, Decimal::ZERO);

    assert_eq!(
        notifier.count(|e| matches!(e, Event::OpportunityDetected(_))),
        1
    );
    assert_eq!(
        notifier.count(|e| matches!(e, Event::ExecutionCompleted(_))),
        1
    );
    assert_eq!(notifier.count(|e| matches!(e, Event::ScanCompleted(_))), 1);
    assert_eq!(service.engine().portfolio().len(), 1);
}

#[tokio::test]
async fn unconfirmed_opportunity_is_skipped_without_reserving() {
    let notifier = RecordingNotifier::new();
    let (poly, kalshi) = fed_sources();
    let gate = ValidationGate::new(
        Arc::new(ThresholdValidator::new(dec!(0.05))),
        Duration::from_secs(1),
    );
    let service = service(poly, kalshi, gate, dec!(5000), &notifier);

    let outcomes = service.run_scan_cycle().await;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].state().is_none());
    match &outcomes[0] {
        crossedge::port::inbound::scan::ExecutionOutcome::Skipped { reason, .. } => {
            assert!(matches!(reason, SkipReason::NotConfirmed { .. }));
        }
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(service.engine().portfolio().is_empty());
    assert_eq!(service.engine().guard().committed(), Decimal::ZERO);
    assert_eq!(
        notifier.count(|e| matches!(e, Event::ValidationRejected(_))),
        1
    );
}

#[tokio::test]
async fn failed_listing_yields_empty_cycle() {
    let notifier = RecordingNotifier::new();
    let (poly, _) = fed_sources();
    let service = service(
        poly,
        StaticQuoteSource::failing(Venue::Kalshi),
        ValidationGate::disabled(),
        dec!(5000),
        &notifier,
    );

    let outcomes = service.run_scan_cycle().await;

    assert!(outcomes.is_empty());
    let summary = service.last_summary().expect("summary");
    assert_eq!(summary.events_a, 1);
    assert_eq!(summary.events_b, 0);
    assert_eq!(summary.pairs, 0);
}

#[tokio::test]
async fn small_ceiling_fails_reservation_but_cycle_completes() {
    let notifier = RecordingNotifier::new();
    let (poly, kalshi) = fed_sources();
    let service = service(poly, kalshi, ValidationGate::disabled(), dec!(50), &notifier);

    let outcomes = service.run_scan_cycle().await;

    // Position sizing caps the stake to what the ceiling can hold.
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].state(), Some(ExecutionState::Settled));
    let record = outcomes[0].record().expect("record");
    assert!(record.capital_held() <= dec!(50));
}

#[tokio::test]
async fn best_edge_executes_first() {
    let notifier = RecordingNotifier::new();
    let (poly, kalshi) = fed_sources();
    // 0.40 + 0.55 = 0.95 beats the Fed pair's 0.97.
    let poly = poly.with_event(polymarket_event("poly-btc", BTC), dec!(0.40), dec!(0.62));
    let kalshi = kalshi.with_event(kalshi_event("KXBTC", BTC_KALSHI), dec!(0.47), dec!(0.55));
    let service = service(poly, kalshi, ValidationGate::disabled(), dec!(100), &notifier);

    let outcomes = service.run_scan_cycle().await;

    assert_eq!(outcomes.len(), 2);
    let records: Vec<_> = outcomes
        .iter()
        .map(|o| o.record().expect("completed record"))
        .collect();
    assert_eq!(records[0].capital_held(), dec!(95));
    assert_eq!(records[0].realized_pnl(), Some(dec!(5)));
    assert_eq!(records[1].capital_held(), dec!(97));

    // Each ran to completion before the next reserved, so the 100
    // ceiling held both in turn.
    assert!(records.iter().all(|r| r.state() == ExecutionState::Settled));
    assert!(records[0].finished_at() <= Some(records[1].created_at()));

    let completed: Vec<_> = notifier
        .events()
        .into_iter()
        .filter_map(|event| match event {
            Event::ExecutionCompleted(e) => Some(e.key),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![records[0].key(), records[1].key()]);
}

#[tokio::test]
async fn each_paired_event_is_quoted_once() {
    let notifier = RecordingNotifier::new();
    let (poly, kalshi) = fed_sources();
    let poly_requests = poly.quote_requests();
    let kalshi_requests = kalshi.quote_requests();
    let service = service(poly, kalshi, ValidationGate::disabled(), dec!(5000), &notifier);

    service.run_scan_cycle().await;

    assert_eq!(poly_requests.load(Ordering::SeqCst), 1);
    assert_eq!(kalshi_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn epochs_advance_per_cycle() {
    let notifier = RecordingNotifier::new();
    let (poly, kalshi) = fed_sources();
    let service = service(poly, kalshi, ValidationGate::disabled(), dec!(5000), &notifier);

    service.run_scan_cycle().await;
    let second = service.run_scan_cycle().await;

    assert_eq!(service.epoch(), 2);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].state(), Some(ExecutionState::Settled));
    assert_eq!(service.engine().portfolio().len(), 2);
}
