mod support;

use rust_decimal_macros::dec;

use crossedge::application::matcher::EventMatcher;
use crossedge::application::scanner::{OpportunityScanner, ScannerConfig};
use crossedge::domain::economics::{evaluate, FeeSchedule};
use crossedge::domain::pair::Orientation;
use crossedge::domain::quote::QuoteBook;
use crossedge::domain::venue::{Side, Venue};

use support::fixtures::{kalshi_event, pair, polymarket_event, quote};

fn scanner(fees: FeeSchedule) -> OpportunityScanner {
    OpportunityScanner::new(ScannerConfig {
        min_net_edge: dec!(0.005),
        stake: dec!(100),
        fees,
        ceiling: dec!(10000),
        max_position_fraction: dec!(0.2),
    })
}

#[test]
fn three_cent_gap_without_fees_is_emitted() {
    let pair = pair("poly-fed", "KXFED", "Will the Fed cut rates in December?");
    let quotes: QuoteBook = [
        quote(Venue::Polymarket, "poly-fed", Side::Yes, dec!(0.45)),
        quote(Venue::Polymarket, "poly-fed", Side::No, dec!(0.57)),
        quote(Venue::Kalshi, "KXFED", Side::Yes, dec!(0.50)),
        quote(Venue::Kalshi, "KXFED", Side::No, dec!(0.52)),
    ]
    .into_iter()
    .collect();

    let found = scanner(FeeSchedule::zero()).scan(&[pair], &quotes, 1);

    assert_eq!(found.len(), 1);
    let opportunity = &found[0];
    assert_eq!(opportunity.orientation(), Orientation::AYesBNo);
    assert_eq!(opportunity.combined_cost(), dec!(0.97));
    assert_eq!(opportunity.net_edge(), dec!(0.03));
    assert_eq!(opportunity.stake(), dec!(100));
    assert_eq!(opportunity.expected_profit(), dec!(3));
}

#[test]
fn break_even_prices_with_fees_are_not_emitted() {
    let fees = FeeSchedule::new(dec!(0.01), dec!(0.01));
    let economics = evaluate(dec!(0.48), dec!(0.52), &fees, dec!(100)).expect("valid prices");
    assert_eq!(economics.combined_cost, dec!(1.00));
    assert_eq!(economics.net_edge, dec!(-0.01));

    let pair = pair("poly-cpi", "KXCPI", "Will CPI exceed three percent in March?");
    let quotes: QuoteBook = [
        quote(Venue::Polymarket, "poly-cpi", Side::Yes, dec!(0.48)),
        quote(Venue::Polymarket, "poly-cpi", Side::No, dec!(0.53)),
        quote(Venue::Kalshi, "KXCPI", Side::Yes, dec!(0.49)),
        quote(Venue::Kalshi, "KXCPI", Side::No, dec!(0.52)),
    ]
    .into_iter()
    .collect();

    assert!(scanner(fees).scan(&[pair], &quotes, 1).is_empty());
}

#[test]
fn missing_quote_skips_only_that_orientation() {
    let pair = pair("poly-gdp", "KXGDP", "Will GDP growth beat forecasts this quarter?");
    let quotes: QuoteBook = [
        quote(Venue::Polymarket, "poly-gdp", Side::No, dec!(0.40)),
        quote(Venue::Kalshi, "KXGDP", Side::Yes, dec!(0.55)),
    ]
    .into_iter()
    .collect();

    let found = scanner(FeeSchedule::zero()).scan(&[pair], &quotes, 1);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].orientation(), Orientation::ANoBYes);
    assert_eq!(found[0].net_edge(), dec!(0.05));
}

#[test]
fn results_are_ordered_by_descending_edge() {
    let small = pair("poly-a", "KXA", "Will the Lakers win the championship title?");
    let large = pair("poly-b", "KXB", "Will Bitcoin close above one hundred thousand?");
    let quotes: QuoteBook = [
        quote(Venue::Polymarket, "poly-a", Side::Yes, dec!(0.48)),
        quote(Venue::Kalshi, "KXA", Side::No, dec!(0.50)),
        quote(Venue::Polymarket, "poly-b", Side::Yes, dec!(0.40)),
        quote(Venue::Kalshi, "KXB", Side::No, dec!(0.50)),
    ]
    .into_iter()
    .collect();

    let found = scanner(FeeSchedule::zero()).scan(&[small, large], &quotes, 1);

    let edges: Vec<_> = found.iter().map(|o| o.net_edge()).collect();
    assert_eq!(edges, vec![dec!(0.10), dec!(0.02)]);
}

#[test]
fn scan_is_deterministic_for_fixed_inputs() {
    let pair = pair("poly-fed", "KXFED", "Will the Fed cut rates in December?");
    let quotes: QuoteBook = [
        quote(Venue::Polymarket, "poly-fed", Side::Yes, dec!(0.45)),
        quote(Venue::Kalshi, "KXFED", Side::No, dec!(0.52)),
    ]
    .into_iter()
    .collect();
    let scanner = scanner(FeeSchedule::zero());

    let first = scanner.scan(std::slice::from_ref(&pair), &quotes, 4);
    let second = scanner.scan(std::slice::from_ref(&pair), &quotes, 4);

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].key(), second[0].key());
    assert_eq!(first[0].net_edge(), second[0].net_edge());
}

#[test]
fn matcher_pairs_rephrased_questions() {
    let matcher = EventMatcher::new(0.2);
    let poly = vec![
        polymarket_event("poly-fed", "Will the Fed cut interest rates in December 2025?"),
        polymarket_event("poly-nba", "Will the Celtics win the 2025 NBA Finals?"),
    ];
    let kalshi = vec![
        kalshi_event("KXNBA", "Celtics win NBA Finals 2025"),
        kalshi_event("KXFED", "Fed cuts interest rates in December 2025"),
    ];

    let report = matcher.match_events(&poly, &kalshi);

    let pairs: Vec<_> = report
        .pairs
        .iter()
        .map(|p| (p.a().id().as_str().to_string(), p.b().id().as_str().to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("poly-fed".to_string(), "KXFED".to_string()),
            ("poly-nba".to_string(), "KXNBA".to_string()),
        ]
    );
}
