use rust_decimal::Decimal;

use crossedge::domain::economics::FeeSchedule;
use crossedge::domain::opportunity::Opportunity;
use crossedge::domain::pair::{EventPair, Orientation};
use crossedge::domain::quote::MarketQuote;
use crossedge::domain::venue::{OutcomeRefs, Side, Venue, VenueEvent};

pub fn polymarket_event(id: &str, question: &str) -> VenueEvent {
    VenueEvent::new(
        Venue::Polymarket,
        id,
        question,
        None,
        OutcomeRefs::new(format!("{id}-yes"), format!("{id}-no")),
    )
}

pub fn kalshi_event(ticker: &str, question: &str) -> VenueEvent {
    VenueEvent::new(Venue::Kalshi, ticker, question, None, OutcomeRefs::shared(ticker))
}

pub fn pair(poly_id: &str, kalshi_ticker: &str, question: &str) -> EventPair {
    EventPair::new(
        polymarket_event(poly_id, question),
        kalshi_event(kalshi_ticker, question),
        1.0,
        1,
    )
}

pub fn quote(venue: Venue, event_id: &str, side: Side, price: Decimal) -> MarketQuote {
    MarketQuote::new(venue, event_id, side, price, Decimal::from(10_000))
}

/// Polymarket YES at `yes` against Kalshi NO at `no`.
pub fn opportunity(
    poly_id: &str,
    yes: Decimal,
    no: Decimal,
    stake: Decimal,
    fees: FeeSchedule,
) -> Opportunity {
    let ticker = format!("KX-{poly_id}");
    let pair = pair(poly_id, &ticker, "Will the Fed cut rates in December?");
    Opportunity::builder()
        .pair(&pair)
        .orientation(Orientation::AYesBNo)
        .quotes(
            &quote(Venue::Polymarket, poly_id, Side::Yes, yes),
            &quote(Venue::Kalshi, &ticker, Side::No, no),
        )
        .fees(fees)
        .stake(stake)
        .epoch(1)
        .build()
        .expect("valid opportunity")
}
