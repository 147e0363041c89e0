//! Point-in-time quotes and the per-cycle quote snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EventId;
use super::money::{Price, Volume};
use super::venue::{Side, Venue};

/// Best ask for one side of one event on one venue.
///
/// Immutable once produced by a quote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuote {
    venue: Venue,
    event_id: EventId,
    side: Side,
    price: Price,
    available_size: Volume,
    timestamp: DateTime<Utc>,
}

impl MarketQuote {
    #[must_use]
    pub fn new(
        venue: Venue,
        event_id: impl Into<EventId>,
        side: Side,
        price: Price,
        available_size: Volume,
    ) -> Self {
        Self::at(venue, event_id, side, price, available_size, Utc::now())
    }

    #[must_use]
    pub fn at(
        venue: Venue,
        event_id: impl Into<EventId>,
        side: Side,
        price: Price,
        available_size: Volume,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            venue,
            event_id: event_id.into(),
            side,
            price,
            available_size,
            timestamp,
        }
    }

    #[must_use]
    pub const fn venue(&self) -> Venue {
        self.venue
    }

    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn available_size(&self) -> Volume {
        self.available_size
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Quotes gathered during one scan cycle, keyed by venue, event and side.
#[derive(Debug, Clone, Default)]
pub struct QuoteBook {
    quotes: HashMap<(Venue, EventId, Side), MarketQuote>,
}

impl QuoteBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quote, replacing any earlier quote for the same slot.
    pub fn insert(&mut self, quote: MarketQuote) {
        let slot = (quote.venue(), quote.event_id().clone(), quote.side());
        self.quotes.insert(slot, quote);
    }

    #[must_use]
    pub fn get(&self, venue: Venue, event_id: &EventId, side: Side) -> Option<&MarketQuote> {
        self.quotes.get(&(venue, event_id.clone(), side))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<MarketQuote> for QuoteBook {
    fn from_iter<I: IntoIterator<Item = MarketQuote>>(iter: I) -> Self {
        let mut book = Self::new();
        for quote in iter {
            book.insert(quote);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn book_looks_up_by_slot() {
        let book: QuoteBook = [
            MarketQuote::new(Venue::Polymarket, "p1", Side::Yes, dec!(0.45), dec!(500)),
            MarketQuote::new(Venue::Polymarket, "p1", Side::No, dec!(0.56), dec!(200)),
        ]
        .into_iter()
        .collect();

        let yes = book.get(Venue::Polymarket, &EventId::from("p1"), Side::Yes);
        assert_eq!(yes.map(MarketQuote::price), Some(dec!(0.45)));
        assert!(book
            .get(Venue::Kalshi, &EventId::from("p1"), Side::Yes)
            .is_none());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn later_quote_replaces_earlier() {
        let mut book = QuoteBook::new();
        book.insert(MarketQuote::new(Venue::Kalshi, "k", Side::No, dec!(0.50), dec!(10)));
        book.insert(MarketQuote::new(Venue::Kalshi, "k", Side::No, dec!(0.48), dec!(12)));

        let quote = book.get(Venue::Kalshi, &EventId::from("k"), Side::No).unwrap();
        assert_eq!(quote.price(), dec!(0.48));
        assert_eq!(book.len(), 1);
    }
}
