//! Opportunity scanner.
//!
//! Evaluates both orientations of every pair against the cycle's quote
//! book and keeps the better one when it clears the edge and liquidity
//! bars. The scanner holds configuration only.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::economics::FeeSchedule;
use crate::domain::money::{Amount, Price, Volume};
use crate::domain::opportunity::Opportunity;
use crate::domain::pair::{EventPair, Orientation};
use crate::domain::quote::QuoteBook;

/// Scanner thresholds and sizing inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Minimum net edge for an opportunity to be emitted.
    pub min_net_edge: Decimal,
    /// Configured contracts per leg before position sizing.
    pub stake: Volume,
    pub fees: FeeSchedule,
    pub ceiling: Amount,
    /// Largest share of the ceiling one opportunity may size into.
    pub max_position_fraction: Decimal,
}

/// Pure opportunity scanner.
#[derive(Debug, Clone)]
pub struct OpportunityScanner {
    config: ScannerConfig,
}

impl OpportunityScanner {
    #[must_use]
    pub const fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Stake for a leg pair costing `combined_cost` per contract.
    ///
    /// The configured stake, capped so one position never needs more than
    /// `max_position_fraction` of the ceiling.
    #[must_use]
    pub fn stake_for(&self, combined_cost: Price) -> Volume {
        let budget = self.config.ceiling * self.config.max_position_fraction;
        match budget.checked_div(combined_cost) {
            Some(max_contracts) if combined_cost > Decimal::ZERO => {
                self.config.stake.min(max_contracts.floor())
            }
            _ => Decimal::ZERO,
        }
    }

    /// Scan every pair, returning emitted opportunities ordered by
    /// descending net edge, ties broken by key.
    #[must_use]
    pub fn scan(&self, pairs: &[EventPair], quotes: &QuoteBook, epoch: u64) -> Vec<Opportunity> {
        let mut found: Vec<Opportunity> = pairs
            .iter()
            .filter_map(|pair| self.best_orientation(pair, quotes, epoch))
            .filter(|opportunity| self.clears_thresholds(opportunity))
            .collect();

        found.sort_by(|x, y| match y.net_edge().cmp(&x.net_edge()) {
            Ordering::Equal => x.key().cmp(&y.key()),
            other => other,
        });
        found
    }

    fn best_orientation(
        &self,
        pair: &EventPair,
        quotes: &QuoteBook,
        epoch: u64,
    ) -> Option<Opportunity> {
        Orientation::BOTH
            .into_iter()
            .filter_map(|orientation| self.price_orientation(pair, orientation, quotes, epoch))
            .max_by(|x, y| x.net_edge().cmp(&y.net_edge()))
    }

    fn price_orientation(
        &self,
        pair: &EventPair,
        orientation: Orientation,
        quotes: &QuoteBook,
        epoch: u64,
    ) -> Option<Opportunity> {
        let (a, b) = (pair.a(), pair.b());
        let Some(quote_a) = quotes.get(a.venue(), a.id(), orientation.side_a()) else {
            debug!(event = %a.id(), %orientation, "No quote for leg A, skipping orientation");
            return None;
        };
        let Some(quote_b) = quotes.get(b.venue(), b.id(), orientation.side_b()) else {
            debug!(event = %b.id(), %orientation, "No quote for leg B, skipping orientation");
            return None;
        };

        let stake = self.stake_for(quote_a.price() + quote_b.price());

        match Opportunity::builder()
            .pair(pair)
            .orientation(orientation)
            .quotes(quote_a, quote_b)
            .fees(self.config.fees)
            .stake(stake)
            .epoch(epoch)
            .build()
        {
            Ok(opportunity) => Some(opportunity),
            Err(err) => {
                debug!(
                    a = %a.id(),
                    b = %b.id(),
                    %orientation,
                    error = %err,
                    "Orientation not priceable"
                );
                None
            }
        }
    }

    fn clears_thresholds(&self, opportunity: &Opportunity) -> bool {
        if opportunity.net_edge() < self.config.min_net_edge {
            debug!(
                key = %opportunity.key(),
                net_edge = %opportunity.net_edge(),
                min = %self.config.min_net_edge,
                "Below minimum edge"
            );
            return false;
        }
        let stake = opportunity.stake();
        if opportunity.leg_a().available_size < stake || opportunity.leg_b().available_size < stake
        {
            debug!(
                key = %opportunity.key(),
                stake = %stake,
                size_a = %opportunity.leg_a().available_size,
                size_b = %opportunity.leg_b().available_size,
                "Insufficient depth"
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::MarketQuote;
    use crate::domain::venue::{OutcomeRefs, Side, Venue, VenueEvent};
    use rust_decimal_macros::dec;

    fn config() -> ScannerConfig {
        ScannerConfig {
            min_net_edge: dec!(0.005),
            stake: dec!(100),
            fees: FeeSchedule::zero(),
            ceiling: dec!(5000),
            max_position_fraction: dec!(0.2),
        }
    }

    fn pair(id: &str) -> EventPair {
        let a = VenueEvent::new(
            Venue::Polymarket,
            format!("p-{id}"),
            "Fed cuts rates",
            None,
            OutcomeRefs::new("y", "n"),
        );
        let b = VenueEvent::new(
            Venue::Kalshi,
            format!("k-{id}"),
            "Fed cuts rates",
            None,
            OutcomeRefs::shared(format!("k-{id}")),
        );
        EventPair::new(a, b, 1.0, 7)
    }

    fn quotes(id: &str, prices: [(Venue, Side, Decimal); 4], size: Decimal) -> Vec<MarketQuote> {
        prices
            .into_iter()
            .map(|(venue, side, price)| {
                let event = match venue {
                    Venue::Polymarket => format!("p-{id}"),
                    Venue::Kalshi => format!("k-{id}"),
                };
                MarketQuote::new(venue, event, side, price, size)
            })
            .collect()
    }

    #[test]
    fn picks_better_orientation() {
        let book: QuoteBook = quotes(
            "1",
            [
                (Venue::Polymarket, Side::Yes, dec!(0.60)),
                (Venue::Polymarket, Side::No, dec!(0.41)),
                (Venue::Kalshi, Side::Yes, dec!(0.55)),
                (Venue::Kalshi, Side::No, dec!(0.42)),
            ],
            dec!(500),
        )
        .into_iter()
        .collect();

        let found = OpportunityScanner::new(config()).scan(&[pair("1")], &book, 1);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].orientation(), Orientation::ANoBYes);
        assert_eq!(found[0].net_edge(), dec!(0.04));
    }

    #[test]
    fn thin_book_is_skipped() {
        let book: QuoteBook = quotes(
            "1",
            [
                (Venue::Polymarket, Side::Yes, dec!(0.45)),
                (Venue::Polymarket, Side::No, dec!(0.56)),
                (Venue::Kalshi, Side::Yes, dec!(0.55)),
                (Venue::Kalshi, Side::No, dec!(0.52)),
            ],
            dec!(50),
        )
        .into_iter()
        .collect();

        assert!(OpportunityScanner::new(config())
            .scan(&[pair("1")], &book, 1)
            .is_empty());
    }

    #[test]
    fn missing_quote_skips_pair() {
        let book: QuoteBook = [MarketQuote::new(
            Venue::Polymarket,
            "p-1",
            Side::Yes,
            dec!(0.45),
            dec!(500),
        )]
        .into_iter()
        .collect();

        assert!(OpportunityScanner::new(config())
            .scan(&[pair("1")], &book, 1)
            .is_empty());
    }

    #[test]
    fn stake_is_capped_by_position_fraction() {
        let scanner = OpportunityScanner::new(ScannerConfig {
            ceiling: dec!(100),
            ..config()
        });
        // 100 * 0.2 / 0.97 = 20.6 -> 20
        assert_eq!(scanner.stake_for(dec!(0.97)), dec!(20));
        assert_eq!(scanner.stake_for(dec!(0)), dec!(0));

        let roomy = OpportunityScanner::new(config());
        assert_eq!(roomy.stake_for(dec!(0.97)), dec!(100));
    }

    #[test]
    fn output_sorted_by_edge_descending() {
        let mut all = quotes(
            "1",
            [
                (Venue::Polymarket, Side::Yes, dec!(0.45)),
                (Venue::Polymarket, Side::No, dec!(0.60)),
                (Venue::Kalshi, Side::Yes, dec!(0.60)),
                (Venue::Kalshi, Side::No, dec!(0.54)),
            ],
            dec!(500),
        );
        all.extend(quotes(
            "2",
            [
                (Venue::Polymarket, Side::Yes, dec!(0.40)),
                (Venue::Polymarket, Side::No, dec!(0.60)),
                (Venue::Kalshi, Side::Yes, dec!(0.60)),
                (Venue::Kalshi, Side::No, dec!(0.55)),
            ],
            dec!(500),
        ));
        let book: QuoteBook = all.into_iter().collect();

        let found = OpportunityScanner::new(config()).scan(&[pair("1"), pair("2")], &book, 3);

        let edges: Vec<_> = found.iter().map(Opportunity::net_edge).collect();
        assert_eq!(edges, vec![dec!(0.05), dec!(0.01)]);
    }
}
