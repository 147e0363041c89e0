//! Fee and profit arithmetic for a two-leg cross-venue arbitrage.
//!
//! Buying YES on one venue and NO on the other pays exactly one contract
//! payout whichever way the event resolves, so the edge is whatever is
//! left of $1 after both leg prices and both venues' fees.
//!
//! Everything here is pure and deterministic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::{Amount, Price, Volume, CONTRACT_PAYOUT};
use super::venue::Venue;

/// Per-venue taker fee rates, as a fraction of leg notional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub polymarket: Decimal,
    pub kalshi: Decimal,
}

impl FeeSchedule {
    #[must_use]
    pub const fn new(polymarket: Decimal, kalshi: Decimal) -> Self {
        Self { polymarket, kalshi }
    }

    /// A fee-free schedule.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }

    #[must_use]
    pub const fn rate(&self, venue: Venue) -> Decimal {
        match venue {
            Venue::Polymarket => self.polymarket,
            Venue::Kalshi => self.kalshi,
        }
    }

    /// Fee charged on one leg of `size` contracts bought at `price`.
    #[must_use]
    pub fn leg_fee(&self, venue: Venue, price: Price, size: Volume) -> Amount {
        price * size * self.rate(venue)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::zero()
    }
}

/// Economics of buying both legs at a given stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economics {
    /// Sum of both leg prices.
    pub combined_cost: Price,
    /// `1 - combined_cost`.
    pub gross_edge: Decimal,
    /// Total fees across both legs at this stake.
    pub fee_amount: Amount,
    /// Guaranteed profit per unit of stake after fees.
    pub net_edge: Decimal,
    pub stake: Volume,
}

impl Economics {
    /// Dollars needed to buy both legs and pay their fees.
    #[must_use]
    pub fn capital_required(&self) -> Amount {
        self.combined_cost * self.stake + self.fee_amount
    }

    #[must_use]
    pub fn expected_profit(&self) -> Amount {
        self.net_edge * self.stake
    }
}

/// Evaluate a leg pair.
///
/// `price_a` is paid on venue A ([`Venue::Polymarket`]) and `price_b` on
/// venue B ([`Venue::Kalshi`]); each venue's fee rate is applied to its own
/// leg's notional.
///
/// # Errors
///
/// Returns [`DomainError::InvalidQuote`] if either price is outside (0, 1)
/// and [`DomainError::NonPositiveStake`] if the stake is not positive.
pub fn evaluate(
    price_a: Price,
    price_b: Price,
    fees: &FeeSchedule,
    stake: Volume,
) -> Result<Economics, DomainError> {
    evaluate_legs(
        (Venue::Polymarket, price_a),
        (Venue::Kalshi, price_b),
        fees,
        stake,
    )
}

/// Evaluate two legs on explicitly named venues.
///
/// # Errors
///
/// Same as [`evaluate`].
pub fn evaluate_legs(
    (venue_a, price_a): (Venue, Price),
    (venue_b, price_b): (Venue, Price),
    fees: &FeeSchedule,
    stake: Volume,
) -> Result<Economics, DomainError> {
    for price in [price_a, price_b] {
        if price <= Decimal::ZERO || price >= Decimal::ONE {
            return Err(DomainError::InvalidQuote { price });
        }
    }
    if stake <= Decimal::ZERO {
        return Err(DomainError::NonPositiveStake { stake });
    }

    let combined_cost = price_a + price_b;
    let gross_edge = CONTRACT_PAYOUT - combined_cost;
    let fee_amount = fees.leg_fee(venue_a, price_a, stake) + fees.leg_fee(venue_b, price_b, stake);
    let net_edge = (gross_edge * stake - fee_amount) / stake;

    Ok(Economics {
        combined_cost,
        gross_edge,
        fee_amount,
        net_edge,
        stake,
    })
}
