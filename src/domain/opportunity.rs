//! Opportunity type with builder pattern.
//!
//! An `Opportunity` is one orientation of one event pair priced at one
//! scan epoch. It is immutable: the next scan produces a new instance
//! with a new key rather than updating this one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::economics::{evaluate_legs, Economics, FeeSchedule};
use super::error::DomainError;
use super::id::{EventId, OpportunityKey};
use super::money::{Amount, Price, Volume};
use super::pair::{EventPair, Orientation};
use super::quote::MarketQuote;
use super::venue::{Side, Venue, VenueEvent};

/// One side of the trade as quoted at detection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityLeg {
    pub venue: Venue,
    pub event_id: EventId,
    /// Venue handle for the side being bought.
    pub outcome_ref: String,
    pub side: Side,
    pub quoted_price: Price,
    pub available_size: Volume,
}

impl OpportunityLeg {
    fn from_quote(event: &VenueEvent, quote: &MarketQuote) -> Self {
        Self {
            venue: event.venue(),
            event_id: event.id().clone(),
            outcome_ref: event.outcomes().for_side(quote.side()).to_string(),
            side: quote.side(),
            quoted_price: quote.price(),
            available_size: quote.available_size(),
        }
    }
}

/// A detected cross-venue arbitrage.
///
/// Use [`Opportunity::builder`] to construct instances. The builder runs
/// the fee/profit calculator and derives the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    key: OpportunityKey,
    epoch: u64,
    question: String,
    counterpart_question: String,
    orientation: Orientation,
    leg_a: OpportunityLeg,
    leg_b: OpportunityLeg,
    economics: Economics,
    similarity: f64,
    detected_at: DateTime<Utc>,
}

impl Opportunity {
    /// Create a new builder for constructing an Opportunity.
    #[must_use]
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::default()
    }

    #[must_use]
    pub const fn key(&self) -> OpportunityKey {
        self.key
    }

    /// Scan epoch this opportunity was priced in.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Question text of the venue A event.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Question text of the venue B event.
    #[must_use]
    pub fn counterpart_question(&self) -> &str {
        &self.counterpart_question
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Leg bought on venue A. Placed first.
    #[must_use]
    pub const fn leg_a(&self) -> &OpportunityLeg {
        &self.leg_a
    }

    /// Leg bought on venue B.
    #[must_use]
    pub const fn leg_b(&self) -> &OpportunityLeg {
        &self.leg_b
    }

    #[must_use]
    pub const fn economics(&self) -> &Economics {
        &self.economics
    }

    #[must_use]
    pub const fn combined_cost(&self) -> Price {
        self.economics.combined_cost
    }

    #[must_use]
    pub const fn gross_edge(&self) -> Decimal {
        self.economics.gross_edge
    }

    #[must_use]
    pub const fn fee_estimate(&self) -> Amount {
        self.economics.fee_amount
    }

    #[must_use]
    pub const fn net_edge(&self) -> Decimal {
        self.economics.net_edge
    }

    /// Candidate stake in contracts per leg.
    #[must_use]
    pub const fn stake(&self) -> Volume {
        self.economics.stake
    }

    /// Capital the guard must reserve before any leg is placed.
    #[must_use]
    pub fn capital_required(&self) -> Amount {
        self.economics.capital_required()
    }

    #[must_use]
    pub fn expected_profit(&self) -> Amount {
        self.economics.expected_profit()
    }

    #[must_use]
    pub const fn similarity(&self) -> f64 {
        self.similarity
    }

    #[must_use]
    pub const fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }
}

/// Builder for constructing `Opportunity` instances.
///
/// # Example
///
/// ```ignore
/// let opportunity = Opportunity::builder()
///     .pair(&pair)
///     .orientation(Orientation::AYesBNo)
///     .quotes(&poly_yes, &kalshi_no)
///     .fees(fees)
///     .stake(dec!(100))
///     .epoch(42)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    pair: Option<EventPair>,
    orientation: Option<Orientation>,
    quote_a: Option<MarketQuote>,
    quote_b: Option<MarketQuote>,
    fees: FeeSchedule,
    stake: Option<Volume>,
    epoch: u64,
}

impl OpportunityBuilder {
    #[must_use]
    pub fn pair(mut self, pair: &EventPair) -> Self {
        self.pair = Some(pair.clone());
        self
    }

    #[must_use]
    pub const fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Set the venue A and venue B quotes for the chosen orientation.
    #[must_use]
    pub fn quotes(mut self, a: &MarketQuote, b: &MarketQuote) -> Self {
        self.quote_a = Some(a.clone());
        self.quote_b = Some(b.clone());
        self
    }

    #[must_use]
    pub const fn fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    #[must_use]
    pub const fn stake(mut self, stake: Volume) -> Self {
        self.stake = Some(stake);
        self
    }

    #[must_use]
    pub const fn epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Build the Opportunity, running the calculator.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] if a required field is unset,
    /// or the calculator's error for malformed quotes or stake.
    pub fn build(self) -> Result<Opportunity, DomainError> {
        let pair = self.pair.ok_or(DomainError::MissingField("pair"))?;
        let orientation = self
            .orientation
            .ok_or(DomainError::MissingField("orientation"))?;
        let quote_a = self.quote_a.ok_or(DomainError::MissingField("quote_a"))?;
        let quote_b = self.quote_b.ok_or(DomainError::MissingField("quote_b"))?;
        let stake = self.stake.ok_or(DomainError::MissingField("stake"))?;

        let economics = evaluate_legs(
            (pair.a().venue(), quote_a.price()),
            (pair.b().venue(), quote_b.price()),
            &self.fees,
            stake,
        )?;

        let key = OpportunityKey::derive(&(
            pair.a().venue(),
            pair.a().id(),
            pair.b().venue(),
            pair.b().id(),
            orientation,
            self.epoch,
        ));

        Ok(Opportunity {
            key,
            epoch: self.epoch,
            question: pair.a().question().to_string(),
            counterpart_question: pair.b().question().to_string(),
            orientation,
            leg_a: OpportunityLeg::from_quote(pair.a(), &quote_a),
            leg_b: OpportunityLeg::from_quote(pair.b(), &quote_b),
            economics,
            similarity: pair.similarity(),
            detected_at: Utc::now(),
        })
    }
}
