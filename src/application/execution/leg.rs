//! Placing a single leg.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::domain::economics::FeeSchedule;
use crate::domain::execution::{ExecutionMode, LegFill, LegOutcome};
use crate::domain::money::{Amount, Price, Volume};
use crate::domain::opportunity::{Opportunity, OpportunityLeg};
use crate::domain::venue::Venue;
use crate::error::ExecutionError;
use crate::port::outbound::venue::{OrderClient, OrderRequest, OrderResult};

/// Highest price a simulated fill may print at.
const SIM_PRICE_CAP: Price = dec!(0.99);

/// Resolves one leg to a fill or a failure, never waiting past the leg
/// timeout.
pub(crate) struct LegPlacer {
    mode: ExecutionMode,
    clients: HashMap<Venue, Arc<dyn OrderClient>>,
    fees: FeeSchedule,
    sim_slippage: Decimal,
    timeout: Duration,
}

impl LegPlacer {
    pub(crate) fn new(
        mode: ExecutionMode,
        fees: FeeSchedule,
        sim_slippage: Decimal,
        timeout: Duration,
    ) -> Self {
        Self {
            mode,
            clients: HashMap::new(),
            fees,
            sim_slippage,
            timeout,
        }
    }

    pub(crate) fn add_client(&mut self, client: Arc<dyn OrderClient>) {
        self.clients.insert(client.venue(), client);
    }

    pub(crate) fn has_client(&self, venue: Venue) -> bool {
        self.clients.contains_key(&venue)
    }

    pub(crate) async fn place(&self, leg: &OpportunityLeg, size: Volume) -> LegOutcome {
        match self.mode {
            ExecutionMode::Sim => self.simulate(leg, size),
            ExecutionMode::Live => self.submit(leg, size).await,
        }
    }

    /// Highest price a leg can fill at: the slipped price in sim, the
    /// limit price in live.
    pub(crate) fn worst_price(&self, leg: &OpportunityLeg) -> Price {
        match self.mode {
            ExecutionMode::Sim => (leg.quoted_price * (Decimal::ONE + self.sim_slippage))
                .min(SIM_PRICE_CAP)
                .max(leg.quoted_price),
            ExecutionMode::Live => leg.quoted_price,
        }
    }

    /// Capital that covers both legs and their fees at the worst fill
    /// price this placer can produce for `size`.
    pub(crate) fn capital_required(&self, opportunity: &Opportunity, size: Volume) -> Amount {
        [opportunity.leg_a(), opportunity.leg_b()]
            .into_iter()
            .map(|leg| {
                let price = self.worst_price(leg);
                price * size + self.fees.leg_fee(leg.venue, price, size)
            })
            .sum()
    }

    fn simulate(&self, leg: &OpportunityLeg, size: Volume) -> LegOutcome {
        let price = self.worst_price(leg);
        debug!(venue = %leg.venue, side = %leg.side, %price, %size, "Simulated fill");
        self.filled(leg, price, size)
    }

    async fn submit(&self, leg: &OpportunityLeg, size: Volume) -> LegOutcome {
        let Some(client) = self.clients.get(&leg.venue) else {
            let err = ExecutionError::OrderClientMissing {
                venue: leg.venue.to_string(),
            };
            return failed(leg, &err);
        };

        let request = OrderRequest {
            venue: leg.venue,
            event_id: leg.event_id.clone(),
            outcome_ref: leg.outcome_ref.clone(),
            side: leg.side,
            price: leg.quoted_price,
            size,
        };

        match timeout(self.timeout, client.place_order(&request)).await {
            Ok(Ok(OrderResult::Filled {
                filled_price,
                filled_size,
            })) => match check_fill(&request, filled_price, filled_size) {
                Ok(()) => self.filled(leg, filled_price, filled_size),
                Err(e) => {
                    error!(
                        venue = %leg.venue,
                        event = %leg.event_id,
                        requested_size = %request.size,
                        limit_price = %request.price,
                        %filled_price,
                        %filled_size,
                        "Venue reported a fill outside the order"
                    );
                    failed(leg, &e)
                }
            },
            Ok(Ok(OrderResult::Failed { reason })) => failed(leg, &ExecutionError::LegFailed(reason)),
            Ok(Err(e)) => failed(leg, &ExecutionError::LegFailed(e.to_string())),
            Err(_) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                failed(leg, &ExecutionError::LegTimedOut { timeout_ms })
            }
        }
    }

    fn filled(&self, leg: &OpportunityLeg, price: Price, size: Volume) -> LegOutcome {
        LegOutcome::Filled(LegFill {
            venue: leg.venue,
            event_id: leg.event_id.clone(),
            side: leg.side,
            filled_price: price,
            filled_size: size,
            fee: self.fees.leg_fee(leg.venue, price, size),
        })
    }
}

/// A reported fill must lie within the order that was sent: at most the
/// requested size, at or below the limit price, and a valid probability.
fn check_fill(request: &OrderRequest, price: Price, size: Volume) -> Result<(), ExecutionError> {
    if size <= Decimal::ZERO {
        return Err(ExecutionError::LegFailed("filled zero contracts".into()));
    }
    if size > request.size {
        return Err(ExecutionError::LegFailed(format!(
            "venue reported {size} contracts filled, {} requested",
            request.size
        )));
    }
    if price <= Decimal::ZERO || price >= Decimal::ONE {
        return Err(ExecutionError::LegFailed(format!(
            "venue reported fill price {price} outside (0, 1)"
        )));
    }
    if price > request.price {
        return Err(ExecutionError::LegFailed(format!(
            "venue reported fill price {price} above limit {}",
            request.price
        )));
    }
    Ok(())
}

fn failed(leg: &OpportunityLeg, error: &ExecutionError) -> LegOutcome {
    warn!(venue = %leg.venue, side = %leg.side, event = %leg.event_id, error = %error, "Leg failed");
    LegOutcome::Failed {
        venue: leg.venue,
        side: leg.side,
        reason: error.to_string(),
    }
}
