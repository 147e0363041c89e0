use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crossedge::domain::quote::MarketQuote;
use crossedge::domain::venue::{Side, Venue, VenueEvent};
use crossedge::error::{Error, Result};
use crossedge::port::outbound::venue::{OrderClient, OrderRequest, OrderResult, QuoteSource};

/// Quote source serving a fixed event list and price table.
pub struct StaticQuoteSource {
    venue: Venue,
    events: Vec<VenueEvent>,
    prices: HashMap<(String, Side), Decimal>,
    fail_listing: bool,
    quote_requests: Arc<AtomicUsize>,
}

impl StaticQuoteSource {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            events: Vec::new(),
            prices: HashMap::new(),
            fail_listing: false,
            quote_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared count of quote requests, one per call into the source.
    pub fn quote_requests(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.quote_requests)
    }

    fn lookup(&self, event: &VenueEvent, side: Side) -> Option<MarketQuote> {
        let key = (event.id().as_str().to_string(), side);
        self.prices.get(&key).map(|price| {
            MarketQuote::new(self.venue, event.id().clone(), side, *price, Decimal::from(10_000))
        })
    }

    pub fn with_event(mut self, event: VenueEvent, yes: Decimal, no: Decimal) -> Self {
        let id = event.id().as_str().to_string();
        self.prices.insert((id.clone(), Side::Yes), yes);
        self.prices.insert((id, Side::No), no);
        self.events.push(event);
        self
    }

    pub fn failing(venue: Venue) -> Self {
        Self {
            fail_listing: true,
            ..Self::new(venue)
        }
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn list_active_events(&self) -> Result<Vec<VenueEvent>> {
        if self.fail_listing {
            return Err(Error::Connection("listing unavailable".into()));
        }
        Ok(self.events.clone())
    }

    async fn get_quote(&self, event: &VenueEvent, side: Side) -> Result<Option<MarketQuote>> {
        self.quote_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(event, side))
    }

    async fn get_quotes(
        &self,
        event: &VenueEvent,
    ) -> Result<(Option<MarketQuote>, Option<MarketQuote>)> {
        self.quote_requests.fetch_add(1, Ordering::SeqCst);
        Ok((self.lookup(event, Side::Yes), self.lookup(event, Side::No)))
    }
}

/// How a scripted order client answers.
#[derive(Clone)]
pub enum Script {
    /// Fill the full request at its limit price.
    Fill,
    /// Report a venue rejection.
    Fail(String),
    /// Never answer within any realistic leg timeout.
    Hang,
    /// Fill after a delay.
    FillAfter(Duration),
    /// Report a fill of the given multiple of the requested size.
    FillTimes(u32),
}

/// Order client that answers every request the same way.
pub struct ScriptedOrderClient {
    venue: Venue,
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedOrderClient {
    pub fn new(venue: Venue, script: Script) -> Self {
        Self {
            venue,
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderClient for ScriptedOrderClient {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let filled = OrderResult::Filled {
            filled_price: request.price,
            filled_size: request.size,
        };
        match &self.script {
            Script::Fill => Ok(filled),
            Script::Fail(reason) => Ok(OrderResult::Failed {
                reason: reason.clone(),
            }),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(filled)
            }
            Script::FillAfter(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(filled)
            }
            Script::FillTimes(multiple) => Ok(OrderResult::Filled {
                filled_price: request.price,
                filled_size: request.size * Decimal::from(*multiple),
            }),
        }
    }
}
