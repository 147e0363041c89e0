//! Venues, outcome sides, and the normalized events they list.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EventId;

/// A prediction market venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Polymarket,
    Kalshi,
}

impl Venue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polymarket => "polymarket",
            Self::Kalshi => "kalshi",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a binary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The complementary side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => f.write_str("YES"),
            Self::No => f.write_str("NO"),
        }
    }
}

/// Venue-side handles used to quote or trade each outcome.
///
/// Polymarket trades YES and NO as separate CLOB tokens; Kalshi trades
/// both sides of a single ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRefs {
    pub yes: String,
    pub no: String,
}

impl OutcomeRefs {
    #[must_use]
    pub fn new(yes: impl Into<String>, no: impl Into<String>) -> Self {
        Self {
            yes: yes.into(),
            no: no.into(),
        }
    }

    /// Both sides share one handle.
    #[must_use]
    pub fn shared(handle: impl Into<String>) -> Self {
        let handle = handle.into();
        Self {
            yes: handle.clone(),
            no: handle,
        }
    }

    #[must_use]
    pub fn for_side(&self, side: Side) -> &str {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }
}

/// An active binary event as listed by one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueEvent {
    venue: Venue,
    id: EventId,
    question: String,
    resolves_at: Option<DateTime<Utc>>,
    outcomes: OutcomeRefs,
}

impl VenueEvent {
    #[must_use]
    pub fn new(
        venue: Venue,
        id: impl Into<EventId>,
        question: impl Into<String>,
        resolves_at: Option<DateTime<Utc>>,
        outcomes: OutcomeRefs,
    ) -> Self {
        Self {
            venue,
            id: id.into(),
            question: question.into(),
            resolves_at,
            outcomes,
        }
    }

    #[must_use]
    pub const fn venue(&self) -> Venue {
        self.venue
    }

    #[must_use]
    pub const fn id(&self) -> &EventId {
        &self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// End of the resolution window, when the venue publishes one.
    #[must_use]
    pub const fn resolves_at(&self) -> Option<DateTime<Utc>> {
        self.resolves_at
    }

    #[must_use]
    pub const fn outcomes(&self) -> &OutcomeRefs {
        &self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opposite_is_involutive() {
        assert_eq!(Side::Yes.opposite(), Side::No);
        assert_eq!(Side::No.opposite().opposite(), Side::No);
    }

    #[test]
    fn outcome_refs_select_by_side() {
        let refs = OutcomeRefs::new("tok-yes", "tok-no");
        assert_eq!(refs.for_side(Side::Yes), "tok-yes");
        assert_eq!(refs.for_side(Side::No), "tok-no");

        let shared = OutcomeRefs::shared("KXBTC");
        assert_eq!(shared.for_side(Side::No), "KXBTC");
    }

    #[test]
    fn venue_serializes_lowercase() {
        let json = serde_json::to_string(&Venue::Kalshi).unwrap();
        assert_eq!(json, "\"kalshi\"");
    }
}
