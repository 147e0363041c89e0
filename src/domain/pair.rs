//! Cross-venue event pairs and the two ways to trade them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::venue::{Side, VenueEvent};

/// Which complementary sides are bought on each venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    /// YES on venue A, NO on venue B.
    AYesBNo,
    /// NO on venue A, YES on venue B.
    ANoBYes,
}

impl Orientation {
    pub const BOTH: [Self; 2] = [Self::AYesBNo, Self::ANoBYes];

    #[must_use]
    pub const fn side_a(self) -> Side {
        match self {
            Self::AYesBNo => Side::Yes,
            Self::ANoBYes => Side::No,
        }
    }

    #[must_use]
    pub const fn side_b(self) -> Side {
        self.side_a().opposite()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}/B-{}", self.side_a(), self.side_b())
    }
}

/// Two events, one per venue, judged to resolve on the same outcome.
///
/// The pair itself carries no direction; both orientations are evaluated
/// by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPair {
    a: VenueEvent,
    b: VenueEvent,
    similarity: f64,
    fingerprint: u64,
    paired_at: DateTime<Utc>,
}

impl EventPair {
    #[must_use]
    pub fn new(a: VenueEvent, b: VenueEvent, similarity: f64, fingerprint: u64) -> Self {
        Self {
            a,
            b,
            similarity,
            fingerprint,
            paired_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn a(&self) -> &VenueEvent {
        &self.a
    }

    #[must_use]
    pub const fn b(&self) -> &VenueEvent {
        &self.b
    }

    #[must_use]
    pub const fn similarity(&self) -> f64 {
        self.similarity
    }

    /// Hash of both normalized questions and resolution ends.
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[must_use]
    pub const fn paired_at(&self) -> DateTime<Utc> {
        self.paired_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientations_buy_complementary_sides() {
        for orientation in Orientation::BOTH {
            assert_eq!(orientation.side_a().opposite(), orientation.side_b());
        }
        assert_eq!(Orientation::AYesBNo.side_a(), Side::Yes);
        assert_eq!(Orientation::ANoBYes.side_b(), Side::Yes);
    }

    #[test]
    fn orientation_display() {
        assert_eq!(Orientation::AYesBNo.to_string(), "A-YES/B-NO");
    }
}
