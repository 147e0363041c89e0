//! Capital holds issued by the guard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{OpportunityKey, ReservationId};
use super::money::Amount;

/// Capital held for one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    key: OpportunityKey,
    amount: Amount,
    issued_at: DateTime<Utc>,
    released_at: Option<DateTime<Utc>>,
}

impl Reservation {
    #[must_use]
    pub fn issue(key: OpportunityKey, amount: Amount) -> Self {
        Self {
            id: ReservationId::generate(),
            key,
            amount,
            issued_at: Utc::now(),
            released_at: None,
        }
    }

    /// Stamp the release time. Only the guard calls this.
    pub(crate) fn mark_released(&mut self) {
        self.released_at = Some(Utc::now());
    }

    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    #[must_use]
    pub const fn key(&self) -> OpportunityKey {
        self.key
    }

    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub const fn released_at(&self) -> Option<DateTime<Utc>> {
        self.released_at
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.released_at.is_none()
    }
}
