//! Capital guard.
//!
//! Process-wide allocation ledger and the single serialization point for
//! execution. Every path that commits capital goes through [`reserve`],
//! whose check-and-commit runs under one lock, so concurrent callers can
//! never jointly push committed capital past the ceiling.
//!
//! [`reserve`]: CapitalGuard::reserve

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::id::{OpportunityKey, ReservationId};
use crate::domain::money::Amount;
use crate::domain::reservation::Reservation;
use crate::error::{GuardRejection, ReleaseError};

/// Point-in-time view of the guard for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardSnapshot {
    pub ceiling: Amount,
    pub committed: Amount,
    pub available: Amount,
    pub active_reservations: usize,
}

/// Released ids remembered for double-release detection. Older ids fall
/// out and a late second release reports them as unknown instead.
const RELEASED_HISTORY: usize = 4096;

#[derive(Debug, Default)]
struct Book {
    committed: Amount,
    active: HashMap<ReservationId, Reservation>,
    by_key: HashMap<OpportunityKey, ReservationId>,
    released: HashSet<ReservationId>,
    released_order: VecDeque<ReservationId>,
}

impl Book {
    fn remember_released(&mut self, id: ReservationId, capacity: usize) {
        self.released.insert(id);
        self.released_order.push_back(id);
        while self.released_order.len() > capacity {
            if let Some(oldest) = self.released_order.pop_front() {
                self.released.remove(&oldest);
            }
        }
    }
}

/// Allocation ledger enforcing the capital ceiling.
///
/// The committed total is private; the only way to change it is the
/// `reserve`/`release` pair.
#[derive(Debug)]
pub struct CapitalGuard {
    ceiling: Amount,
    released_history: usize,
    book: Mutex<Book>,
}

impl CapitalGuard {
    #[must_use]
    pub fn new(ceiling: Amount) -> Self {
        Self {
            ceiling,
            released_history: RELEASED_HISTORY,
            book: Mutex::new(Book::default()),
        }
    }

    /// Keep at most `capacity` released ids for double-release detection.
    #[must_use]
    pub fn with_released_history(mut self, capacity: usize) -> Self {
        self.released_history = capacity.max(1);
        self
    }

    /// Atomically reserve `amount` for `key`.
    ///
    /// # Errors
    ///
    /// - [`GuardRejection::NonPositiveAmount`] for a zero or negative amount
    /// - [`GuardRejection::DuplicateOpportunity`] if `key` already holds an
    ///   active reservation
    /// - [`GuardRejection::CapitalExceeded`] if the reservation would take
    ///   committed capital above the ceiling
    ///
    /// A rejected call leaves the ledger untouched.
    pub fn reserve(
        &self,
        key: OpportunityKey,
        amount: Amount,
    ) -> Result<Reservation, GuardRejection> {
        if amount <= Decimal::ZERO {
            return Err(GuardRejection::NonPositiveAmount { amount });
        }

        let mut book = self.book.lock();

        if book.by_key.contains_key(&key) {
            debug!(key = %key, "Duplicate reservation refused");
            return Err(GuardRejection::DuplicateOpportunity { key });
        }

        if book.committed + amount > self.ceiling {
            warn!(
                key = %key,
                committed = %book.committed,
                requested = %amount,
                ceiling = %self.ceiling,
                "Capital ceiling would be exceeded"
            );
            return Err(GuardRejection::CapitalExceeded {
                committed: book.committed,
                requested: amount,
                ceiling: self.ceiling,
            });
        }

        let reservation = Reservation::issue(key, amount);
        book.committed += amount;
        book.by_key.insert(key, reservation.id());
        book.active.insert(reservation.id(), reservation.clone());

        info!(
            key = %key,
            reservation = %reservation.id(),
            amount = %amount,
            committed = %book.committed,
            "Capital reserved"
        );

        Ok(reservation)
    }

    /// Release a reservation, returning its original amount to the pool.
    ///
    /// `realized_amount` is logged for audit only; committed capital is
    /// always decremented by the amount originally reserved.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::AlreadyReleased`] on a second release of the same id
    /// - [`ReleaseError::UnknownReservation`] for an id this guard never issued
    pub fn release(
        &self,
        id: ReservationId,
        realized_amount: Amount,
    ) -> Result<Reservation, ReleaseError> {
        let mut book = self.book.lock();

        let Some(mut reservation) = book.active.remove(&id) else {
            if book.released.contains(&id) {
                warn!(reservation = %id, "Reservation already released");
                return Err(ReleaseError::AlreadyReleased(id));
            }
            return Err(ReleaseError::UnknownReservation(id));
        };

        reservation.mark_released();
        book.committed -= reservation.amount();
        book.by_key.remove(&reservation.key());
        book.remember_released(id, self.released_history);

        info!(
            key = %reservation.key(),
            reservation = %id,
            amount = %reservation.amount(),
            realized = %realized_amount,
            committed = %book.committed,
            "Capital released"
        );

        Ok(reservation)
    }

    #[must_use]
    pub const fn ceiling(&self) -> Amount {
        self.ceiling
    }

    #[must_use]
    pub fn committed(&self) -> Amount {
        self.book.lock().committed
    }

    #[must_use]
    pub fn available(&self) -> Amount {
        self.ceiling - self.committed()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.book.lock().active.len()
    }

    /// Whether `key` currently holds an active reservation.
    #[must_use]
    pub fn is_reserved(&self, key: OpportunityKey) -> bool {
        self.book.lock().by_key.contains_key(&key)
    }

    /// Released ids still remembered.
    #[must_use]
    pub fn released_count(&self) -> usize {
        self.book.lock().released.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> GuardSnapshot {
        let book = self.book.lock();
        GuardSnapshot {
            ceiling: self.ceiling,
            committed: book.committed,
            available: self.ceiling - book.committed,
            active_reservations: book.active.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn key(n: u64) -> OpportunityKey {
        OpportunityKey::from_raw(n)
    }

    #[test]
    fn reserve_commits_capital() {
        let guard = CapitalGuard::new(dec!(1000));
        let reservation = guard.reserve(key(1), dec!(250)).unwrap();

        assert_eq!(reservation.amount(), dec!(250));
        assert!(reservation.is_active());
        assert_eq!(guard.committed(), dec!(250));
        assert_eq!(guard.available(), dec!(750));
        assert!(guard.is_reserved(key(1)));
    }

    #[test]
    fn reserve_up_to_ceiling_exactly() {
        let guard = CapitalGuard::new(dec!(1000));
        guard.reserve(key(1), dec!(600)).unwrap();
        guard.reserve(key(2), dec!(400)).unwrap();

        assert_eq!(guard.committed(), dec!(1000));
        assert!(matches!(
            guard.reserve(key(3), dec!(0.01)),
            Err(GuardRejection::CapitalExceeded { .. })
        ));
    }

    #[test]
    fn over_ceiling_leaves_committed_untouched() {
        let guard = CapitalGuard::new(dec!(1000));
        guard.reserve(key(1), dec!(950)).unwrap();

        let result = guard.reserve(key(2), dec!(100));

        assert_eq!(
            result,
            Err(GuardRejection::CapitalExceeded {
                committed: dec!(950),
                requested: dec!(100),
                ceiling: dec!(1000),
            })
        );
        assert_eq!(guard.committed(), dec!(950));
        assert_eq!(guard.active_count(), 1);
    }

    #[test]
    fn duplicate_key_is_rejected_until_released() {
        let guard = CapitalGuard::new(dec!(1000));
        let first = guard.reserve(key(7), dec!(10)).unwrap();

        assert_eq!(
            guard.reserve(key(7), dec!(10)),
            Err(GuardRejection::DuplicateOpportunity { key: key(7) })
        );

        guard.release(first.id(), dec!(0)).unwrap();
        assert!(guard.reserve(key(7), dec!(10)).is_ok());
    }

    #[test]
    fn release_uses_original_amount() {
        let guard = CapitalGuard::new(dec!(1000));
        let reservation = guard.reserve(key(1), dec!(97)).unwrap();

        let released = guard.release(reservation.id(), dec!(100.5)).unwrap();

        assert!(released.released_at().is_some());
        assert_eq!(guard.committed(), dec!(0));
    }

    #[test]
    fn double_release_is_refused() {
        let guard = CapitalGuard::new(dec!(1000));
        guard.reserve(key(1), dec!(50)).unwrap();
        let reservation = guard.reserve(key(2), dec!(50)).unwrap();

        guard.release(reservation.id(), dec!(0)).unwrap();
        assert_eq!(
            guard.release(reservation.id(), dec!(0)),
            Err(ReleaseError::AlreadyReleased(reservation.id()))
        );
        assert_eq!(guard.committed(), dec!(50));
    }

    #[test]
    fn released_history_is_bounded() {
        let guard = CapitalGuard::new(dec!(1000)).with_released_history(3);
        let mut ids = Vec::new();
        for n in 0..10 {
            let reservation = guard.reserve(key(n), dec!(10)).unwrap();
            guard.release(reservation.id(), dec!(0)).unwrap();
            ids.push(reservation.id());
        }

        assert_eq!(guard.released_count(), 3);
        assert_eq!(
            guard.release(ids[9], dec!(0)),
            Err(ReleaseError::AlreadyReleased(ids[9]))
        );
        // Forgotten ids are still refused, just as unknown.
        assert_eq!(
            guard.release(ids[0], dec!(0)),
            Err(ReleaseError::UnknownReservation(ids[0]))
        );
        assert_eq!(guard.committed(), dec!(0));
    }

    #[test]
    fn unknown_release_is_refused() {
        let guard = CapitalGuard::new(dec!(1000));
        let stranger = ReservationId::generate();
        assert_eq!(
            guard.release(stranger, dec!(0)),
            Err(ReleaseError::UnknownReservation(stranger))
        );
    }

    #[test]
    fn non_positive_amount_is_refused() {
        let guard = CapitalGuard::new(dec!(1000));
        assert!(matches!(
            guard.reserve(key(1), dec!(0)),
            Err(GuardRejection::NonPositiveAmount { .. })
        ));
        assert!(!guard.is_reserved(key(1)));
    }

    #[test]
    fn snapshot_reflects_book() {
        let guard = CapitalGuard::new(dec!(500));
        guard.reserve(key(1), dec!(120)).unwrap();

        let snapshot = guard.snapshot();
        assert_eq!(snapshot.ceiling, dec!(500));
        assert_eq!(snapshot.committed, dec!(120));
        assert_eq!(snapshot.available, dec!(380));
        assert_eq!(snapshot.active_reservations, 1);
    }
}
