//! Domain validation errors for core domain types.
//!
//! These errors are produced when a quote, a pairing, or a state
//! transition violates a domain rule. Scanning code treats them as
//! per-pair skips; they never abort a whole cycle.
//!
//! # Examples
//!
//! ```
//! use crossedge::domain::economics::{evaluate, FeeSchedule};
//! use crossedge::domain::error::DomainError;
//! use rust_decimal_macros::dec;
//!
//! let result = evaluate(dec!(1.00), dec!(0.40), &FeeSchedule::zero(), dec!(10));
//! assert!(matches!(result, Err(DomainError::InvalidQuote { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::execution::ExecutionState;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A leg price lies outside the open interval (0, 1).
    #[error("invalid quote: price {price} must be strictly between 0 and 1")]
    InvalidQuote {
        /// The offending price.
        price: Decimal,
    },

    /// Stake must be positive to express an edge per unit of stake.
    #[error("stake must be positive, got {stake}")]
    NonPositiveStake {
        /// The invalid stake.
        stake: Decimal,
    },

    /// More than one candidate tied on score and resolution distance.
    #[error("ambiguous match for {event_id}: {candidates} candidates tied")]
    AmbiguousMatch {
        /// Venue A event that could not be paired.
        event_id: String,
        /// Number of tied candidates.
        candidates: usize,
    },

    /// The execution state machine refused a transition.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// State the record was in.
        from: ExecutionState,
        /// Requested state.
        to: ExecutionState,
    },

    /// A required field was not supplied to a builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invalid_quote_message_includes_price() {
        let err = DomainError::InvalidQuote { price: dec!(1.2) };
        assert!(err.to_string().contains("1.2"));
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = DomainError::InvalidTransition {
            from: ExecutionState::Settled,
            to: ExecutionState::Reserved,
        };
        let msg = err.to_string();
        assert!(msg.contains("Settled"));
        assert!(msg.contains("Reserved"));
    }
}
