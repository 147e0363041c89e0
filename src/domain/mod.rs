//! Venue-agnostic domain types.
//!
//! Nothing in this module performs I/O or holds shared state. The
//! fee/profit calculator lives in [`economics`]; everything else is data
//! with invariant-checking constructors.

pub mod economics;
pub mod error;
pub mod execution;
pub mod id;
pub mod ledger;
pub mod money;
pub mod opportunity;
pub mod pair;
pub mod quote;
pub mod reservation;
pub mod venue;
