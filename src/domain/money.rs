//! Monetary types for price and size representation.

use rust_decimal::Decimal;

/// Price as a fraction of the $1 contract payout.
pub type Price = Decimal;

/// Size in contracts.
pub type Volume = Decimal;

/// Dollar amount (capital, P&L, fees).
pub type Amount = Decimal;

/// Payout of one winning binary contract.
pub const CONTRACT_PAYOUT: Decimal = Decimal::ONE;
