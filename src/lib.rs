//! Crossedge - cross-venue prediction market arbitrage.
//!
//! Pairs equivalent binary events listed on Polymarket and Kalshi, prices
//! both YES/NO orientations after fees, and executes the profitable ones
//! under a shared capital ceiling.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Pure types and the fee/profit calculator
//! - [`port`] - Traits for venues, validators, LLMs and notifiers
//! - [`application`] - Matcher, scanner, capital guard, execution engine,
//!   portfolio ledger, and the scan cycle that ties them together
//! - [`adapter`] - Venue REST clients, LLM validators, notifiers, status
//!   file and the CLI
//! - [`infrastructure`] - Configuration, bootstrap and the scan scheduler
//!
//! # Features
//!
//! - `telegram` - Telegram notifications (enabled by default)
//!
//! # Example
//!
//! ```
//! use crossedge::domain::economics::{evaluate, FeeSchedule};
//! use rust_decimal_macros::dec;
//!
//! let economics = evaluate(dec!(0.45), dec!(0.52), &FeeSchedule::zero(), dec!(100)).unwrap();
//! assert_eq!(economics.net_edge, dec!(0.03));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
