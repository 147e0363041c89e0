//! Polymarket data transfer objects.
//!
//! - Gamma API market listings
//! - CLOB API order book snapshots

pub mod response;
