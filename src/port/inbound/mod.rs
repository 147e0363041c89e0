//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`scan`]: the scan-cycle entry point driven by the scheduler and CLI

pub mod scan;
