//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod cycle;
pub mod execution;
pub mod guard;
pub mod matcher;
pub mod portfolio;
pub mod scanner;
pub mod validation;
