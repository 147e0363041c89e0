//! Infrastructure configuration modules.

pub mod capital;
pub mod discord;
pub mod execution;
pub mod fees;
pub mod llm;
pub mod logging;
pub mod scanner;
pub mod scheduler;
pub mod settings;
pub mod telegram;
pub mod validation;
pub mod venues;
