//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the core consumes: venue
//! quote sources and order clients, the advisory validator, LLM
//! completion, and notifications.

pub mod llm;
pub mod notifier;
pub mod validator;
pub mod venue;
