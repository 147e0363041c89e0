//! Telegram notifications.
//!
//! Requires the `telegram` feature to be enabled.

mod format;
mod notifier;

pub use notifier::{TelegramConfig, TelegramNotifier};
