//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.

mod discord;
mod log;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use discord::{DiscordConfig, DiscordNotifier};
pub use log::{LogNotifier, NullNotifier};

/// Truncate a string with ellipsis (Unicode-safe).
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}
