//! Message formatting for Telegram notifications.

use rust_decimal::Decimal;

use crate::adapter::outbound::notifier::truncate;
use crate::port::outbound::notifier::Event;

use super::notifier::TelegramConfig;

/// Telegram rejects messages longer than 4096 characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Format an event into a Telegram message, or None if the event should be skipped.
pub fn format_event_message(event: &Event, config: &TelegramConfig) -> Option<String> {
    match event {
        Event::OpportunityDetected(e) if config.notify_opportunities => Some(format!(
            "🎯 *Opportunity Detected*\n\
            \n\
            📋 {}\n\
            🔀 {}\n\
            📈 Net edge: `{:.2}%`\n\
            💵 Stake: `{}`\n\
            💰 Expected: `{:.2}`",
            escape_markdown(&truncate(&e.question, 120)),
            escape_markdown(&e.orientation),
            e.net_edge * Decimal::from(100),
            e.stake,
            e.expected_profit
        )),
        Event::ExecutionCompleted(e) if config.notify_executions => {
            let (emoji, title) = if e.success() {
                ("✅", "Execution Settled")
            } else {
                ("❌", "Execution Failed")
            };

            let mut msg = format!(
                "{} *{}*\n\
                \n\
                🔑 Key: `{}`\n\
                🧪 Mode: `{}`\n\
                📌 State: `{}`\n\
                💰 P&L: `{:.2}`\n\
                🧾 Fees: `{:.2}`",
                emoji, title, e.key, e.mode, e.state, e.realized_pnl, e.fees_paid
            );
            if let Some(reason) = &e.failure_reason {
                msg.push_str(&format!("\n📝 {}", escape_markdown(&truncate(reason, 200))));
            }
            Some(msg)
        }
        Event::PartialFill(e) => Some(format!(
            "🚨 *UNHEDGED PARTIAL FILL*\n\
            \n\
            📋 {}\n\
            🏛 Filled: `{} {}`\n\
            ⚠️ Exposure: `{:.2}`\n\
            📝 {}",
            escape_markdown(&truncate(&e.question, 120)),
            e.filled_venue,
            e.filled_side,
            e.exposure,
            escape_markdown(&truncate(&e.reason, 200))
        )),
        _ => None,
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}
