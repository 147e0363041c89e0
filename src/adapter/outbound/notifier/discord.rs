//! Discord webhook notifier.

use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::truncate;
use crate::port::outbound::notifier::Event;
use crate::port::outbound::notifier::Notifier;

/// Discord rejects webhook content longer than 2000 characters.
const MAX_CONTENT_CHARS: usize = 1990;

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: String,
    pub notify_opportunities: bool,
}

impl DiscordConfig {
    /// Read `DISCORD_WEBHOOK_URL`. Returns `None` if unset or empty.
    #[must_use]
    pub fn from_env(notify_opportunities: bool) -> Option<Self> {
        let webhook_url = std::env::var("DISCORD_WEBHOOK_URL").ok()?;
        if webhook_url.trim().is_empty() {
            return None;
        }
        Some(Self {
            webhook_url,
            notify_opportunities,
        })
    }
}

/// Notifier that posts to a Discord webhook from a background worker.
pub struct DiscordNotifier {
    sender: mpsc::UnboundedSender<Event>,
}

impl DiscordNotifier {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(discord_worker(config, receiver));
        Self { sender }
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Discord notifier channel closed");
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

async fn discord_worker(config: DiscordConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let client = Client::new();
    info!("Discord notifier started");

    while let Some(event) = receiver.recv().await {
        let Some(text) = format_event(&event, config.notify_opportunities) else {
            continue;
        };
        let content = truncate(&text, MAX_CONTENT_CHARS);

        let result = client
            .post(&config.webhook_url)
            .json(&WebhookPayload { content: &content })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        if let Err(e) = result {
            error!(error = %e, "Failed to post Discord message");
        }
    }

    warn!("Discord notifier worker shutting down");
}

/// Plain Discord markdown for an event, or `None` to skip it.
fn format_event(event: &Event, notify_opportunities: bool) -> Option<String> {
    match event {
        Event::OpportunityDetected(e) if notify_opportunities => Some(format!(
            "🎯 **Opportunity** {}\n{} | net edge `{}` | stake `{}` | expected `{:.2}`",
            e.question, e.orientation, e.net_edge, e.stake, e.expected_profit
        )),
        Event::ExecutionCompleted(e) => {
            let emoji = if e.success() { "✅" } else { "❌" };
            let mut msg = format!(
                "{emoji} **{}** `{}` ({}) P&L `{:.2}` fees `{:.2}`",
                e.state, e.key, e.mode, e.realized_pnl, e.fees_paid
            );
            if let Some(reason) = &e.failure_reason {
                msg.push_str(&format!("\n{reason}"));
            }
            Some(msg)
        }
        Event::PartialFill(e) => Some(format!(
            "🚨 **UNHEDGED PARTIAL FILL** {}\nfilled {} {} | exposure `{:.2}`\n{}",
            e.question, e.filled_venue, e.filled_side, e.exposure, e.reason
        )),
        _ => None,
    }
}
