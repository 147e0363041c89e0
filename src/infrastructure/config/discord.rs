//! Discord webhook configuration.

use serde::Deserialize;

/// The webhook URL comes from `DISCORD_WEBHOOK_URL`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordAppConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub notify_opportunities: bool,
}
