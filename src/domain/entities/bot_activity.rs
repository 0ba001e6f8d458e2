use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform tag written by the Discord command handlers.
pub const DISCORD_PLATFORM: &str = "discord";

/// Append-only audit row describing something the bot did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotActivity {
    pub id: i64,
    pub platform_type: String,
    pub activity: String,
    pub server_id: Option<String>,
    pub author: Option<String>,
    pub activity_date: DateTime<Utc>,
}
