use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Announcement type stored for bindings created through the bot.
pub const STREAMER_LIVE_ANNO_TYPE: i32 = 1;

/// Binds a Twitch user to the Discord channel that announces their streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchLiveAnno {
    pub id: i64,
    pub twitch_username: String,
    pub twitch_user_id: String,
    pub anno_channel_id: String,
    pub anno_server_id: String,
    /// Custom message; `None` falls back to the default announcement text.
    pub anno_content: Option<String>,
    /// Last time this stream was announced, used to throttle repeats.
    pub last_anno_date: Option<DateTime<Utc>>,
    pub anno_type: i32,
    pub created_by: String,
}

impl TwitchLiveAnno {
    /// True when the last announcement is older than `cooldown`, or there was none.
    pub fn can_announce(&self, now: DateTime<Utc>, cooldown: chrono::Duration) -> bool {
        match self.last_anno_date {
            Some(last) => now - last >= cooldown,
            None => true,
        }
    }
}
