use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Row;

use crate::domain::entities::{AnnouncementChannel, BotActivity, BotConfig, TwitchLiveAnno};

pub(super) const BOT_CONFIG_COLUMNS: &str = "id, server_id, config_key, config_value";

pub(super) const ANNOUNCEMENT_CHANNEL_COLUMNS: &str = "id, channel_id, server_id, created_by";

pub(super) const TWITCH_LIVE_ANNO_COLUMNS: &str = "id, twitch_username, twitch_user_id, anno_channel_id, anno_server_id, \
     anno_content, last_anno_date, type, created_by";

pub(super) const BOT_ACTIVITY_COLUMNS: &str =
    "id, bot_platform_type, bot_activity, discord_server_id, activity_author, activity_date";

pub(super) fn row_to_bot_config(row: &Row) -> rusqlite::Result<BotConfig> {
    Ok(BotConfig {
        id: row.get("id")?,
        server_id: row.get("server_id")?,
        key: row.get("config_key")?,
        value: row.get("config_value")?,
    })
}

pub(super) fn row_to_announcement_channel(row: &Row) -> rusqlite::Result<AnnouncementChannel> {
    Ok(AnnouncementChannel {
        id: row.get("id")?,
        channel_id: row.get("channel_id")?,
        server_id: row.get("server_id")?,
        created_by: row.get("created_by")?,
    })
}

pub(super) fn row_to_twitch_live_anno(row: &Row) -> rusqlite::Result<TwitchLiveAnno> {
    let last_anno_date: Option<i64> = row.get("last_anno_date")?;

    Ok(TwitchLiveAnno {
        id: row.get("id")?,
        twitch_username: row.get("twitch_username")?,
        twitch_user_id: row.get("twitch_user_id")?,
        anno_channel_id: row.get("anno_channel_id")?,
        anno_server_id: row.get("anno_server_id")?,
        anno_content: row.get("anno_content")?,
        last_anno_date: last_anno_date.and_then(from_timestamp),
        anno_type: row.get("type")?,
        created_by: row.get("created_by")?,
    })
}

pub(super) fn row_to_bot_activity(row: &Row) -> rusqlite::Result<BotActivity> {
    let activity_date: i64 = row.get("activity_date")?;

    Ok(BotActivity {
        id: row.get("id")?,
        platform_type: row.get("bot_platform_type")?,
        activity: row.get("bot_activity")?,
        server_id: row.get("discord_server_id")?,
        author: row.get("activity_author")?,
        activity_date: from_timestamp(activity_date).unwrap_or_default(),
    })
}

/// Timestamps are stored as unix seconds.
pub(super) fn from_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0).single()
}
