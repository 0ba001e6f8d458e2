use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use tracing::{debug, error, warn};

use crate::domain::entities::{
    AnnouncementChannel, BotActivity, BotConfig, DISCORD_PLATFORM, TwitchLiveAnno,
};
use crate::domain::repositories::store_error::Result;

/// Config key gating the activity audit log for a server.
pub const BOT_ACTIVITY_ENABLED_KEY: &str = "bot_activity_enabled";

/// Persistence for per-server bot settings, announcement channels,
/// Twitch live-announcement bindings and the activity audit log.
///
/// Write operations return `true` when a row was inserted or changed and
/// `false` when there was nothing to act on. Missing rows are reported as
/// `None` or an empty list, never as an error.
#[async_trait]
pub trait ConfigStore: Send + Sync + Debug {
    /// Insert or overwrite a config value for a server.
    async fn set_bot_config(&self, server_id: &str, key: &str, value: &str) -> Result<bool>;

    async fn get_bot_config(&self, server_id: &str, key: &str) -> Result<Option<BotConfig>>;

    /// All config rows of a server, cleared values included.
    async fn get_bot_configs(&self, server_id: &str) -> Result<Vec<BotConfig>>;

    /// Clears the value of a key. The row itself is kept.
    async fn delete_bot_config(&self, server_id: &str, key: &str) -> Result<bool>;

    /// Register a channel for announcements. Returns `false` if it is already registered.
    async fn add_announcement_channel(
        &self,
        channel_id: &str,
        server_id: &str,
        created_by: &str,
    ) -> Result<bool>;

    /// Every registered announcement channel, across all servers.
    async fn get_announcement_channels(&self) -> Result<Vec<AnnouncementChannel>>;

    async fn get_server_announcement_channels(
        &self,
        server_id: &str,
    ) -> Result<Vec<AnnouncementChannel>>;

    async fn get_announcement_channel_by_channel_id(
        &self,
        channel_id: &str,
    ) -> Result<Option<AnnouncementChannel>>;

    async fn get_announcement_channel_by_id(&self, id: i64)
    -> Result<Option<AnnouncementChannel>>;

    async fn delete_announcement_channel(&self, channel_id: &str) -> Result<bool>;

    /// Bind a Twitch user to an announcement channel of a server.
    ///
    /// Returns `true` when a new binding was created. When the user is
    /// already bound in that server the existing row is refreshed and
    /// `false` is returned, the same value used for "nothing happened".
    async fn add_twitch_live_anno(
        &self,
        twitch_username: &str,
        twitch_user_id: &str,
        anno_channel_id: &str,
        anno_server_id: &str,
        created_by: &str,
    ) -> Result<bool>;

    /// Set or clear the custom announcement text of a binding.
    async fn update_twitch_streamer_anno_content(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
        anno_content: Option<&str>,
    ) -> Result<bool>;

    /// Stored with whole-second precision; the fraction of `last_anno_date` is dropped.
    async fn update_twitch_streamer_last_anno_date(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
        last_anno_date: DateTime<Utc>,
    ) -> Result<bool>;

    async fn get_twitch_streamer_last_anno_date(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
    ) -> Result<Option<DateTime<Utc>>>;

    async fn get_twitch_streamer_anno_content(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
    ) -> Result<Option<String>>;

    async fn get_twitch_live_anno(
        &self,
        twitch_user_id: &str,
        anno_server_id: &str,
    ) -> Result<Option<TwitchLiveAnno>>;

    async fn get_twitch_live_anno_by_username(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
    ) -> Result<Option<TwitchLiveAnno>>;

    async fn get_twitch_live_annos(&self, server_id: &str) -> Result<Vec<TwitchLiveAnno>>;

    async fn delete_twitch_live_anno(&self, twitch_user_id: &str, server_id: &str)
    -> Result<bool>;

    /// Append a row to the activity audit log.
    async fn create_bot_action_activity(
        &self,
        platform_type: &str,
        activity: &str,
        server_id: &str,
        author: &str,
    ) -> Result<()>;

    async fn get_bot_action_activities(&self, server_id: &str) -> Result<Vec<BotActivity>>;

    /// True if the stored value of `key` equals `expected`. Lookup failures count as false.
    async fn check_config(&self, server_id: &str, key: &str, expected: &str) -> bool {
        match self.get_bot_config(server_id, key).await {
            Ok(Some(config)) => config.value == expected,
            Ok(None) => false,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// Record a command in the audit log if the server has it enabled.
    /// Never fails; write errors are only logged.
    async fn save_bot_command_activity(&self, activity: &str, server_id: &str, author: &str) {
        if !self
            .check_config(server_id, BOT_ACTIVITY_ENABLED_KEY, "1")
            .await
        {
            debug!(server_id, "Activity log disabled, skipping '{}'", activity);
            return;
        }

        if let Err(e) = self
            .create_bot_action_activity(DISCORD_PLATFORM, activity, server_id, author)
            .await
        {
            warn!("Failed to save bot activity: {}", e);
        }
    }
}
