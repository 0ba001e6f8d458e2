use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

use crate::domain::entities::{AnnouncementChannel, BotActivity, BotConfig, TwitchLiveAnno};
use crate::domain::repositories::ConfigStore;
use crate::domain::repositories::store_error::Result;
use crate::infrastructure::database::DatabaseManager;

mod rows;
mod upsert;

#[cfg(test)]
mod tests;

use rows::{
    ANNOUNCEMENT_CHANNEL_COLUMNS, BOT_ACTIVITY_COLUMNS, BOT_CONFIG_COLUMNS,
    TWITCH_LIVE_ANNO_COLUMNS, row_to_announcement_channel, row_to_bot_activity,
    row_to_bot_config, row_to_twitch_live_anno,
};
use upsert::TwitchBinding;

/// [`ConfigStore`] backed by the bot's SQLite database.
#[derive(Clone, Debug)]
pub struct SqliteConfigStore {
    db: DatabaseManager,
}

impl SqliteConfigStore {
    /// Wraps an already opened database. The schema must have been initialized.
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConfigStore for SqliteConfigStore {
    async fn set_bot_config(&self, server_id: &str, key: &str, value: &str) -> Result<bool> {
        self.upsert_bot_config(server_id, key, value).await
    }

    async fn get_bot_config(&self, server_id: &str, key: &str) -> Result<Option<BotConfig>> {
        let (server_id, key) = (server_id.to_string(), key.to_string());

        self.db
            .execute_blocking("get_bot_config", move |conn| {
                conn.query_row(
                    &format!(
                        "SELECT {} FROM discord_bot_configs
                         WHERE server_id = ?1 AND config_key = ?2
                         ORDER BY id LIMIT 1",
                        BOT_CONFIG_COLUMNS
                    ),
                    params![server_id, key],
                    row_to_bot_config,
                )
                .optional()
            })
            .await
    }

    async fn get_bot_configs(&self, server_id: &str) -> Result<Vec<BotConfig>> {
        let server_id = server_id.to_string();

        self.db
            .execute_blocking("get_bot_configs", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM discord_bot_configs WHERE server_id = ?1 ORDER BY config_key",
                    BOT_CONFIG_COLUMNS
                ))?;
                let configs = stmt.query_map(params![server_id], row_to_bot_config)?;
                configs.collect()
            })
            .await
    }

    async fn delete_bot_config(&self, server_id: &str, key: &str) -> Result<bool> {
        let (server_id, key) = (server_id.to_string(), key.to_string());

        let affected = self
            .db
            .execute_blocking("delete_bot_config", move |conn| {
                conn.execute(
                    "UPDATE discord_bot_configs SET config_value = ''
                     WHERE server_id = ?1 AND config_key = ?2",
                    params![server_id, key],
                )
            })
            .await?;

        Ok(affected > 0)
    }

    async fn add_announcement_channel(
        &self,
        channel_id: &str,
        server_id: &str,
        created_by: &str,
    ) -> Result<bool> {
        self.insert_announcement_channel(channel_id, server_id, created_by)
            .await
    }

    async fn get_announcement_channels(&self) -> Result<Vec<AnnouncementChannel>> {
        self.db
            .execute_blocking("get_announcement_channels", |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM discord_announcement_channels ORDER BY id",
                    ANNOUNCEMENT_CHANNEL_COLUMNS
                ))?;
                let channels = stmt.query_map([], row_to_announcement_channel)?;
                channels.collect()
            })
            .await
    }

    async fn get_server_announcement_channels(
        &self,
        server_id: &str,
    ) -> Result<Vec<AnnouncementChannel>> {
        let server_id = server_id.to_string();

        self.db
            .execute_blocking("get_server_announcement_channels", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM discord_announcement_channels WHERE server_id = ?1 ORDER BY id",
                    ANNOUNCEMENT_CHANNEL_COLUMNS
                ))?;
                let channels = stmt.query_map(params![server_id], row_to_announcement_channel)?;
                channels.collect()
            })
            .await
    }

    async fn get_announcement_channel_by_channel_id(
        &self,
        channel_id: &str,
    ) -> Result<Option<AnnouncementChannel>> {
        let channel_id = channel_id.to_string();

        self.db
            .execute_blocking("get_announcement_channel_by_channel_id", move |conn| {
                conn.query_row(
                    &format!(
                        "SELECT {} FROM discord_announcement_channels WHERE channel_id = ?1",
                        ANNOUNCEMENT_CHANNEL_COLUMNS
                    ),
                    params![channel_id],
                    row_to_announcement_channel,
                )
                .optional()
            })
            .await
    }

    async fn get_announcement_channel_by_id(
        &self,
        id: i64,
    ) -> Result<Option<AnnouncementChannel>> {
        self.db
            .execute_blocking("get_announcement_channel_by_id", move |conn| {
                conn.query_row(
                    &format!(
                        "SELECT {} FROM discord_announcement_channels WHERE id = ?1",
                        ANNOUNCEMENT_CHANNEL_COLUMNS
                    ),
                    params![id],
                    row_to_announcement_channel,
                )
                .optional()
            })
            .await
    }

    async fn delete_announcement_channel(&self, channel_id: &str) -> Result<bool> {
        let channel_id = channel_id.to_string();

        let affected = self
            .db
            .execute_blocking("delete_announcement_channel", move |conn| {
                conn.execute(
                    "DELETE FROM discord_announcement_channels WHERE channel_id = ?1",
                    params![channel_id],
                )
            })
            .await?;

        Ok(affected > 0)
    }

    async fn add_twitch_live_anno(
        &self,
        twitch_username: &str,
        twitch_user_id: &str,
        anno_channel_id: &str,
        anno_server_id: &str,
        created_by: &str,
    ) -> Result<bool> {
        self.upsert_twitch_live_anno(TwitchBinding {
            twitch_username: twitch_username.to_string(),
            twitch_user_id: twitch_user_id.to_string(),
            anno_channel_id: anno_channel_id.to_string(),
            anno_server_id: anno_server_id.to_string(),
            created_by: created_by.to_string(),
        })
        .await
    }

    async fn update_twitch_streamer_anno_content(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
        anno_content: Option<&str>,
    ) -> Result<bool> {
        let (twitch_username, anno_server_id) =
            (twitch_username.to_string(), anno_server_id.to_string());
        let anno_content = anno_content.map(str::to_string);

        let affected = self
            .db
            .execute_blocking("update_twitch_streamer_anno_content", move |conn| {
                conn.execute(
                    "UPDATE discord_twitch_live_annos SET anno_content = ?1
                     WHERE id = (
                         SELECT id FROM discord_twitch_live_annos
                         WHERE twitch_username = ?2 AND anno_server_id = ?3
                         ORDER BY id LIMIT 1
                     )",
                    params![anno_content, twitch_username, anno_server_id],
                )
            })
            .await?;

        Ok(affected > 0)
    }

    async fn update_twitch_streamer_last_anno_date(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
        last_anno_date: DateTime<Utc>,
    ) -> Result<bool> {
        let (twitch_username, anno_server_id) =
            (twitch_username.to_string(), anno_server_id.to_string());

        let affected = self
            .db
            .execute_blocking("update_twitch_streamer_last_anno_date", move |conn| {
                conn.execute(
                    "UPDATE discord_twitch_live_annos SET last_anno_date = ?1
                     WHERE id = (
                         SELECT id FROM discord_twitch_live_annos
                         WHERE twitch_username = ?2 AND anno_server_id = ?3
                         ORDER BY id LIMIT 1
                     )",
                    params![last_anno_date.timestamp(), twitch_username, anno_server_id],
                )
            })
            .await?;

        Ok(affected > 0)
    }

    async fn get_twitch_streamer_last_anno_date(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let anno = self
            .get_twitch_live_anno_by_username(twitch_username, anno_server_id)
            .await
            .map_err(|e| e.within("get_twitch_streamer_last_anno_date"))?;

        Ok(anno.and_then(|anno| anno.last_anno_date))
    }

    async fn get_twitch_streamer_anno_content(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
    ) -> Result<Option<String>> {
        let anno = self
            .get_twitch_live_anno_by_username(twitch_username, anno_server_id)
            .await
            .map_err(|e| e.within("get_twitch_streamer_anno_content"))?;

        Ok(anno.and_then(|anno| anno.anno_content))
    }

    async fn get_twitch_live_anno(
        &self,
        twitch_user_id: &str,
        anno_server_id: &str,
    ) -> Result<Option<TwitchLiveAnno>> {
        let (twitch_user_id, anno_server_id) =
            (twitch_user_id.to_string(), anno_server_id.to_string());

        self.db
            .execute_blocking("get_twitch_live_anno", move |conn| {
                conn.query_row(
                    &format!(
                        "SELECT {} FROM discord_twitch_live_annos
                         WHERE twitch_user_id = ?1 AND anno_server_id = ?2",
                        TWITCH_LIVE_ANNO_COLUMNS
                    ),
                    params![twitch_user_id, anno_server_id],
                    row_to_twitch_live_anno,
                )
                .optional()
            })
            .await
    }

    async fn get_twitch_live_anno_by_username(
        &self,
        twitch_username: &str,
        anno_server_id: &str,
    ) -> Result<Option<TwitchLiveAnno>> {
        let (twitch_username, anno_server_id) =
            (twitch_username.to_string(), anno_server_id.to_string());

        self.db
            .execute_blocking("get_twitch_live_anno_by_username", move |conn| {
                conn.query_row(
                    &format!(
                        "SELECT {} FROM discord_twitch_live_annos
                         WHERE twitch_username = ?1 AND anno_server_id = ?2
                         ORDER BY id LIMIT 1",
                        TWITCH_LIVE_ANNO_COLUMNS
                    ),
                    params![twitch_username, anno_server_id],
                    row_to_twitch_live_anno,
                )
                .optional()
            })
            .await
    }

    async fn get_twitch_live_annos(&self, server_id: &str) -> Result<Vec<TwitchLiveAnno>> {
        let server_id = server_id.to_string();

        self.db
            .execute_blocking("get_twitch_live_annos", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM discord_twitch_live_annos WHERE anno_server_id = ?1 ORDER BY id",
                    TWITCH_LIVE_ANNO_COLUMNS
                ))?;
                let annos = stmt.query_map(params![server_id], row_to_twitch_live_anno)?;
                annos.collect()
            })
            .await
    }

    async fn delete_twitch_live_anno(
        &self,
        twitch_user_id: &str,
        server_id: &str,
    ) -> Result<bool> {
        let (twitch_user_id, server_id) = (twitch_user_id.to_string(), server_id.to_string());

        let affected = self
            .db
            .execute_blocking("delete_twitch_live_anno", move |conn| {
                conn.execute(
                    "DELETE FROM discord_twitch_live_annos
                     WHERE twitch_user_id = ?1 AND anno_server_id = ?2",
                    params![twitch_user_id, server_id],
                )
            })
            .await?;

        Ok(affected > 0)
    }

    async fn create_bot_action_activity(
        &self,
        platform_type: &str,
        activity: &str,
        server_id: &str,
        author: &str,
    ) -> Result<()> {
        let (platform_type, activity, server_id, author) = (
            platform_type.to_string(),
            activity.to_string(),
            server_id.to_string(),
            author.to_string(),
        );
        let activity_date = Utc::now().timestamp();

        self.db
            .execute_blocking("create_bot_action_activity", move |conn| {
                conn.execute(
                    "INSERT INTO bot_action_activities
                        (bot_platform_type, bot_activity, discord_server_id, activity_author, activity_date)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![platform_type, activity, server_id, author, activity_date],
                )
            })
            .await?;

        Ok(())
    }

    async fn get_bot_action_activities(&self, server_id: &str) -> Result<Vec<BotActivity>> {
        let server_id = server_id.to_string();

        self.db
            .execute_blocking("get_bot_action_activities", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM bot_action_activities WHERE discord_server_id = ?1 ORDER BY id",
                    BOT_ACTIVITY_COLUMNS
                ))?;
                let activities = stmt.query_map(params![server_id], row_to_bot_activity)?;
                activities.collect()
            })
            .await
    }
}
