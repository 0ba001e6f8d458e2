use crate::domain::entities::{AnnouncementChannel, BotConfig, TwitchLiveAnno};
use crate::domain::repositories::{ConfigStore, StoreError};
use std::sync::Arc;
use tracing::{error, info};

pub const MAX_CONFIG_KEY_LEN: usize = 64;
pub const MAX_CONFIG_VALUE_LEN: usize = 1000;
pub const MAX_ANNO_CONTENT_LEN: usize = 1500;

const STORAGE_FAILURE: &str = "Could not reach the bot database, please try again later";

/// Validates slash-command input and forwards it to the [`ConfigStore`].
///
/// Errors are returned as user-facing messages; storage failures are logged
/// here and replaced by a generic message.
#[derive(Clone)]
pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub fn validate_guild_context(&self, guild_id: Option<u64>) -> Result<String, String> {
        guild_id
            .filter(|id| *id != 0)
            .map(|id| id.to_string())
            .ok_or_else(|| "This command can only be used in a server".to_string())
    }

    pub async fn set_config(&self, server_id: &str, key: &str, value: &str) -> Result<(), String> {
        let key = validate_config_key(key)?;
        let value = value.trim();
        if value.is_empty() {
            return Err("Value cannot be empty, use `/delete-config` to clear a key".to_string());
        }
        if value.chars().count() > MAX_CONFIG_VALUE_LEN {
            return Err(format!(
                "Value is too long (max {} characters)",
                MAX_CONFIG_VALUE_LEN
            ));
        }

        self.store
            .set_bot_config(server_id, &key, value)
            .await
            .map_err(storage_failure)?;

        info!(server_id, key = %key, "Config updated");
        Ok(())
    }

    /// Returns `false` if the key was never set.
    pub async fn delete_config(&self, server_id: &str, key: &str) -> Result<bool, String> {
        let key = validate_config_key(key)?;
        self.store
            .delete_bot_config(server_id, &key)
            .await
            .map_err(storage_failure)
    }

    /// Config entries that currently hold a value.
    pub async fn list_config(&self, server_id: &str) -> Result<Vec<BotConfig>, String> {
        let configs = self
            .store
            .get_bot_configs(server_id)
            .await
            .map_err(storage_failure)?;

        Ok(configs.into_iter().filter(|c| !c.is_cleared()).collect())
    }

    /// Returns `false` if the channel is already registered.
    pub async fn register_announcement_channel(
        &self,
        server_id: &str,
        channel_id: &str,
        created_by: &str,
    ) -> Result<bool, String> {
        self.store
            .add_announcement_channel(channel_id, server_id, created_by)
            .await
            .map_err(storage_failure)
    }

    /// Returns `false` if the channel is not registered in this server.
    pub async fn unregister_announcement_channel(
        &self,
        server_id: &str,
        channel_id: &str,
    ) -> Result<bool, String> {
        let channel = self
            .store
            .get_announcement_channel_by_channel_id(channel_id)
            .await
            .map_err(storage_failure)?;

        match channel {
            Some(channel) if channel.server_id == server_id => self
                .store
                .delete_announcement_channel(channel_id)
                .await
                .map_err(storage_failure),
            _ => Ok(false),
        }
    }

    pub async fn list_announcement_channels(
        &self,
        server_id: &str,
    ) -> Result<Vec<AnnouncementChannel>, String> {
        self.store
            .get_server_announcement_channels(server_id)
            .await
            .map_err(storage_failure)
    }

    /// Returns `true` for a new binding and `false` when an existing one was refreshed.
    pub async fn bind_twitch_streamer(
        &self,
        server_id: &str,
        anno_channel_id: &str,
        twitch_user_id: &str,
        twitch_username: &str,
        created_by: &str,
    ) -> Result<bool, String> {
        let twitch_username = validate_twitch_login(twitch_username)?;
        let twitch_user_id = validate_twitch_user_id(twitch_user_id)?;

        self.store
            .add_twitch_live_anno(
                &twitch_username,
                &twitch_user_id,
                anno_channel_id,
                server_id,
                created_by,
            )
            .await
            .map_err(storage_failure)
    }

    /// `None` restores the default announcement text.
    pub async fn set_twitch_anno_content(
        &self,
        server_id: &str,
        twitch_username: &str,
        content: Option<&str>,
    ) -> Result<bool, String> {
        let twitch_username = validate_twitch_login(twitch_username)?;
        let content = content.map(str::trim).filter(|c| !c.is_empty());
        if let Some(content) = content {
            if content.chars().count() > MAX_ANNO_CONTENT_LEN {
                return Err(format!(
                    "Announcement text is too long (max {} characters)",
                    MAX_ANNO_CONTENT_LEN
                ));
            }
        }

        self.store
            .update_twitch_streamer_anno_content(&twitch_username, server_id, content)
            .await
            .map_err(storage_failure)
    }

    pub async fn unbind_twitch_streamer(
        &self,
        server_id: &str,
        twitch_user_id: &str,
    ) -> Result<bool, String> {
        let twitch_user_id = validate_twitch_user_id(twitch_user_id)?;
        self.store
            .delete_twitch_live_anno(&twitch_user_id, server_id)
            .await
            .map_err(storage_failure)
    }

    pub async fn list_twitch_streamers(&self, server_id: &str) -> Result<Vec<TwitchLiveAnno>, String> {
        self.store
            .get_twitch_live_annos(server_id)
            .await
            .map_err(storage_failure)
    }

    /// Audit-log a command; a no-op unless the server enabled activity logging.
    pub async fn record_activity(&self, activity: &str, server_id: &str, author: &str) {
        self.store
            .save_bot_command_activity(activity, server_id, author)
            .await;
    }
}

fn storage_failure(e: StoreError) -> String {
    error!("{}", e);
    STORAGE_FAILURE.to_string()
}

/// Keys are lowercase `snake_case`; input is trimmed and lowercased.
pub fn validate_config_key(key: &str) -> Result<String, String> {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return Err("Config key cannot be empty".to_string());
    }
    if key.len() > MAX_CONFIG_KEY_LEN {
        return Err(format!(
            "Config key is too long (max {} characters)",
            MAX_CONFIG_KEY_LEN
        ));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err("Config key may only contain letters, digits and `_`".to_string());
    }
    Ok(key)
}

/// Twitch logins are 4-25 characters of letters, digits and `_`; stored lowercase.
pub fn validate_twitch_login(login: &str) -> Result<String, String> {
    let login = login.trim().trim_start_matches('@').to_lowercase();
    let valid_len = (4..=25).contains(&login.len());
    let valid_chars = login
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_len && valid_chars {
        Ok(login)
    } else {
        Err(format!("`{}` is not a valid Twitch username", login))
    }
}

pub fn validate_twitch_user_id(user_id: &str) -> Result<String, String> {
    let user_id = user_id.trim();
    if !user_id.is_empty() && user_id.chars().all(|c| c.is_ascii_digit()) {
        Ok(user_id.to_string())
    } else {
        Err(format!("`{}` is not a valid Twitch user ID", user_id))
    }
}
