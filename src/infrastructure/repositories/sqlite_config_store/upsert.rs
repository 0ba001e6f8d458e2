//! Insert-or-update paths for the entities with a natural key.
//!
//! The default build looks the row up and then writes it with a second,
//! separately locked statement, so two callers racing on the same key can
//! both decide to insert; the loser then fails on the table's UNIQUE
//! constraint. With the `atomic-upsert` feature the lookup and the write run
//! in one transaction under the connection lock. Both paths return the same
//! values.

use rusqlite::params;
#[cfg(feature = "atomic-upsert")]
use rusqlite::OptionalExtension;

use super::SqliteConfigStore;
use crate::domain::entities::STREAMER_LIVE_ANNO_TYPE;
#[cfg(not(feature = "atomic-upsert"))]
use crate::domain::repositories::ConfigStore;
use crate::domain::repositories::store_error::Result;

/// Owned copy of the arguments of `add_twitch_live_anno`.
pub(super) struct TwitchBinding {
    pub twitch_username: String,
    pub twitch_user_id: String,
    pub anno_channel_id: String,
    pub anno_server_id: String,
    pub created_by: String,
}

#[cfg(not(feature = "atomic-upsert"))]
impl SqliteConfigStore {
    pub(super) async fn upsert_bot_config(
        &self,
        server_id: &str,
        key: &str,
        value: &str,
    ) -> Result<bool> {
        let existing = self
            .get_bot_config(server_id, key)
            .await
            .map_err(|e| e.within("set_bot_config"))?;

        if let Some(config) = existing {
            let value = value.to_string();
            self.db
                .execute_blocking("set_bot_config", move |conn| {
                    conn.execute(
                        "UPDATE discord_bot_configs SET config_value = ?1 WHERE id = ?2",
                        params![value, config.id],
                    )
                })
                .await?;
            return Ok(true);
        }

        let (server_id, key, value) = (server_id.to_string(), key.to_string(), value.to_string());
        self.db
            .execute_blocking("set_bot_config", move |conn| {
                conn.execute(
                    "INSERT INTO discord_bot_configs (server_id, config_key, config_value)
                     VALUES (?1, ?2, ?3)",
                    params![server_id, key, value],
                )
            })
            .await?;

        Ok(true)
    }

    pub(super) async fn insert_announcement_channel(
        &self,
        channel_id: &str,
        server_id: &str,
        created_by: &str,
    ) -> Result<bool> {
        let found = self
            .get_announcement_channel_by_channel_id(channel_id)
            .await
            .map_err(|e| e.within("add_announcement_channel"))?;
        if found.is_some() {
            return Ok(false);
        }

        let (channel_id, server_id, created_by) = (
            channel_id.to_string(),
            server_id.to_string(),
            created_by.to_string(),
        );
        self.db
            .execute_blocking("add_announcement_channel", move |conn| {
                conn.execute(
                    "INSERT INTO discord_announcement_channels (channel_id, server_id, created_by)
                     VALUES (?1, ?2, ?3)",
                    params![channel_id, server_id, created_by],
                )
            })
            .await?;

        Ok(true)
    }

    pub(super) async fn upsert_twitch_live_anno(&self, binding: TwitchBinding) -> Result<bool> {
        let existing = self
            .get_twitch_live_anno(&binding.twitch_user_id, &binding.anno_server_id)
            .await
            .map_err(|e| e.within("add_twitch_live_anno"))?;

        match existing {
            Some(anno) => {
                self.db
                    .execute_blocking("add_twitch_live_anno", move |conn| {
                        update_twitch_binding(conn, anno.id, &binding)
                    })
                    .await?;
                // An update still reports `false`; callers treat it as "already bound".
                Ok(false)
            }
            None => {
                self.db
                    .execute_blocking("add_twitch_live_anno", move |conn| {
                        insert_twitch_binding(conn, &binding)
                    })
                    .await?;
                Ok(true)
            }
        }
    }
}

#[cfg(feature = "atomic-upsert")]
impl SqliteConfigStore {
    pub(super) async fn upsert_bot_config(
        &self,
        server_id: &str,
        key: &str,
        value: &str,
    ) -> Result<bool> {
        let (server_id, key, value) = (server_id.to_string(), key.to_string(), value.to_string());
        self.db
            .execute_blocking("set_bot_config", move |conn| {
                conn.execute(
                    "INSERT INTO discord_bot_configs (server_id, config_key, config_value)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(server_id, config_key)
                     DO UPDATE SET config_value = excluded.config_value",
                    params![server_id, key, value],
                )
            })
            .await?;

        Ok(true)
    }

    pub(super) async fn insert_announcement_channel(
        &self,
        channel_id: &str,
        server_id: &str,
        created_by: &str,
    ) -> Result<bool> {
        let (channel_id, server_id, created_by) = (
            channel_id.to_string(),
            server_id.to_string(),
            created_by.to_string(),
        );
        let inserted = self
            .db
            .execute_blocking("add_announcement_channel", move |conn| {
                conn.execute(
                    "INSERT INTO discord_announcement_channels (channel_id, server_id, created_by)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(channel_id) DO NOTHING",
                    params![channel_id, server_id, created_by],
                )
            })
            .await?;

        Ok(inserted == 1)
    }

    pub(super) async fn upsert_twitch_live_anno(&self, binding: TwitchBinding) -> Result<bool> {
        self.db
            .execute_blocking("add_twitch_live_anno", move |conn| {
                let tx = conn.unchecked_transaction()?;
                let existing: Option<i64> = tx
                    .query_row(
                        "SELECT id FROM discord_twitch_live_annos
                         WHERE twitch_user_id = ?1 AND anno_server_id = ?2",
                        params![binding.twitch_user_id, binding.anno_server_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                let inserted = match existing {
                    Some(id) => {
                        update_twitch_binding(&tx, id, &binding)?;
                        false
                    }
                    None => {
                        insert_twitch_binding(&tx, &binding)?;
                        true
                    }
                };

                tx.commit()?;
                Ok(inserted)
            })
            .await
    }
}

fn update_twitch_binding(
    conn: &rusqlite::Connection,
    id: i64,
    binding: &TwitchBinding,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE discord_twitch_live_annos
         SET twitch_username = ?1, twitch_user_id = ?2, anno_channel_id = ?3,
             anno_server_id = ?4, created_by = ?5
         WHERE id = ?6",
        params![
            binding.twitch_username,
            binding.twitch_user_id,
            binding.anno_channel_id,
            binding.anno_server_id,
            binding.created_by,
            id
        ],
    )
}

fn insert_twitch_binding(conn: &rusqlite::Connection, binding: &TwitchBinding) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO discord_twitch_live_annos
            (twitch_username, twitch_user_id, anno_channel_id, anno_server_id, type, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            binding.twitch_username,
            binding.twitch_user_id,
            binding.anno_channel_id,
            binding.anno_server_id,
            STREAMER_LIVE_ANNO_TYPE,
            binding.created_by
        ],
    )
}
