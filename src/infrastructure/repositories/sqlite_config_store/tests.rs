use chrono::{Duration, TimeZone, Utc};

use super::SqliteConfigStore;
use crate::domain::entities::{DISCORD_PLATFORM, STREAMER_LIVE_ANNO_TYPE};
use crate::domain::repositories::{BOT_ACTIVITY_ENABLED_KEY, ConfigStore};
use crate::infrastructure::database::DatabaseManager;

async fn test_store() -> SqliteConfigStore {
    let db = DatabaseManager::open_in_memory().expect("Failed to create test DB");
    db.initialize_database()
        .await
        .expect("Failed to initialize schema");
    SqliteConfigStore::new(db)
}

/// A store whose database has no tables, so every query fails.
fn broken_store() -> SqliteConfigStore {
    SqliteConfigStore::new(DatabaseManager::open_in_memory().expect("Failed to create test DB"))
}

async fn count_rows(store: &SqliteConfigStore, table: &'static str) -> i64 {
    store
        .db
        .execute_blocking("count_rows", move |conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_bot_config_set_and_get() {
    let store = test_store().await;
    assert!(store.get_bot_config("100", "prefix").await.unwrap().is_none());

    assert!(store.set_bot_config("100", "prefix", "!").await.unwrap());
    let config = store.get_bot_config("100", "prefix").await.unwrap().unwrap();
    assert_eq!(config.server_id, "100");
    assert_eq!(config.key, "prefix");
    assert_eq!(config.value, "!");

    assert!(store.set_bot_config("100", "prefix", "?").await.unwrap());
    let config = store.get_bot_config("100", "prefix").await.unwrap().unwrap();
    assert_eq!(config.value, "?");
    assert_eq!(count_rows(&store, "discord_bot_configs").await, 1);
}

#[tokio::test]
async fn test_bot_config_is_server_scoped() {
    let store = test_store().await;
    store.set_bot_config("100", "prefix", "!").await.unwrap();
    store.set_bot_config("200", "prefix", "$").await.unwrap();

    assert_eq!(
        store.get_bot_config("100", "prefix").await.unwrap().unwrap().value,
        "!"
    );
    assert_eq!(
        store.get_bot_config("200", "prefix").await.unwrap().unwrap().value,
        "$"
    );
    assert!(store.get_bot_config("300", "prefix").await.unwrap().is_none());
}

#[tokio::test]
async fn test_bot_config_delete_clears_value() {
    let store = test_store().await;
    assert!(!store.delete_bot_config("100", "welcome").await.unwrap());

    store.set_bot_config("100", "welcome", "1").await.unwrap();
    assert!(store.check_config("100", "welcome", "1").await);

    assert!(store.delete_bot_config("100", "welcome").await.unwrap());
    assert!(!store.check_config("100", "welcome", "1").await);

    let config = store.get_bot_config("100", "welcome").await.unwrap().unwrap();
    assert!(config.is_cleared());
    assert_eq!(count_rows(&store, "discord_bot_configs").await, 1);
}

#[tokio::test]
async fn test_bot_configs_listed_by_key() {
    let store = test_store().await;
    store.set_bot_config("100", "welcome", "1").await.unwrap();
    store.set_bot_config("100", "bot_activity_enabled", "0").await.unwrap();
    store.set_bot_config("200", "welcome", "0").await.unwrap();

    let keys: Vec<String> = store
        .get_bot_configs("100")
        .await
        .unwrap()
        .into_iter()
        .map(|config| config.key)
        .collect();
    assert_eq!(keys, vec!["bot_activity_enabled", "welcome"]);
}

#[tokio::test]
async fn test_check_config() {
    let store = test_store().await;
    assert!(!store.check_config("100", "welcome", "1").await);

    store.set_bot_config("100", "welcome", "0").await.unwrap();
    assert!(!store.check_config("100", "welcome", "1").await);
    assert!(store.check_config("100", "welcome", "0").await);
}

#[tokio::test]
async fn test_announcement_channel_registered_once() {
    let store = test_store().await;

    assert!(store
        .add_announcement_channel("555", "100", "moderator")
        .await
        .unwrap());
    assert!(!store
        .add_announcement_channel("555", "100", "other")
        .await
        .unwrap());
    assert_eq!(count_rows(&store, "discord_announcement_channels").await, 1);

    let channel = store
        .get_announcement_channel_by_channel_id("555")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(channel.server_id, "100");
    assert_eq!(channel.created_by, "moderator");

    let by_id = store
        .get_announcement_channel_by_id(channel.id)
        .await
        .unwrap();
    assert_eq!(by_id, Some(channel));
    assert!(store
        .get_announcement_channel_by_id(9999)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_announcement_channel_lists() {
    let store = test_store().await;
    store.add_announcement_channel("1", "100", "a").await.unwrap();
    store.add_announcement_channel("2", "200", "b").await.unwrap();
    store.add_announcement_channel("3", "100", "c").await.unwrap();

    let all: Vec<String> = store
        .get_announcement_channels()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.channel_id)
        .collect();
    assert_eq!(all, vec!["1", "2", "3"]);

    let scoped: Vec<String> = store
        .get_server_announcement_channels("100")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.channel_id)
        .collect();
    assert_eq!(scoped, vec!["1", "3"]);
}

#[tokio::test]
async fn test_announcement_channel_delete() {
    let store = test_store().await;
    assert!(!store.delete_announcement_channel("555").await.unwrap());

    store
        .add_announcement_channel("555", "100", "moderator")
        .await
        .unwrap();
    assert!(store.delete_announcement_channel("555").await.unwrap());
    assert!(store
        .get_announcement_channel_by_channel_id("555")
        .await
        .unwrap()
        .is_none());
    assert_eq!(count_rows(&store, "discord_announcement_channels").await, 0);

    // can be registered again after removal
    assert!(store
        .add_announcement_channel("555", "100", "moderator")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_twitch_live_anno_add_and_get() {
    let store = test_store().await;
    assert!(store
        .get_twitch_live_anno("1001", "100")
        .await
        .unwrap()
        .is_none());

    assert!(store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "moderator")
        .await
        .unwrap());

    let anno = store
        .get_twitch_live_anno("1001", "100")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(anno.twitch_username, "streamer");
    assert_eq!(anno.anno_channel_id, "555");
    assert_eq!(anno.anno_type, STREAMER_LIVE_ANNO_TYPE);
    assert!(anno.anno_content.is_none());
    assert!(anno.last_anno_date.is_none());

    let by_name = store
        .get_twitch_live_anno_by_username("streamer", "100")
        .await
        .unwrap();
    assert_eq!(by_name, Some(anno));

    // other servers do not see the binding
    assert!(store
        .get_twitch_live_anno("1001", "200")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_twitch_live_anno_readd_updates_and_returns_false() {
    let store = test_store().await;
    store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "moderator")
        .await
        .unwrap();
    store
        .update_twitch_streamer_anno_content("streamer", "100", Some("{user} is live!"))
        .await
        .unwrap();

    let added = store
        .add_twitch_live_anno("renamed", "1001", "777", "100", "admin")
        .await
        .unwrap();
    assert!(!added);
    assert_eq!(count_rows(&store, "discord_twitch_live_annos").await, 1);

    let anno = store
        .get_twitch_live_anno("1001", "100")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(anno.twitch_username, "renamed");
    assert_eq!(anno.anno_channel_id, "777");
    assert_eq!(anno.created_by, "admin");
    assert_eq!(anno.anno_content.as_deref(), Some("{user} is live!"));
}

#[tokio::test]
async fn test_twitch_live_anno_same_user_in_two_servers() {
    let store = test_store().await;
    assert!(store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "a")
        .await
        .unwrap());
    assert!(store
        .add_twitch_live_anno("streamer", "1001", "666", "200", "b")
        .await
        .unwrap());

    assert_eq!(store.get_twitch_live_annos("100").await.unwrap().len(), 1);
    assert_eq!(store.get_twitch_live_annos("200").await.unwrap().len(), 1);
    assert!(store.get_twitch_live_annos("300").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_twitch_anno_content() {
    let store = test_store().await;
    assert!(!store
        .update_twitch_streamer_anno_content("streamer", "100", Some("hello"))
        .await
        .unwrap());
    assert!(store
        .get_twitch_streamer_anno_content("streamer", "100")
        .await
        .unwrap()
        .is_none());

    store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "moderator")
        .await
        .unwrap();
    assert!(store
        .update_twitch_streamer_anno_content("streamer", "100", Some("hello"))
        .await
        .unwrap());
    assert_eq!(
        store
            .get_twitch_streamer_anno_content("streamer", "100")
            .await
            .unwrap()
            .as_deref(),
        Some("hello")
    );

    assert!(store
        .update_twitch_streamer_anno_content("streamer", "100", None)
        .await
        .unwrap());
    assert!(store
        .get_twitch_streamer_anno_content("streamer", "100")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_twitch_last_anno_date() {
    let store = test_store().await;
    let announced_at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();

    assert!(!store
        .update_twitch_streamer_last_anno_date("streamer", "100", announced_at)
        .await
        .unwrap());

    store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "moderator")
        .await
        .unwrap();
    assert!(store
        .get_twitch_streamer_last_anno_date("streamer", "100")
        .await
        .unwrap()
        .is_none());

    assert!(store
        .update_twitch_streamer_last_anno_date("streamer", "100", announced_at)
        .await
        .unwrap());
    let stored = store
        .get_twitch_streamer_last_anno_date("streamer", "100")
        .await
        .unwrap();
    assert_eq!(stored, Some(announced_at));

    let anno = store
        .get_twitch_live_anno("1001", "100")
        .await
        .unwrap()
        .unwrap();
    assert!(!anno.can_announce(announced_at + Duration::minutes(5), Duration::hours(1)));
}

#[tokio::test]
async fn test_twitch_live_anno_delete() {
    let store = test_store().await;
    assert!(!store.delete_twitch_live_anno("1001", "100").await.unwrap());

    store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "moderator")
        .await
        .unwrap();
    store
        .add_twitch_live_anno("streamer", "1001", "666", "200", "moderator")
        .await
        .unwrap();

    assert!(store.delete_twitch_live_anno("1001", "100").await.unwrap());
    assert!(store
        .get_twitch_live_anno("1001", "100")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .get_twitch_live_anno("1001", "200")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_create_bot_action_activity() {
    let store = test_store().await;
    store
        .create_bot_action_activity("twitch", "!so someone", "100", "viewer")
        .await
        .unwrap();

    let activities = store.get_bot_action_activities("100").await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].platform_type, "twitch");
    assert_eq!(activities[0].activity, "!so someone");
    assert_eq!(activities[0].server_id.as_deref(), Some("100"));
    assert_eq!(activities[0].author.as_deref(), Some("viewer"));
}

#[tokio::test]
async fn test_save_bot_command_activity_requires_flag() {
    let store = test_store().await;

    store
        .save_bot_command_activity("/set-config", "100", "moderator")
        .await;
    assert_eq!(count_rows(&store, "bot_action_activities").await, 0);

    store
        .set_bot_config("100", BOT_ACTIVITY_ENABLED_KEY, "0")
        .await
        .unwrap();
    store
        .save_bot_command_activity("/set-config", "100", "moderator")
        .await;
    assert_eq!(count_rows(&store, "bot_action_activities").await, 0);

    store
        .set_bot_config("100", BOT_ACTIVITY_ENABLED_KEY, "1")
        .await
        .unwrap();
    store
        .save_bot_command_activity("/set-config", "100", "moderator")
        .await;

    let activities = store.get_bot_action_activities("100").await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].platform_type, DISCORD_PLATFORM);
    assert_eq!(activities[0].activity, "/set-config");

    // the flag of one server does not enable logging for another
    store
        .save_bot_command_activity("/set-config", "200", "moderator")
        .await;
    assert!(store.get_bot_action_activities("200").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_bot_command_activity_swallows_write_errors() {
    let store = test_store().await;
    store
        .set_bot_config("100", BOT_ACTIVITY_ENABLED_KEY, "1")
        .await
        .unwrap();
    store
        .db
        .execute_blocking("drop_activities", |conn| {
            conn.execute("DROP TABLE bot_action_activities", [])
        })
        .await
        .unwrap();

    // must return normally even though the insert fails
    store
        .save_bot_command_activity("/set-config", "100", "moderator")
        .await;

    let err = store
        .create_bot_action_activity(DISCORD_PLATFORM, "/set-config", "100", "moderator")
        .await
        .unwrap_err();
    assert_eq!(err.operation(), "create_bot_action_activity");
}

#[tokio::test]
async fn test_storage_errors_are_tagged() {
    let store = broken_store();

    let err = store.get_bot_config("100", "prefix").await.unwrap_err();
    assert!(err.to_string().starts_with("(get_bot_config) "));

    let err = store
        .add_announcement_channel("555", "100", "moderator")
        .await
        .unwrap_err();
    assert_eq!(err.operation(), "add_announcement_channel");

    let err = store
        .get_twitch_streamer_anno_content("streamer", "100")
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("(get_twitch_streamer_anno_content) (get_twitch_live_anno_by_username) "));

    assert!(!store.check_config("100", "prefix", "!").await);
    store
        .save_bot_command_activity("/set-config", "100", "moderator")
        .await;
}

#[tokio::test]
async fn test_store_handles_are_shared() {
    let store = test_store().await;
    let clone = store.clone();

    clone.set_bot_config("100", "prefix", "!").await.unwrap();
    assert!(store.check_config("100", "prefix", "!").await);
}

#[tokio::test]
async fn test_last_anno_date_drops_sub_second_precision() {
    let store = test_store().await;
    store
        .add_twitch_live_anno("streamer", "1001", "555", "100", "moderator")
        .await
        .unwrap();

    let whole = Utc.with_ymd_and_hms(2026, 10, 19, 9, 51, 7).unwrap();
    let announced_at = whole + Duration::nanoseconds(464_009_705);
    store
        .update_twitch_streamer_last_anno_date("streamer", "100", announced_at)
        .await
        .unwrap();

    let stored = store
        .get_twitch_streamer_last_anno_date("streamer", "100")
        .await
        .unwrap();
    assert_eq!(stored, Some(whole));
}

#[tokio::test]
async fn test_schema_rejects_duplicate_natural_keys() {
    let store = test_store().await;

    let results: Vec<bool> = store
        .db
        .execute_blocking("duplicate_inserts", |conn| {
            let statements = [
                "INSERT INTO discord_bot_configs (server_id, config_key, config_value)
                 VALUES ('100', 'welcome', '1')",
                "INSERT INTO discord_announcement_channels (channel_id, server_id, created_by)
                 VALUES ('555', '100', 'moderator')",
                "INSERT INTO discord_twitch_live_annos
                    (twitch_username, twitch_user_id, anno_channel_id, anno_server_id, created_by)
                 VALUES ('streamer', '1001', '555', '100', 'moderator')",
            ];

            let mut rejected = Vec::new();
            for statement in statements {
                conn.execute(statement, [])?;
                let err = conn.execute(statement, []).unwrap_err();
                rejected.push(err.to_string().contains("UNIQUE constraint failed"));
            }
            Ok(rejected)
        })
        .await
        .unwrap();

    assert_eq!(results, vec![true, true, true]);
}

const CONCURRENT_WRITERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_set_bot_config_keeps_one_row() {
    for round in 0..20 {
        let store = test_store().await;
        let key = format!("key_{}", round);

        let handles: Vec<_> = (0..CONCURRENT_WRITERS)
            .map(|writer| {
                let store = store.clone();
                let key = key.clone();
                tokio::spawn(async move {
                    store
                        .set_bot_config("100", &key, &writer.to_string())
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(written) => {
                    assert!(written);
                    succeeded += 1;
                }
                Err(e) => {
                    #[cfg(feature = "atomic-upsert")]
                    panic!("atomic upsert failed: {}", e);
                    #[cfg(not(feature = "atomic-upsert"))]
                    assert!(
                        e.to_string()
                            .starts_with("(set_bot_config) UNIQUE constraint failed"),
                        "unexpected error: {}",
                        e
                    );
                }
            }
        }

        assert!(succeeded >= 1);
        #[cfg(feature = "atomic-upsert")]
        assert_eq!(succeeded, CONCURRENT_WRITERS);
        assert_eq!(count_rows(&store, "discord_bot_configs").await, 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_twitch_live_anno_keeps_one_row() {
    for round in 0..20 {
        let store = test_store().await;
        let user_id = format!("{}", 1000 + round);

        let handles: Vec<_> = (0..CONCURRENT_WRITERS)
            .map(|writer| {
                let store = store.clone();
                let user_id = user_id.clone();
                tokio::spawn(async move {
                    store
                        .add_twitch_live_anno(
                            "streamer",
                            &user_id,
                            &writer.to_string(),
                            "100",
                            "moderator",
                        )
                        .await
                })
            })
            .collect();

        let mut inserted = 0;
        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(created) => {
                    succeeded += 1;
                    if created {
                        inserted += 1;
                    }
                }
                Err(e) => {
                    #[cfg(feature = "atomic-upsert")]
                    panic!("atomic upsert failed: {}", e);
                    #[cfg(not(feature = "atomic-upsert"))]
                    assert!(
                        e.to_string()
                            .starts_with("(add_twitch_live_anno) UNIQUE constraint failed"),
                        "unexpected error: {}",
                        e
                    );
                }
            }
        }

        // only one caller can report the insert; the rest refreshed it or lost the race
        assert_eq!(inserted, 1);
        #[cfg(feature = "atomic-upsert")]
        assert_eq!(succeeded, CONCURRENT_WRITERS);
        #[cfg(not(feature = "atomic-upsert"))]
        assert!(succeeded >= 1);
        assert_eq!(count_rows(&store, "discord_twitch_live_annos").await, 1);
    }
}
