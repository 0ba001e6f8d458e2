pub mod announcement_channel;
pub mod bot_activity;
pub mod bot_config;
pub mod twitch_live_anno;

pub use announcement_channel::AnnouncementChannel;
pub use bot_activity::{BotActivity, DISCORD_PLATFORM};
pub use bot_config::BotConfig;
pub use twitch_live_anno::{STREAMER_LIVE_ANNO_TYPE, TwitchLiveAnno};
