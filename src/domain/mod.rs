pub mod entities;
pub mod repositories;

pub use entities::{AnnouncementChannel, BotActivity, BotConfig, TwitchLiveAnno};
pub use repositories::{ConfigStore, StoreError};
