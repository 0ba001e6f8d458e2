pub mod config_store;
pub mod store_error;

pub use config_store::{BOT_ACTIVITY_ENABLED_KEY, ConfigStore};
pub use store_error::StoreError;
