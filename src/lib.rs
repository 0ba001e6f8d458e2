//! Discord bot that keeps per-server settings, announcement channels,
//! Twitch live-announcement bindings and an activity audit log in SQLite.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use domain::repositories::{ConfigStore, StoreError};
pub use infrastructure::database::DatabaseManager;
pub use infrastructure::repositories::SqliteConfigStore;
