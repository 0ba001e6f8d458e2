pub mod bot;

pub use bot::{open_store, run_bot};
