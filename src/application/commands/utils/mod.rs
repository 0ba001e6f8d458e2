pub mod get_string;
pub mod reply;

pub use get_string::{get_channel_option, get_string_option};
pub use reply::{begin_admin_command, edit_reply};
