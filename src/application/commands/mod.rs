pub mod announcement_channel;
pub mod config;
pub mod help;
pub mod twitch;
pub mod utils;

use crate::application::services::ConfigService;
use serenity::all::{CommandInteraction, CreateCommand};
use serenity::prelude::*;
use std::sync::Arc;
use tracing::warn;

/// Every slash command the bot registers in a guild.
pub fn register_commands() -> Vec<CreateCommand> {
    vec![
        config::register_set_config_command(),
        config::register_delete_config_command(),
        config::register_list_config_command(),
        announcement_channel::register_set_announcement_channel_command(),
        announcement_channel::register_delete_announcement_channel_command(),
        announcement_channel::register_list_announcement_channels_command(),
        twitch::register_set_twitch_command(),
        twitch::register_set_twitch_anno_content_command(),
        twitch::register_delete_twitch_command(),
        twitch::register_list_twitch_command(),
        help::register_help_command(),
    ]
}

/// Route a slash command to its handler.
pub async fn run_command(ctx: &Context, command: &CommandInteraction, service: &Arc<ConfigService>) {
    match command.data.name.as_str() {
        "set-config" => config::run_set_config(ctx, command, service).await,
        "delete-config" => config::run_delete_config(ctx, command, service).await,
        "list-config" => config::run_list_config(ctx, command, service).await,
        "set-announcement-channel" => {
            announcement_channel::run_set_announcement_channel(ctx, command, service).await
        }
        "delete-announcement-channel" => {
            announcement_channel::run_delete_announcement_channel(ctx, command, service).await
        }
        "list-announcement-channels" => {
            announcement_channel::run_list_announcement_channels(ctx, command, service).await
        }
        "set-twitch" => twitch::run_set_twitch(ctx, command, service).await,
        "set-twitch-anno-content" => {
            twitch::run_set_twitch_anno_content(ctx, command, service).await
        }
        "delete-twitch" => twitch::run_delete_twitch(ctx, command, service).await,
        "list-twitch" => twitch::run_list_twitch(ctx, command, service).await,
        "help" => help::run_help_command(ctx, command).await,
        other => warn!("Command not recognized: {}", other),
    }
}
