use crate::application::commands::utils::{
    begin_admin_command, edit_reply, get_string_option,
};
use crate::application::services::ConfigService;
use crate::application::services::config_service::{MAX_CONFIG_KEY_LEN, MAX_CONFIG_VALUE_LEN};
use crate::domain::entities::BotConfig;
use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, Permissions,
};
use serenity::prelude::*;
use std::sync::Arc;

fn key_option() -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::String,
        "key",
        "Config key, e.g. bot_activity_enabled",
    )
    .required(true)
    .max_length(MAX_CONFIG_KEY_LEN as u16)
}

/// Register the /set-config command
pub fn register_set_config_command() -> CreateCommand {
    CreateCommand::new("set-config")
        .description("Set a bot setting for this server")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(key_option())
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "value", "New value")
                .required(true)
                .max_length(MAX_CONFIG_VALUE_LEN as u16),
        )
}

pub async fn run_set_config(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let options = &command.data.options;
    let (Some(key), Some(value)) = (
        get_string_option(options, "key"),
        get_string_option(options, "value"),
    ) else {
        edit_reply(ctx, command, "❌ Both `key` and `value` are required").await;
        return;
    };

    match service.set_config(&server_id, &key, &value).await {
        Ok(()) => {
            edit_reply(
                ctx,
                command,
                &format!("✅ `{}` is now set to `{}`", key.trim().to_lowercase(), value.trim()),
            )
            .await;
            service
                .record_activity(&format!("/set-config {}", key), &server_id, &command.user.name)
                .await;
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /delete-config command
pub fn register_delete_config_command() -> CreateCommand {
    CreateCommand::new("delete-config")
        .description("Clear a bot setting for this server")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(key_option())
}

pub async fn run_delete_config(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let Some(key) = get_string_option(&command.data.options, "key") else {
        edit_reply(ctx, command, "❌ `key` is required").await;
        return;
    };

    match service.delete_config(&server_id, &key).await {
        Ok(true) => {
            edit_reply(ctx, command, &format!("✅ `{}` was cleared", key)).await;
            service
                .record_activity(
                    &format!("/delete-config {}", key),
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Ok(false) => {
            edit_reply(ctx, command, &format!("ℹ️ `{}` is not set in this server", key)).await
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /list-config command
pub fn register_list_config_command() -> CreateCommand {
    CreateCommand::new("list-config")
        .description("Show the bot settings of this server")
        .default_member_permissions(Permissions::MANAGE_GUILD)
}

pub async fn run_list_config(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    match service.list_config(&server_id).await {
        Ok(configs) => {
            edit_reply(ctx, command, &format_config_list(&configs)).await;
            service
                .record_activity("/list-config", &server_id, &command.user.name)
                .await;
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

pub fn format_config_list(configs: &[BotConfig]) -> String {
    if configs.is_empty() {
        return "ℹ️ No settings configured for this server".to_string();
    }

    let mut content = String::from("⚙️ **Server settings:**\n");
    for config in configs {
        content.push_str(&format!("• `{}` = `{}`\n", config.key, config.value));
    }
    content
}
