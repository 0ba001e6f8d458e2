use crate::application::commands::utils::{
    begin_admin_command, edit_reply, get_channel_option,
};
use crate::application::services::ConfigService;
use crate::domain::entities::AnnouncementChannel;
use serenity::all::{
    ChannelType, CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
    Permissions,
};
use serenity::prelude::*;
use std::sync::Arc;

fn channel_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Channel, "channel", description)
        .required(true)
        .channel_types(vec![ChannelType::Text, ChannelType::News])
}

/// Register the /set-announcement-channel command
pub fn register_set_announcement_channel_command() -> CreateCommand {
    CreateCommand::new("set-announcement-channel")
        .description("Register a channel for bot announcements")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(channel_option("Channel to announce in"))
}

pub async fn run_set_announcement_channel(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let Some(channel_id) = get_channel_option(&command.data.options, "channel") else {
        edit_reply(ctx, command, "❌ Select a valid channel").await;
        return;
    };

    match service
        .register_announcement_channel(&server_id, &channel_id, &command.user.name)
        .await
    {
        Ok(true) => {
            edit_reply(
                ctx,
                command,
                &format!("✅ <#{}> is now an announcement channel", channel_id),
            )
            .await;
            service
                .record_activity(
                    &format!("/set-announcement-channel {}", channel_id),
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Ok(false) => {
            edit_reply(
                ctx,
                command,
                &format!("ℹ️ <#{}> is already an announcement channel", channel_id),
            )
            .await
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /delete-announcement-channel command
pub fn register_delete_announcement_channel_command() -> CreateCommand {
    CreateCommand::new("delete-announcement-channel")
        .description("Stop using a channel for bot announcements")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(channel_option("Channel to remove"))
}

pub async fn run_delete_announcement_channel(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let Some(channel_id) = get_channel_option(&command.data.options, "channel") else {
        edit_reply(ctx, command, "❌ Select a valid channel").await;
        return;
    };

    match service
        .unregister_announcement_channel(&server_id, &channel_id)
        .await
    {
        Ok(true) => {
            edit_reply(
                ctx,
                command,
                &format!("✅ <#{}> is no longer an announcement channel", channel_id),
            )
            .await;
            service
                .record_activity(
                    &format!("/delete-announcement-channel {}", channel_id),
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Ok(false) => {
            edit_reply(
                ctx,
                command,
                &format!("ℹ️ <#{}> is not an announcement channel", channel_id),
            )
            .await
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /list-announcement-channels command
pub fn register_list_announcement_channels_command() -> CreateCommand {
    CreateCommand::new("list-announcement-channels")
        .description("Show the announcement channels of this server")
        .default_member_permissions(Permissions::MANAGE_GUILD)
}

pub async fn run_list_announcement_channels(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    match service.list_announcement_channels(&server_id).await {
        Ok(channels) => {
            edit_reply(ctx, command, &format_channel_list(&channels)).await;
            service
                .record_activity(
                    "/list-announcement-channels",
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

pub fn format_channel_list(channels: &[AnnouncementChannel]) -> String {
    if channels.is_empty() {
        return "ℹ️ No announcement channels registered".to_string();
    }

    let mut content = String::from("📢 **Announcement channels:**\n");
    for channel in channels {
        content.push_str(&format!(
            "• <#{}> (added by {})\n",
            channel.channel_id, channel.created_by
        ));
    }
    content
}
