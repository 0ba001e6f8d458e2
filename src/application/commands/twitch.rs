use crate::application::commands::utils::{
    begin_admin_command, edit_reply, get_channel_option, get_string_option,
};
use crate::application::services::ConfigService;
use crate::application::services::config_service::MAX_ANNO_CONTENT_LEN;
use crate::domain::entities::TwitchLiveAnno;
use serenity::all::{
    ChannelType, CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
    Permissions,
};
use serenity::prelude::*;
use std::sync::Arc;

fn streamer_id_option() -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::String,
        "streamer-id",
        "Numeric Twitch user ID of the streamer",
    )
    .required(true)
    .max_length(20)
}

fn streamer_username_option() -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::String,
        "streamer-username",
        "Twitch username of the streamer",
    )
    .required(true)
    .min_length(4)
    .max_length(26)
}

/// Register the /set-twitch command
pub fn register_set_twitch_command() -> CreateCommand {
    CreateCommand::new("set-twitch")
        .description("Announce when a Twitch streamer goes live")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(streamer_id_option())
        .add_option(streamer_username_option())
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                "channel",
                "Channel for the live announcements",
            )
            .required(true)
            .channel_types(vec![ChannelType::Text, ChannelType::News]),
        )
}

pub async fn run_set_twitch(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let options = &command.data.options;
    let (Some(user_id), Some(username), Some(channel_id)) = (
        get_string_option(options, "streamer-id"),
        get_string_option(options, "streamer-username"),
        get_channel_option(options, "channel"),
    ) else {
        edit_reply(ctx, command, "❌ Streamer ID, username and channel are required").await;
        return;
    };

    match service
        .bind_twitch_streamer(
            &server_id,
            &channel_id,
            &user_id,
            &username,
            &command.user.name,
        )
        .await
    {
        Ok(created) => {
            let content = if created {
                format!(
                    "✅ Live announcements for **{}** will be posted in <#{}>",
                    username, channel_id
                )
            } else {
                format!(
                    "✅ **{}** was already set up, announcements now go to <#{}>",
                    username, channel_id
                )
            };
            edit_reply(ctx, command, &content).await;
            service
                .record_activity(
                    &format!("/set-twitch {}", username),
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /set-twitch-anno-content command
pub fn register_set_twitch_anno_content_command() -> CreateCommand {
    CreateCommand::new("set-twitch-anno-content")
        .description("Customize the live announcement text of a streamer")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(streamer_username_option())
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "content",
                "Announcement text; leave empty to restore the default",
            )
            .required(false)
            .max_length(MAX_ANNO_CONTENT_LEN as u16),
        )
}

pub async fn run_set_twitch_anno_content(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let options = &command.data.options;
    let Some(username) = get_string_option(options, "streamer-username") else {
        edit_reply(ctx, command, "❌ `streamer-username` is required").await;
        return;
    };
    let content = get_string_option(options, "content");

    match service
        .set_twitch_anno_content(&server_id, &username, content.as_deref())
        .await
    {
        Ok(true) => {
            edit_reply(
                ctx,
                command,
                &format!("✅ Announcement text for **{}** updated", username),
            )
            .await;
            service
                .record_activity(
                    &format!("/set-twitch-anno-content {}", username),
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Ok(false) => {
            edit_reply(
                ctx,
                command,
                &format!(
                    "ℹ️ **{}** has no live announcements here, add them with `/set-twitch`",
                    username
                ),
            )
            .await
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /delete-twitch command
pub fn register_delete_twitch_command() -> CreateCommand {
    CreateCommand::new("delete-twitch")
        .description("Stop announcing a Twitch streamer")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(streamer_id_option())
}

pub async fn run_delete_twitch(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    let Some(user_id) = get_string_option(&command.data.options, "streamer-id") else {
        edit_reply(ctx, command, "❌ `streamer-id` is required").await;
        return;
    };

    match service.unbind_twitch_streamer(&server_id, &user_id).await {
        Ok(true) => {
            edit_reply(ctx, command, "✅ Live announcements removed").await;
            service
                .record_activity(
                    &format!("/delete-twitch {}", user_id),
                    &server_id,
                    &command.user.name,
                )
                .await;
        }
        Ok(false) => {
            edit_reply(
                ctx,
                command,
                &format!("ℹ️ No live announcements set up for Twitch ID `{}`", user_id),
            )
            .await
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

/// Register the /list-twitch command
pub fn register_list_twitch_command() -> CreateCommand {
    CreateCommand::new("list-twitch")
        .description("Show the Twitch streamers announced in this server")
        .default_member_permissions(Permissions::MANAGE_GUILD)
}

pub async fn run_list_twitch(
    ctx: &Context,
    command: &CommandInteraction,
    service: &Arc<ConfigService>,
) {
    let Some(server_id) = begin_admin_command(ctx, command, service).await else {
        return;
    };

    match service.list_twitch_streamers(&server_id).await {
        Ok(streamers) => {
            edit_reply(ctx, command, &format_twitch_list(&streamers)).await;
            service
                .record_activity("/list-twitch", &server_id, &command.user.name)
                .await;
        }
        Err(error) => edit_reply(ctx, command, &format!("❌ {}", error)).await,
    }
}

pub fn format_twitch_list(streamers: &[TwitchLiveAnno]) -> String {
    if streamers.is_empty() {
        return "ℹ️ No Twitch streamers are announced in this server".to_string();
    }

    let mut content = String::from("🎥 **Twitch live announcements:**\n");
    for anno in streamers {
        content.push_str(&format!(
            "• **{}** (`{}`) → <#{}>",
            anno.twitch_username, anno.twitch_user_id, anno.anno_channel_id
        ));
        if anno.anno_content.is_some() {
            content.push_str(" · custom text");
        }
        if let Some(last) = anno.last_anno_date {
            content.push_str(&format!(" · last announced <t:{}:R>", last.timestamp()));
        }
        content.push('\n');
    }
    content
}
