use crate::application::services::ConfigService;
use serenity::all::{
    CommandInteraction, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, Permissions,
};
use serenity::prelude::*;
use tracing::warn;

/// Discord rejects message content above this many characters.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Defers an ephemeral reply and checks the caller may change server settings.
/// Returns the server ID, or `None` after telling the user why not.
pub async fn begin_admin_command(
    ctx: &Context,
    command: &CommandInteraction,
    service: &ConfigService,
) -> Option<String> {
    // defer response immediately to avoid timeout
    if let Err(e) = command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await
    {
        warn!("Failed to defer /{}: {}", command.data.name, e);
        return None;
    }

    let permissions = command.member.as_ref().and_then(|member| member.permissions);

    if !can_manage_server(permissions) {
        edit_reply(
            ctx,
            command,
            "❌ You need **Manage Server** permissions to use this command",
        )
        .await;
        return None;
    }

    match service.validate_guild_context(command.guild_id.map(|gid| gid.get())) {
        Ok(server_id) => Some(server_id),
        Err(error) => {
            edit_reply(ctx, command, &format!("❌ {}", error)).await;
            None
        }
    }
}

/// Settings commands need Manage Server; Administrator implies it.
pub fn can_manage_server(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|perms| perms.administrator() || perms.manage_guild())
}

pub async fn edit_reply(ctx: &Context, command: &CommandInteraction, content: &str) {
    let content = truncate_message(content);
    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await
    {
        warn!("Failed to reply to /{}: {}", command.data.name, e);
    }
}

/// Cuts `content` to fit a single Discord message.
pub fn truncate_message(content: &str) -> String {
    if content.chars().count() <= MAX_MESSAGE_LEN {
        return content.to_string();
    }
    let mut truncated: String = content.chars().take(MAX_MESSAGE_LEN - 1).collect();
    truncated.push('…');
    truncated
}
