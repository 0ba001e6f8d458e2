use serenity::all::{
    CommandInteraction, CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use serenity::prelude::*;
use tracing::warn;

pub fn register_help_command() -> CreateCommand {
    CreateCommand::new("help").description("Show available commands")
}

pub async fn run_help_command(ctx: &Context, command: &CommandInteraction) {
    let content = "\
**Available Commands:**\n\
`/set-config` - Set a bot setting (e.g. `bot_activity_enabled` = `1`)\n\
`/delete-config` - Clear a bot setting\n\
`/list-config` - Show this server's settings\n\
`/set-announcement-channel` - Register an announcement channel\n\
`/delete-announcement-channel` - Remove an announcement channel\n\
`/list-announcement-channels` - Show announcement channels\n\
`/set-twitch` - Announce a Twitch streamer going live\n\
`/set-twitch-anno-content` - Customize a streamer's announcement text\n\
`/delete-twitch` - Stop announcing a streamer\n\
`/list-twitch` - Show announced streamers\n\
`/help` - Show this help message";

    let builder = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::default()
            .content(content)
            .ephemeral(true),
    );

    if let Err(err) = command.create_response(&ctx.http, builder).await {
        warn!("Error executing /help: {:?}", err);
    }
}
