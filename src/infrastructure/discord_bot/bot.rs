use crate::application::commands::{register_commands, run_command};
use crate::application::services::ConfigService;
use crate::domain::repositories::ConfigStore;
use crate::infrastructure::config::{AppConfig, DatabasePath};
use crate::infrastructure::database::DatabaseManager;
use crate::infrastructure::repositories::SqliteConfigStore;

use anyhow::{Context as _, Result};
use serenity::model::{application::Interaction, gateway::Ready, id::GuildId};
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CommandHandler {
    pub service: Arc<ConfigService>,
}

#[serenity::async_trait]
impl EventHandler for CommandHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Bot ready as {}", ready.user.name);

        // register commands in each guild
        for guild_status in ready.guilds {
            let guild_id: GuildId = guild_status.id;

            for command in register_commands() {
                if let Err(e) = guild_id.create_command(&ctx.http, command).await {
                    warn!("Failed to register command in guild {}: {}", guild_id.get(), e);
                }
            }

            info!("Commands registered for guild {}", guild_id.get());
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Some(command) = interaction.command() {
            info!("Received command interaction: {}", command.data.name);
            run_command(&ctx, &command, &self.service).await;
        }
    }
}

/// Opens the database named by `DATABASE_URL` and creates missing tables.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn ConfigStore>> {
    let db = match config.database_path()? {
        DatabasePath::File(path) => DatabaseManager::new(path)?,
        DatabasePath::InMemory => {
            warn!("Using an in-memory database, nothing will be persisted");
            DatabaseManager::open_in_memory()?
        }
    };
    db.initialize_database().await?;

    Ok(Arc::new(SqliteConfigStore::new(db)))
}

pub async fn run_bot(config: AppConfig) -> Result<()> {
    let store = open_store(&config).await?;
    let handler = CommandHandler {
        service: Arc::new(ConfigService::new(store)),
    };

    let intents = GatewayIntents::GUILDS;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .context("Failed to create Discord client")?;

    client.start().await.context("Discord client stopped")?;
    Ok(())
}
