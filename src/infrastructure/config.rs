use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::Level;

/// Settings read from the environment (and `.env`) once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub discord_token: String,
    pub log_level: Level,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        database_path_from_url(&database_url)?;

        let discord_token = required(&lookup, "DISCORD_TOKEN")?;

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => parse_log_level(&level)?,
            None => Level::INFO,
        };

        Ok(Self {
            database_url,
            discord_token,
            log_level,
        })
    }

    pub fn database_path(&self) -> Result<DatabasePath> {
        database_path_from_url(&self.database_url)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("discord_token", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabasePath {
    File(PathBuf),
    InMemory,
}

/// Accepts a plain path, `sqlite://path`, `sqlite:path` or `:memory:`.
pub fn database_path_from_url(url: &str) -> Result<DatabasePath> {
    let url = url.trim();
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if path.is_empty() {
        bail!("DATABASE_URL does not contain a database path");
    }
    if path.contains("://") {
        bail!("DATABASE_URL must point to a SQLite database, got '{}'", url);
    }
    if path == ":memory:" {
        return Ok(DatabasePath::InMemory);
    }

    Ok(DatabasePath::File(PathBuf::from(path)))
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    level
        .trim()
        .parse::<Level>()
        .with_context(|| format!("Invalid LOG_LEVEL '{}'", level))
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Expected {} in environment", name),
    }
}
