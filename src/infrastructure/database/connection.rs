use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::domain::repositories::store_error::{self, StoreError};

/// Shared handle to the bot's SQLite database; runs the synchronous rusqlite calls on tokio's blocking pool.
#[derive(Clone)]
pub struct DatabaseManager {
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseManager {
    /// Opens (or creates) the database file and configures it for concurrent readers.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let connection = Connection::open(db_path)
            .with_context(|| format!("Failed to open SQLite database at {}", db_path.display()))?;

        connection
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
            .context("Failed to configure SQLite connection")?;

        Ok(Self::from_connection(connection))
    }

    /// Private in-memory database, used by tests and `DATABASE_URL=:memory:`.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to configure SQLite connection")?;

        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    /// Runs `operation` against the connection on a blocking thread.
    /// Any failure is tagged with the `name` of the store operation.
    pub async fn execute_blocking<F, T>(&self, name: &'static str, operation: F) -> store_error::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || {
            let conn = connection
                .lock()
                .map_err(|_| StoreError::storage(name, "database lock poisoned"))?;
            operation(&conn).map_err(|e| StoreError::storage(name, e))
        })
        .await
        .map_err(|e| StoreError::storage(name, format!("task join error: {}", e)))?
    }

    /// Creates any missing tables from the embedded schema.sql.
    pub async fn initialize_database(&self) -> Result<()> {
        let schema = include_str!("schema.sql");

        self.execute_blocking("initialize_database", move |connection| {
            let mut executed = 0;
            for statement in schema.split(';') {
                let trimmed = strip_comments(statement);
                if trimmed.is_empty() {
                    continue;
                }

                debug!("Executing schema statement: {}", first_line(&trimmed));
                connection.execute(&trimmed, [])?;
                executed += 1;
            }
            Ok(executed)
        })
        .await
        .map(|executed| info!("Database schema ready ({} statements)", executed))
        .context("Failed to initialize database schema")
    }
}

impl std::fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseManager").finish()
    }
}

fn strip_comments(statement: &str) -> String {
    statement
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn first_line(statement: &str) -> &str {
    statement.lines().next().unwrap_or(statement)
}
