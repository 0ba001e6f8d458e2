use serde::{Deserialize, Serialize};

/// A per-server configuration value. An empty `value` means the key was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    pub id: i64,
    pub server_id: String,
    pub key: String,
    pub value: String,
}

impl BotConfig {
    pub fn is_cleared(&self) -> bool {
        self.value.is_empty()
    }
}
