use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementChannel {
    pub id: i64,
    pub channel_id: String,
    pub server_id: String,
    pub created_by: String,
}
