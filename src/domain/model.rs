use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 儲存與顯示用的時間戳格式（微秒精度，字典序即時間序）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Message as relayed over the WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub username: String,
    pub message: String,
}

/// Timestamp -> message, the shape of the data file.
pub type MessageLog = BTreeMap<String, StoredMessage>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageForm {
    pub username: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub time: String,
    pub timestamp: String,
    pub username: String,
    pub message: String,
}

impl Message {
    pub fn stored(&self) -> StoredMessage {
        StoredMessage {
            username: self.username.clone(),
            message: self.message.clone(),
        }
    }
}
