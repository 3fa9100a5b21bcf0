use crate::core::form::require_fields;
use crate::core::history::build_history;
use crate::core::{HistoryEntry, Message, MessageForm, MessageRelay, MessageStore, Result};
use crate::domain::model::TIMESTAMP_FORMAT;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

#[derive(Clone)]
pub struct MessageBoard {
    store: Arc<dyn MessageStore>,
    relay: Arc<dyn MessageRelay>,
}

impl MessageBoard {
    pub fn new(store: Arc<dyn MessageStore>, relay: Arc<dyn MessageRelay>) -> Self {
        Self { store, relay }
    }

    pub async fn submit(&self, form: &MessageForm) -> Result<Message> {
        self.submit_at(form, Local::now().naive_local()).await
    }

    /// 驗證 -> 儲存 -> 轉發。轉發失敗只記錄警告，訊息已經落地
    pub async fn submit_at(&self, form: &MessageForm, at: NaiveDateTime) -> Result<Message> {
        let (username, text) = require_fields(form)?;

        let message = Message {
            username: username.to_string(),
            message: text.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        };

        self.store.append(&message).await?;

        if let Err(e) = self.relay.publish(&message).await {
            tracing::warn!(
                "Relay failed for message at {}: {} ({})",
                message.timestamp,
                e,
                e.recovery_suggestion()
            );
        }

        Ok(message)
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let log = self.store.load_all().await?;
        tracing::info!("Loaded {} messages", log.len());
        let entries = build_history(&log);
        tracing::debug!("Messages: {:?}", entries);
        Ok(entries)
    }
}
