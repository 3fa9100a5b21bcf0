use crate::domain::model::{Message, MessageLog};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn load_all(&self) -> Result<MessageLog>;
    async fn append(&self, message: &Message) -> Result<()>;
}

#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn publish(&self, message: &Message) -> Result<()>;
}
