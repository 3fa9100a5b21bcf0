use crate::core::{Message, MessageRelay, Result};
use crate::utils::error::BoardError;
use async_trait::async_trait;
use futures_util::SinkExt;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Forwards each stored message to the WebSocket server as one text frame.
#[derive(Debug, Clone)]
pub struct WsRelay {
    url: String,
    timeout: Duration,
}

impl WsRelay {
    /// `timeout` bounds the whole exchange: connect, send and close.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

fn relay_error(context: &str, e: impl std::fmt::Display) -> BoardError {
    BoardError::RelayError {
        message: format!("{}: {}", context, e),
    }
}

#[async_trait]
impl MessageRelay for WsRelay {
    async fn publish(&self, message: &Message) -> Result<()> {
        let payload = serde_json::to_string(message)?;

        let exchange = async {
            let (mut socket, _) = tokio_tungstenite::connect_async(self.url.as_str())
                .await
                .map_err(|e| relay_error(&self.url, e))?;

            socket
                .send(WsMessage::Text(payload))
                .await
                .map_err(|e| relay_error("send failed", e))?;
            // 對方可能已先關閉連線，關閉錯誤不影響結果
            if let Err(e) = socket.close(None).await {
                tracing::debug!("Relay close: {}", e);
            }
            Ok::<(), BoardError>(())
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| relay_error(&self.url, format!("timed out after {:?}", self.timeout)))??;

        tracing::debug!("Relayed message to {}", self.url);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRelay;

#[async_trait]
impl MessageRelay for DisabledRelay {
    async fn publish(&self, _message: &Message) -> Result<()> {
        Ok(())
    }
}
