use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::{Sink, SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Clone)]
struct Frame {
    origin: u64,
    text: String,
}

/// Shared by every WebSocket connection: the fan-out channel and a connection counter.
#[derive(Clone)]
pub struct WsState {
    feed: broadcast::Sender<Frame>,
    next_id: Arc<AtomicU64>,
}

impl WsState {
    pub fn new(capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(capacity.max(1));
        Self {
            feed,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn handle_text(&self, origin: u64, text: String) {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(data) => {
                tracing::info!("Received message: {}", data);
                // 發送者本身也訂閱了頻道，send 只在沒有接收者時失敗
                let _ = self.feed.send(Frame { origin, text });
            }
            Err(e) => {
                tracing::warn!("Ignoring non-JSON frame on connection {}: {}", origin, e);
            }
        }
    }
}

/// Accepts upgrades on any path.
pub fn build_ws_router(state: WsState) -> Router {
    Router::new()
        .route("/", get(ws_upgrade_handler))
        .fallback(ws_upgrade_handler)
        .with_state(state)
}

async fn ws_upgrade_handler(State(state): State<WsState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: WsState) {
    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    tracing::debug!("WebSocket connection {} opened", id);

    let (mut sink, mut stream) = socket.split();
    let mut feed = state.feed.subscribe();

    let forward = tokio::spawn(async move { forward_frames(id, &mut feed, &mut sink).await });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => state.handle_text(id, text),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("WebSocket connection {} errored: {}", id, e);
                break;
            }
        }
    }

    forward.abort();
    tracing::debug!("WebSocket connection {} closed", id);
}

/// Pushes other connections' frames to one client until the feed closes or
/// the client goes away. A slow client loses the oldest frames, not the connection.
async fn forward_frames<S>(id: u64, feed: &mut broadcast::Receiver<Frame>, sink: &mut S)
where
    S: Sink<Message> + Unpin,
{
    loop {
        match feed.recv().await {
            Ok(frame) if frame.origin == id => continue,
            Ok(frame) => {
                if sink.send(Message::Text(frame.text)).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Connection {} lagged, skipped {} frames", id, skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
