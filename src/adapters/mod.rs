// Adapters layer: concrete implementations for external systems (file storage, http, websocket).

pub mod http;
pub mod relay;
pub mod storage;
pub mod ws;
