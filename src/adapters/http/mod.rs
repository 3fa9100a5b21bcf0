pub mod handlers;
pub mod pages;
pub mod request_tracing;

use crate::core::board::MessageBoard;
use axum::middleware::from_fn;
use axum::routing::{get, MethodRouter};
use axum::Router;
use pages::Pages;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub board: MessageBoard,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(board: MessageBoard, pages: Pages) -> Self {
        Self {
            board,
            pages: Arc::new(pages),
        }
    }
}

/// GET serves the page; POST on any path submits the form.
fn page_route<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    get(handler).post(handlers::submit_handler)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", page_route(handlers::index_handler))
        .route("/message.html", page_route(handlers::message_page_handler))
        .route("/success.html", page_route(handlers::success_page_handler))
        .route("/history.html", page_route(handlers::history_handler))
        .route("/static/*path", page_route(handlers::static_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .fallback(handlers::fallback_handler)
        .layer(from_fn(request_tracing::request_tracing_middleware))
        .with_state(state)
}
