use super::pages::{ERROR_PAGE, INDEX_PAGE, MESSAGE_PAGE, SUCCESS_PAGE};
use super::AppState;
use crate::core::form::{parse_form, INVALID_FORM_DATA};
use crate::utils::error::BoardError;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};

const HTML: &str = "text/html; charset=utf-8";

fn html(status: StatusCode, body: impl Into<axum::body::Body>) -> Response {
    (status, [(header::CONTENT_TYPE, HTML)], body.into()).into_response()
}

fn internal_error(e: BoardError) -> Response {
    tracing::error!(
        "Request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

pub(crate) async fn not_found(state: &AppState) -> Response {
    match state.pages.template(ERROR_PAGE).await {
        Ok(Some(page)) => html(StatusCode::NOT_FOUND, page),
        Ok(None) => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
        Err(e) => internal_error(e),
    }
}

async fn serve_page(state: &AppState, name: &str) -> Response {
    match state.pages.template(name).await {
        Ok(Some(page)) => html(StatusCode::OK, page),
        Ok(None) => not_found(state).await,
        Err(e) => internal_error(e),
    }
}

pub(crate) async fn index_handler(State(state): State<AppState>) -> Response {
    serve_page(&state, INDEX_PAGE).await
}

pub(crate) async fn message_page_handler(State(state): State<AppState>) -> Response {
    serve_page(&state, MESSAGE_PAGE).await
}

pub(crate) async fn success_page_handler(State(state): State<AppState>) -> Response {
    serve_page(&state, SUCCESS_PAGE).await
}

pub(crate) async fn history_handler(State(state): State<AppState>) -> Response {
    let entries = match state.board.history().await {
        Ok(entries) => entries,
        Err(e) => return internal_error(e),
    };
    match state.pages.render_history(&entries).await {
        Ok(Some(page)) => html(StatusCode::OK, page),
        Ok(None) => not_found(&state).await,
        Err(e) => internal_error(e),
    }
}

pub(crate) async fn static_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    match state.pages.static_asset(&path).await {
        Ok(Some((content_type, data))) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], data).into_response()
        }
        Ok(None) => not_found(&state).await,
        Err(e) => internal_error(e),
    }
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn submit_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let form = parse_form(&body);
    match state.board.submit(&form).await {
        Ok(_) => (StatusCode::FOUND, [(header::LOCATION, "/success.html")]).into_response(),
        Err(BoardError::ValidationError { .. }) => {
            (StatusCode::BAD_REQUEST, INVALID_FORM_DATA).into_response()
        }
        Err(e) => internal_error(e),
    }
}

pub(crate) async fn fallback_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::POST {
        submit_handler(State(state), body).await
    } else {
        not_found(&state).await
    }
}
