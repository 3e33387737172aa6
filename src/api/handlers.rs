//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CreateCardRequest, CreateCardResponse, DismissRequest, ErrorResponse, InputRequest,
    QueuedResponse, SuccessResponse,
};
use super::AppState;
use crate::runtime::{CardEvent, RuntimeError};
use crate::state_machine::{CardView, Event};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Card lifecycle
        .route("/api/cards", post(create_card))
        .route("/api/cards/:id", get(get_card).delete(delete_card))
        // SSE streaming
        .route("/api/cards/:id/stream", get(stream_card))
        // User gestures
        .route("/api/cards/:id/buttons/:index/press", post(press_button))
        .route("/api/cards/:id/input", put(set_input))
        .route("/api/cards/:id/back", post(navigate_back))
        .route("/api/cards/:id/forward", post(navigate_forward))
        .route(
            "/api/cards/:id/prompts/:index/continue",
            post(continue_prompt),
        )
        .route("/api/cards/:id/prompts/:index/dismiss", post(dismiss_prompt))
        .route("/api/cards/:id/error/dismiss", post(dismiss_error))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Card Lifecycle
// ============================================================

async fn create_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Json<CreateCardResponse>, AppError> {
    // Context URLs are resolved against this, so it must be absolute
    reqwest::Url::parse(&req.url)
        .map_err(|e| AppError::BadRequest(format!("Invalid frame URL '{}': {e}", req.url)))?;

    let (card_id, view) = state.runtime.create_card(req.frame, &req.url).await;
    Ok(Json(CreateCardResponse { card_id, view }))
}

async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardView>, AppError> {
    let view = state.runtime.view(&id).await?;
    Ok(Json(view))
}

async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.close_card(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (view, broadcast_rx) = state.runtime.subscribe(&id).await?;
    Ok(sse_stream(CardEvent::Init { view }, broadcast_rx))
}

// ============================================================
// User Gestures
// ============================================================

/// Hand a gesture to the card runtime. Rejections arrive on the stream.
async fn queue(state: &AppState, id: &str, event: Event) -> Result<Json<QueuedResponse>, AppError> {
    state.runtime.send_event(id, event).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn press_button(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, u8)>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, &id, Event::ButtonPressed { index }).await
}

async fn set_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InputRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, &id, Event::InputChanged { text: req.text }).await
}

async fn navigate_back(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, &id, Event::NavigateBack).await
}

async fn navigate_forward(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, &id, Event::NavigateForward).await
}

async fn continue_prompt(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, u8)>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, &id, Event::PromptContinue { index }).await
}

async fn dismiss_prompt(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, u8)>,
    Json(req): Json<DismissRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(
        &state,
        &id,
        Event::PromptDismiss {
            index,
            reason: req.reason,
        },
    )
    .await
}

async fn dismiss_error(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, &id, Event::DismissError).await
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("frame-inspector ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::CardNotFound(_) => AppError::NotFound(e.to_string()),
            RuntimeError::CardClosed(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
