use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use glimpse::models::ask::{AskRequest, AskResponse};

use crate::error::ApiError;
use crate::state::AppState;

// Answer one message, optionally grounded in an attached image
async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
        _ => ApiError::MalformedRequest(rejection.body_text()),
    })?;

    let response = state.orchestrator.handle_ask(&request).await?;
    Ok(Json(response))
}

// Configure routes for this module
pub fn routes(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/ask",
            post(ask_handler).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}
