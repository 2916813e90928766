//! Session lifecycle HTTP handlers.

use crate::pipeline::run_session;
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Request body for `POST /start-session`.
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Owning user, when the frontend knows one.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response body for `POST /start-session`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub room_url: String,
    pub room_name: String,
    pub token: String,
}

/// Request body for `POST /end-session`.
#[derive(Debug, Deserialize)]
pub struct EndSessionRequest {
    pub room_name: String,
}

/// Response body for `POST /end-session`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub success: bool,
    pub message: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Handler for `POST /start-session`.
///
/// Provisions a room and a non-owner token, registers the session, then
/// launches the per-session pipeline as a detached task. If token minting
/// fails after the room exists, the orphaned room is deleted best-effort
/// before the error is surfaced.
pub async fn start_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let room = state
        .rooms
        .create_room()
        .await
        .map_err(|e| ApiError::InternalServerError(format!("failed to create room: {e}")))?;

    let token = match state.rooms.create_meeting_token(&room.name).await {
        Ok(token) => token,
        Err(e) => {
            if let Err(del) = state.rooms.delete_room(&room.name).await {
                warn!(room = %room.name, "failed to delete orphaned room: {del}");
            }
            return Err(ApiError::InternalServerError(format!(
                "failed to create token: {e}"
            )));
        }
    };

    info!(room = %room.name, user = ?payload.user_id, "starting session");

    // Register before spawning so `end-session` works from the moment this
    // handler returns. The pipeline task never registers; it only removes
    // the entry when it terminates.
    let cancel = CancellationToken::new();
    state
        .registry
        .register(&room.name, payload.user_id, cancel.clone());
    tokio::spawn(run_session(state.as_ref().clone(), room.clone(), cancel));

    Ok(Json(StartSessionResponse {
        room_url: room.url,
        room_name: room.name,
        token,
    }))
}

/// Handler for `POST /end-session`.
///
/// Idempotent: ending an unknown or already-ended session reports success.
pub async fn end_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<EndSessionRequest>,
) -> Result<Json<EndSessionResponse>, ApiError> {
    if payload.room_name.trim().is_empty() {
        return Err(ApiError::BadRequest("room_name must not be empty".into()));
    }

    let ended = state.registry.end(&payload.room_name);
    let message = if ended {
        info!(room = %payload.room_name, "session ended");
        "Session ended"
    } else {
        "Session already ended"
    };

    Ok(Json(EndSessionResponse {
        success: true,
        message: message.to_string(),
    }))
}
