//! Switchboard server library logic.
//!
//! The HTTP surface is small: a health check and the two session-lifecycle
//! endpoints. Everything else happens inside per-session pipeline tasks
//! serving the hosted speech model's tool calls.

pub mod api_sessions;
pub mod config;
pub mod conversation;
pub mod pipeline;
pub mod sessions;
pub mod tools;

use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use sessions::SessionRegistry;
use std::sync::Arc;
use switchboard_backend::BackendClient;
use switchboard_voice::{ModelConfig, RoomClient};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry of live sessions.
    pub registry: SessionRegistry,
    /// Room provider client.
    pub rooms: Arc<RoomClient>,
    /// Workflow backend client.
    pub backend: Arc<BackendClient>,
    /// Speech-model provider credentials, handed to each session's transport.
    pub model: ModelConfig,
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by the frontend
/// and monitoring to verify the service is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "switchboard",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // The browser frontend runs on the local dev ports.
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:3001"),
        ])
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/start-session", post(api_sessions::start_session_handler))
        .route("/end-session", post(api_sessions::end_session_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use switchboard_voice::RoomProviderConfig;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            registry: SessionRegistry::new(),
            rooms: Arc::new(RoomClient::new(
                RoomProviderConfig::new("test-key")
                    .with_base_url("http://127.0.0.1:1"),
            )),
            backend: Arc::new(BackendClient::new("http://127.0.0.1:1")),
            model: ModelConfig::new("test-key"),
        }
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let app = app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "switchboard");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn end_session_for_unknown_room_reports_success() {
        let app = app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/end-session")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"room_name":"never-started"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Session already ended");
    }

    #[tokio::test]
    async fn end_session_with_empty_room_name_is_a_bad_request() {
        let app = app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/end-session")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"room_name":"  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "room_name must not be empty");
    }
}
