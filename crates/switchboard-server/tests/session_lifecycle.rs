use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use switchboard_backend::BackendClient;
use switchboard_server::{app, sessions::SessionRegistry, AppState};
use switchboard_voice::{ModelConfig, RoomClient, RoomProviderConfig};
use tower::ServiceExt;

async fn serve_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn state_with_rooms(addr: SocketAddr) -> AppState {
    AppState {
        registry: SessionRegistry::new(),
        rooms: Arc::new(RoomClient::new(
            RoomProviderConfig::new("test-key").with_base_url(format!("http://{}", addr)),
        )),
        // No backend calls are made during session lifecycle.
        backend: Arc::new(BackendClient::new("http://127.0.0.1:1")),
        model: ModelConfig::new("model-key"),
    }
}

async fn post_json(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Polls until `check` passes or one second elapses.
async fn wait_for(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn start_session_provisions_room_and_registers_pipeline() {
    let provider = Router::new()
        .route(
            "/v1/rooms",
            post(|| async {
                Json(json!({ "url": "https://rooms.example/r-lifecycle", "name": "r-lifecycle" }))
            }),
        )
        .route(
            "/v1/meeting-tokens",
            post(|| async { Json(json!({ "token": "tok-lifecycle" })) }),
        );
    let state = state_with_rooms(serve_stub(provider).await);
    let registry = state.registry.clone();
    let router = app(state);

    let (status, body) = post_json(&router, "/start-session", r#"{"user_id":"user-1"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room_url"], "https://rooms.example/r-lifecycle");
    assert_eq!(body["room_name"], "r-lifecycle");
    assert_eq!(body["token"], "tok-lifecycle");

    // The handler registers the session before responding, so the entry is
    // visible as soon as the response is.
    let entry = registry.get("r-lifecycle").unwrap();
    assert_eq!(entry.user_id.as_deref(), Some("user-1"));

    // Ending the session cancels the pipeline; its guard clears the entry.
    let (status, body) = post_json(
        &router,
        "/end-session",
        r#"{"room_name":"r-lifecycle"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Session ended");
    assert!(wait_for(|| registry.is_empty()).await);

    // Idempotent: a second end is still success.
    let (status, body) = post_json(
        &router,
        "/end-session",
        r#"{"room_name":"r-lifecycle"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Session already ended");
}

#[tokio::test]
async fn end_racing_the_pipeline_startup_leaves_nothing_behind() {
    let provider = Router::new()
        .route(
            "/v1/rooms",
            post(|| async {
                Json(json!({ "url": "https://rooms.example/r-race", "name": "r-race" }))
            }),
        )
        .route(
            "/v1/meeting-tokens",
            post(|| async { Json(json!({ "token": "tok-race" })) }),
        );
    let state = state_with_rooms(serve_stub(provider).await);
    let registry = state.registry.clone();
    let router = app(state);

    let (status, _) = post_json(&router, "/start-session", "{}").await;
    assert_eq!(status, StatusCode::OK);

    // End immediately, before the spawned pipeline has had a chance to run.
    let (status, body) = post_json(&router, "/end-session", r#"{"room_name":"r-race"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Session ended");
    assert!(registry.is_empty());

    // The pipeline task must wind down without re-inserting the entry.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn room_creation_failure_is_a_500_with_detail() {
    let provider = Router::new().route(
        "/v1/rooms",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let state = state_with_rooms(serve_stub(provider).await);
    let registry = state.registry.clone();
    let router = app(state);

    let (status, body) = post_json(&router, "/start-session", "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("failed to create room"));
    assert!(error.contains("503"));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn token_failure_rolls_back_the_orphaned_room() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let counter = deleted.clone();
    let provider = Router::new()
        .route(
            "/v1/rooms",
            post(|| async {
                Json(json!({ "url": "https://rooms.example/r-orphan", "name": "r-orphan" }))
            }),
        )
        .route(
            "/v1/meeting-tokens",
            post(|| async { (StatusCode::FORBIDDEN, "token quota exceeded") }),
        )
        .route(
            "/v1/rooms/{name}",
            delete(move |axum::extract::Path(name): axum::extract::Path<String>| {
                let counter = counter.clone();
                async move {
                    assert_eq!(name, "r-orphan");
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "deleted": true }))
                }
            }),
        );
    let state = state_with_rooms(serve_stub(provider).await);
    let registry = state.registry.clone();
    let router = app(state);

    let (status, body) = post_json(&router, "/start-session", "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("failed to create token"));
    assert_eq!(deleted.load(Ordering::SeqCst), 1);
    assert!(registry.is_empty());
}
