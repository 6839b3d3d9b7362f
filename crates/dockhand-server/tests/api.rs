//! Route tests driving the router in-process with a mock engine.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dockhand_config::WorkloadProfile;
use dockhand_core::test_support::{MockCall, MockEngine};
use dockhand_core::{ContainerController, FileSync, ProviderError};
use dockhand_server::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app(engine: MockEngine) -> Router {
    let controller = ContainerController::new(Box::new(engine), WorkloadProfile::default());
    router(AppState::new(controller, FileSync::default()))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn file_body(path: &std::path::Path, content: &str) -> Value {
    json!({
        "fileName": path.to_string_lossy(),
        "encodedContent": STANDARD.encode(content),
    })
}

#[tokio::test]
async fn test_health() {
    let app = app(MockEngine::new());
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_start_returns_id_and_status() {
    let engine = MockEngine::new();
    let calls = engine.calls.clone();
    let app = app(engine);

    let (status, body) = call(
        &app,
        "POST",
        "/v1/containers/start",
        Some(json!({"containerName": "homeassistant"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    let id = body["containerId"].as_str().unwrap();
    assert_eq!(id.len(), 64);
    assert!(calls
        .lock()
        .unwrap()
        .contains(&MockCall::Pull {
            image: "homeassistant/home-assistant".into()
        }));
}

#[tokio::test]
async fn test_start_stop_get_yields_empty_handle() {
    let app = app(MockEngine::new());
    let name = json!({"containerName": "c1"});

    let (status, _) = call(&app, "POST", "/v1/containers/start", Some(name.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "POST", "/v1/containers/stop", Some(name.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"containerId": "", "status": "stopped"}));

    let (status, body) = call(&app, "POST", "/v1/containers/get", Some(name)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"containerId": "", "status": ""}));
}

#[tokio::test]
async fn test_get_missing_container_is_empty_not_error() {
    let app = app(MockEngine::new());
    let (status, body) = call(
        &app,
        "POST",
        "/v1/containers/get",
        Some(json!({"containerName": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"containerId": "", "status": ""}));
}

#[tokio::test]
async fn test_get_running_container() {
    let app = app(MockEngine::new());
    let name = json!({"containerName": "c1"});
    let (_, started) = call(&app, "POST", "/v1/containers/start", Some(name.clone())).await;

    let (status, body) = call(&app, "POST", "/v1/containers/get", Some(name)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, started);
}

#[tokio::test]
async fn test_list_ids() {
    let app = app(MockEngine::new());
    let (_, started) = call(
        &app,
        "POST",
        "/v1/containers/start",
        Some(json!({"containerName": "c1"})),
    )
    .await;

    let (status, body) = call(&app, "GET", "/v1/containers", None).await;
    assert_eq!(status, StatusCode::OK);
    let id = started["containerId"].clone();
    assert_eq!(body["containerIds"], json!([id]));
}

#[tokio::test]
async fn test_stop_unknown_container_is_404() {
    let app = app(MockEngine::new());
    let (status, body) = call(
        &app,
        "POST",
        "/v1/containers/stop",
        Some(json!({"containerName": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_duplicate_start_is_conflict() {
    let app = app(MockEngine::new());
    let name = json!({"containerName": "c1"});
    call(&app, "POST", "/v1/containers/start", Some(name.clone())).await;

    let (status, _) = call(&app, "POST", "/v1/containers/start", Some(name)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_pull_failure_is_server_error() {
    let engine = MockEngine::new();
    engine.fail_next_pull(ProviderError::PullError("manifest unknown".into()));
    let app = app(engine);

    let (status, body) = call(
        &app,
        "POST",
        "/v1/containers/start",
        Some(json!({"containerName": "c1"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("manifest unknown"));
}

#[tokio::test]
async fn test_empty_container_name_is_bad_request() {
    let app = app(MockEngine::new());
    let (status, _) = call(
        &app,
        "POST",
        "/v1/containers/start",
        Some(json!({"containerName": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_twice_then_compare() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("configuration.yaml");
    let app = app(MockEngine::new());

    let (status, body) = call(&app, "POST", "/v1/files/send", Some(file_body(&path, "This is a test"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], true);
    assert_eq!(body["fileName"], &*path.to_string_lossy());
    assert_eq!(body["error"], "");

    let (_, body) = call(&app, "POST", "/v1/files/send", Some(file_body(&path, "This is a test"))).await;
    assert_eq!(body["processed"], false);

    let (status, body) = call(&app, "POST", "/v1/files/compare", Some(file_body(&path, "This is a test"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"isSame": true}));
}

#[tokio::test]
async fn test_compare_missing_file_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app(MockEngine::new());

    let (status, body) = call(
        &app,
        "POST",
        "/v1/files/compare",
        Some(file_body(&dir.path().join("nonexistent"), "This is a test")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_invalid_base64_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a");
    let app = app(MockEngine::new());
    let body = json!({
        "fileName": path.to_string_lossy(),
        "encodedContent": "Non base64 string",
    });

    let (status, _) = call(&app, "POST", "/v1/files/send", Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!path.exists());

    let (status, _) = call(&app, "POST", "/v1/files/compare", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_accepts_four_mib_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("large.db");
    let content = "x".repeat(4 * 1024 * 1024);
    let app = app(MockEngine::new());

    let (status, body) = call(&app, "POST", "/v1/files/send", Some(file_body(&path, &content))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], true);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), content.len() as u64);
}

#[tokio::test]
async fn test_send_rejects_body_over_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.db");
    let content = "x".repeat(dockhand_server::MAX_BODY_BYTES);
    let app = app(MockEngine::new());

    let (status, _) = call(&app, "POST", "/v1/files/send", Some(file_body(&path, &content))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!path.exists());
}
