//! WebSocket stream tests against a server bound to an ephemeral port.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dockhand_config::WorkloadProfile;
use dockhand_core::test_support::MockEngine;
use dockhand_core::{ContainerController, FileSync};
use dockhand_server::{bind, serve, AppState};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> SocketAddr {
    let listener = bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let controller = ContainerController::new(Box::new(MockEngine::new()), WorkloadProfile::default());
    let state = AppState::new(controller, FileSync::default());
    tokio::spawn(serve(listener, state, std::future::pending()));
    addr
}

async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{}{}", addr, path)).await.unwrap();
    ws
}

fn record(path: &Path, content: &str) -> Message {
    let body = json!({
        "fileName": path.to_string_lossy(),
        "encodedContent": STANDARD.encode(content),
    });
    Message::text(body.to_string())
}

/// Next JSON result frame, skipping control frames
async fn next_result(ws: &mut Client) -> Value {
    loop {
        match ws.next().await.unwrap().unwrap() {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("expected a result frame, got {:?}", other),
        }
    }
}

/// The close frame the server ends the stream with
async fn close_frame(ws: &mut Client) -> Option<CloseFrame> {
    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Close(frame)) => return frame,
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
    None
}

#[tokio::test]
async fn test_send_stream_one_result_per_record_in_order() {
    let dir = TempDir::new().unwrap();
    let addr = start_server().await;
    let mut ws = connect(addr, "/v1/files/send/stream").await;

    let paths: Vec<_> = (0..5).map(|i| dir.path().join(format!("f{}.yaml", i))).collect();
    for path in &paths {
        ws.send(record(path, "content")).await.unwrap();
    }
    // Same content again for the first file is skipped
    ws.send(record(&paths[0], "content")).await.unwrap();

    for path in &paths {
        let result = next_result(&mut ws).await;
        assert_eq!(result["processed"], true);
        assert_eq!(result["fileName"], &*path.to_string_lossy());
        assert_eq!(result["error"], "");
    }
    let skipped = next_result(&mut ws).await;
    assert_eq!(skipped, json!({"processed": false, "fileName": "", "error": ""}));

    ws.close(None).await.unwrap();
    for path in &paths {
        assert_eq!(std::fs::read_to_string(path).unwrap(), "content");
    }
}

#[tokio::test]
async fn test_compare_stream_results() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("configuration.yaml");
    std::fs::write(&path, "This is a test").unwrap();
    let addr = start_server().await;
    let mut ws = connect(addr, "/v1/files/compare/stream").await;

    ws.send(record(&path, "This is a test")).await.unwrap();
    ws.send(record(&path, "Something else")).await.unwrap();

    assert_eq!(next_result(&mut ws).await, json!({"isSame": true}));
    assert_eq!(next_result(&mut ws).await, json!({"isSame": false}));

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn test_send_stream_closes_with_error_on_bad_base64() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good");
    let bad = dir.path().join("bad");
    let addr = start_server().await;
    let mut ws = connect(addr, "/v1/files/send/stream").await;

    ws.send(record(&good, "ok")).await.unwrap();
    let invalid = json!({
        "fileName": bad.to_string_lossy(),
        "encodedContent": "Non base64 string",
    });
    ws.send(Message::text(invalid.to_string())).await.unwrap();

    assert_eq!(next_result(&mut ws).await["processed"], true);
    let frame = close_frame(&mut ws).await.expect("server should close the stream");
    assert_eq!(frame.code, CloseCode::Error);
    assert!(frame.reason.as_str().contains("base64"));
    assert!(!bad.exists());
}

#[tokio::test]
async fn test_compare_stream_closes_with_error_on_missing_file() {
    let dir = TempDir::new().unwrap();
    let addr = start_server().await;
    let mut ws = connect(addr, "/v1/files/compare/stream").await;

    ws.send(record(&dir.path().join("nonexistent"), "x")).await.unwrap();

    let frame = close_frame(&mut ws).await.expect("server should close the stream");
    assert_eq!(frame.code, CloseCode::Error);
    assert!(frame.reason.as_str().contains("not found"));
}

#[tokio::test]
async fn test_stream_rejects_malformed_record() {
    let addr = start_server().await;
    let mut ws = connect(addr, "/v1/files/send/stream").await;

    ws.send(Message::text("{not json")).await.unwrap();

    let frame = close_frame(&mut ws).await.expect("server should close the stream");
    assert_eq!(frame.code, CloseCode::Error);
    assert!(frame.reason.as_str().contains("invalid file record"));
}
