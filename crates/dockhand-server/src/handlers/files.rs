//! File service handlers

use crate::error::ApiError;
use crate::state::AppState;
use crate::stream;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use dockhand_core::{ComparisonResult, FileRecord, ProcessedResult};

pub async fn send(
    State(state): State<AppState>,
    Json(record): Json<FileRecord>,
) -> Result<Json<ProcessedResult>, ApiError> {
    Ok(Json(state.files.send_file(&record).await?))
}

pub async fn compare(
    State(state): State<AppState>,
    Json(record): Json<FileRecord>,
) -> Result<Json<ComparisonResult>, ApiError> {
    Ok(Json(state.files.compare_file(&record).await?))
}

pub async fn send_stream(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream::send_files(socket, state.files))
}

pub async fn compare_stream(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream::compare_files(socket, state.files))
}
