//! Container service handlers

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{ContainerList, ContainerRequest, ContainerResponse};
use axum::extract::State;
use axum::Json;
use dockhand_core::CoreError;

/// Start a container with the configured workload under the requested name
pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<ContainerRequest>,
) -> Result<Json<ContainerResponse>, ApiError> {
    let settings = state.controller.settings_for(&req.container_name);
    let id = state.controller.start_named(&settings).await?;
    let handle = state.controller.inspect(id.as_ref()).await?;
    Ok(Json(handle.into()))
}

/// Stop and remove a container
pub async fn stop(
    State(state): State<AppState>,
    Json(req): Json<ContainerRequest>,
) -> Result<Json<ContainerResponse>, ApiError> {
    state.controller.stop_named(&req.container_name).await?;
    Ok(Json(ContainerResponse::stopped()))
}

/// Inspect a container; a missing container yields an empty response
pub async fn get(
    State(state): State<AppState>,
    Json(req): Json<ContainerRequest>,
) -> Result<Json<ContainerResponse>, ApiError> {
    match state.controller.inspect(&req.container_name).await {
        Ok(handle) => Ok(Json(handle.into())),
        Err(CoreError::ContainerNotFound(name)) => {
            tracing::debug!("Container {} not found, returning empty handle", name);
            Ok(Json(ContainerResponse::default()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ContainerList>, ApiError> {
    let container_ids = state.controller.list_ids().await?;
    Ok(Json(ContainerList { container_ids }))
}
