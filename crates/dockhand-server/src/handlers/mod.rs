//! Route handlers

pub mod container;
pub mod files;

use crate::types::Health;
use axum::Json;

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
