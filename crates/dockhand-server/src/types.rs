//! Request and response bodies for the container service

use dockhand_core::ContainerHandle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRequest {
    pub container_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResponse {
    pub container_id: String,
    pub status: String,
}

impl ContainerResponse {
    /// Response for a container that was stopped and removed
    pub fn stopped() -> Self {
        Self {
            container_id: String::new(),
            status: "stopped".to_string(),
        }
    }
}

impl From<ContainerHandle> for ContainerResponse {
    fn from(handle: ContainerHandle) -> Self {
        Self {
            container_id: handle.id,
            status: handle.status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerList {
    pub container_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}
