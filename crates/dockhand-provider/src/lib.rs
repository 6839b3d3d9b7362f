//! Container engine trait and implementations for dockhand
//!
//! This crate provides an abstraction over the container engine daemon with
//! the handful of primitives the lifecycle controller composes: pull,
//! create, start, stop, remove, inspect and list.

mod docker;
mod error;
mod types;

pub use docker::DockerEngine;
pub use error::*;
pub use types::*;

use async_trait::async_trait;

/// Trait for container engines (Docker or anything speaking its API)
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Pull an image from a registry, logging progress as it streams in
    async fn pull(&self, image: &str) -> Result<()>;

    /// Create a container from an image
    async fn create(&self, config: &CreateContainerConfig) -> Result<ContainerId>;

    /// Start a container by ID or name
    async fn start(&self, target: &str) -> Result<()>;

    /// Stop a container by ID or name; `None` uses the engine's default timeout
    async fn stop(&self, target: &str, timeout: Option<u32>) -> Result<()>;

    /// Remove a container by ID or name
    async fn remove(&self, target: &str, options: RemoveOptions) -> Result<()>;

    /// Get current information about a container by ID or name
    async fn inspect(&self, target: &str) -> Result<ContainerDetails>;

    /// List containers, only running ones unless `all` is set
    async fn list(&self, all: bool) -> Result<Vec<ContainerInfo>>;

    /// Get engine information
    fn info(&self) -> EngineInfo;
}

/// Create the engine described by the global config
pub async fn create_engine(
    config: &dockhand_config::GlobalConfig,
) -> Result<Box<dyn ContainerEngine>> {
    let socket = &config.engine.socket;
    match DockerEngine::new(socket, config.engine.timeout_secs).await {
        Ok(engine) => Ok(Box::new(engine)),
        Err(e) => {
            let socket_exists = std::path::Path::new(socket.trim_start_matches("unix://")).exists();
            Err(ProviderError::ConnectionError(format_connection_error(
                socket,
                socket_exists,
                &e,
            )))
        }
    }
}

/// Format a helpful connection error message with actionable instructions
fn format_connection_error(socket_path: &str, socket_exists: bool, underlying: &ProviderError) -> String {
    let is_url = socket_path.starts_with("http://")
        || socket_path.starts_with("https://")
        || socket_path.starts_with("tcp://");

    let mut msg = String::from("Cannot connect to Docker\n\n");

    if !is_url && !socket_exists {
        msg.push_str(&format!(
            "The Docker API socket was not found at:\n  {}\n\n",
            socket_path
        ));
        msg.push_str("To start Docker, run:\n");
        msg.push_str("  sudo systemctl enable --now docker\n");
    } else {
        msg.push_str(&format!(
            "The engine at {} is not responding.\n\n",
            socket_path
        ));
        msg.push_str(&format!("Underlying error: {}\n", underlying));
    }

    msg
}
