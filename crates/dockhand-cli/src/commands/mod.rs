//! CLI command implementations

mod files;
mod lifecycle;
mod manage;

use anyhow::{Context, Result};
use dockhand_config::GlobalConfig;
use dockhand_core::ContainerController;
use std::path::Path;

pub use files::*;
pub use lifecycle::*;
pub use manage::*;

/// Load and validate the config file at `path`; a missing file means defaults
pub fn load_config(path: &Path) -> Result<GlobalConfig> {
    GlobalConfig::load_from(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Connect to the engine and build a controller for the configured workload
async fn connect(config: &GlobalConfig) -> Result<ContainerController> {
    let engine = dockhand_provider::create_engine(config).await?;
    let info = engine.info();
    tracing::debug!(
        "Connected to {} (API {}, {}/{})",
        info.name,
        info.api_version,
        info.os,
        info.arch
    );
    Ok(ContainerController::new(engine, config.workload.clone()))
}
