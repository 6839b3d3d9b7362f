//! Service and configuration commands

use anyhow::{Context, Result};
use dockhand_config::GlobalConfig;
use dockhand_core::FileSync;
use dockhand_server::AppState;
use std::path::Path;

use super::{connect, load_config};

/// Run the service until Ctrl-C
pub async fn serve(config: &GlobalConfig, listen: Option<String>) -> Result<()> {
    let controller = connect(config).await?;
    let files = FileSync::new(config.files.mode);
    let addr = listen.unwrap_or_else(|| config.server.listen.clone());
    tracing::debug!("Synced files are written with mode {:o}", files.mode());

    let listener = dockhand_server::bind(&addr).await?;
    dockhand_server::serve(listener, AppState::new(controller, files), shutdown_signal())
        .await
        .context("Server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested, draining connections"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Show the effective configuration, or just its path
pub fn config(path: &Path, path_only: bool) -> Result<()> {
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(path)?;
    if path.exists() {
        println!("# Config file: {}\n", path.display());
    } else {
        println!("# Config file: {} (not created yet)", path.display());
        println!("# Default configuration:\n");
    }
    println!("{}", config.to_toml()?);
    Ok(())
}
