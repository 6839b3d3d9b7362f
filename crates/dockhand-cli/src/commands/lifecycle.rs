//! Lifecycle commands: start, stop, status, ps

use anyhow::Result;
use dockhand_config::GlobalConfig;
use dockhand_core::CoreError;

use super::connect;

/// Start a container under `name` with the configured workload
pub async fn start(config: &GlobalConfig, name: &str) -> Result<()> {
    let controller = connect(config).await?;
    let settings = controller.settings_for(name);

    println!("Starting '{}' from {}...", name, settings.image_name);
    let id = controller.start_named(&settings).await?;
    let handle = controller.inspect(id.as_ref()).await?;

    println!("Container '{}' {} ({})", name, handle.status, id.short());
    Ok(())
}

/// Stop a container and remove it
pub async fn stop(config: &GlobalConfig, name: &str) -> Result<()> {
    let controller = connect(config).await?;
    controller.stop_named(name).await?;
    println!("Container '{}' stopped and removed", name);
    Ok(())
}

pub async fn status(config: &GlobalConfig, name: &str) -> Result<()> {
    let controller = connect(config).await?;
    match controller.inspect(name).await {
        Ok(handle) => {
            println!("{:<14} {}", "ID", "STATUS");
            println!("{:<14} {}", short_id(&handle.id), handle.status);
        }
        Err(CoreError::ContainerNotFound(_)) => println!("Container '{}' not found", name),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub async fn ps(config: &GlobalConfig) -> Result<()> {
    let controller = connect(config).await?;
    let ids = controller.list_ids().await?;

    if ids.is_empty() {
        println!("No running containers");
        return Ok(());
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }
}
