//! Container lifecycle controller
//!
//! Composes the engine primitives into the two composite operations the
//! service exposes, `start_named` (pull, create, start) and `stop_named`
//! (stop, forced remove), plus inspect and list passthroughs. Nothing is
//! cached between calls; the engine arbitrates concurrent calls for the
//! same name.

use crate::{CoreError, Result};
use dockhand_config::WorkloadProfile;
use dockhand_provider::{
    ContainerEngine, ContainerId, CreateContainerConfig, NetworkEndpoint, PortConfig,
    RemoveOptions, RestartPolicy,
};
use serde::{Deserialize, Serialize};

/// What to create for one `start_named` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSettings {
    pub image_name: String,
    /// Engine name and hostname of the container
    pub container_name: String,
    /// `KEY=VALUE` entries, in order
    pub env_vars: Vec<String>,
}

/// Engine-reported identity and state of a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHandle {
    pub id: String,
    pub status: String,
}

impl ContainerHandle {
    /// Handle with no ID and no status
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.status.is_empty()
    }
}

/// Drives a single named container through its lifecycle on the engine
pub struct ContainerController {
    engine: Box<dyn ContainerEngine>,
    profile: WorkloadProfile,
}

impl ContainerController {
    /// Create a controller applying `profile` to every container it creates
    pub fn new(engine: Box<dyn ContainerEngine>, profile: WorkloadProfile) -> Self {
        Self { engine, profile }
    }

    pub fn profile(&self) -> &WorkloadProfile {
        &self.profile
    }

    /// Settings for `container_name` using the profile's image and env
    pub fn settings_for(&self, container_name: &str) -> ContainerSettings {
        ContainerSettings {
            image_name: self.profile.image.clone(),
            container_name: container_name.to_string(),
            env_vars: self.profile.env.clone(),
        }
    }

    /// Pull, create and start a container, returning its engine ID
    pub async fn start_named(&self, settings: &ContainerSettings) -> Result<ContainerId> {
        validate_settings(settings)?;
        let name = settings.container_name.as_str();

        self.engine.pull(&settings.image_name).await?;
        tracing::debug!("Pulled {} for {}", settings.image_name, name);

        let config = self.create_config(settings)?;
        tracing::info!("Creating container {} from {}", name, settings.image_name);
        let id = self.engine.create(&config).await?;

        if let Err(e) = self.engine.start(id.as_ref()).await {
            if self.profile.remove_on_failed_start {
                self.discard_unstarted(name, &id).await;
            } else {
                tracing::warn!(
                    "Container {} ({}) was created but not started; it needs manual cleanup",
                    name,
                    id.short()
                );
            }
            return Err(e.into());
        }

        tracing::info!("Container {} started ({})", name, id.short());
        Ok(id)
    }

    /// Stop a container, then force-remove it together with its volumes
    pub async fn stop_named(&self, container_name: &str) -> Result<()> {
        tracing::info!("Stopping container {}...", container_name);

        self.engine.stop(container_name, None).await?;
        tracing::debug!("Container {} stopped, removing", container_name);

        self.engine
            .remove(
                container_name,
                RemoveOptions {
                    force: true,
                    volumes: true,
                },
            )
            .await?;

        tracing::info!("Successfully stopped container {}", container_name);
        Ok(())
    }

    /// Fetch the current ID and status of a container by ID or name
    pub async fn inspect(&self, target: &str) -> Result<ContainerHandle> {
        match self.engine.inspect(target).await {
            Ok(details) => Ok(ContainerHandle {
                id: details.id.0,
                status: details.state,
            }),
            Err(e) if e.is_not_found() => Err(CoreError::ContainerNotFound(target.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// IDs of the containers the engine reports as running
    pub async fn list_ids(&self) -> Result<Vec<String>> {
        let containers = self.engine.list(false).await?;
        Ok(containers.into_iter().map(|c| c.id.0).collect())
    }

    fn create_config(&self, settings: &ContainerSettings) -> Result<CreateContainerConfig> {
        let restart_policy: RestartPolicy = self
            .profile
            .restart_policy
            .parse()
            .map_err(CoreError::InvalidSettings)?;

        let ports = self
            .profile
            .ports
            .iter()
            .map(|p| PortConfig {
                host_port: Some(p.effective_host_port()),
                container_port: p.container_port,
                protocol: p.protocol.clone(),
                host_ip: Some(p.host_ip.clone()).filter(|ip| !ip.is_empty()),
            })
            .collect();

        let networks = if self.profile.network.name.is_empty() {
            Vec::new()
        } else {
            vec![NetworkEndpoint {
                network: self.profile.network.name.clone(),
                gateway: self.profile.network.gateway.clone(),
            }]
        };

        Ok(CreateContainerConfig {
            image: settings.image_name.clone(),
            name: Some(settings.container_name.clone()),
            cmd: if self.profile.command.is_empty() {
                None
            } else {
                Some(self.profile.command.clone())
            },
            env: settings.env_vars.clone(),
            ports,
            hostname: Some(settings.container_name.clone()),
            restart_policy,
            log_driver: Some(self.profile.log_driver.clone()).filter(|d| !d.is_empty()),
            networks,
        })
    }

    /// Best-effort removal of a container whose start failed
    async fn discard_unstarted(&self, name: &str, id: &ContainerId) {
        let options = RemoveOptions {
            force: true,
            volumes: true,
        };
        match self.engine.remove(id.as_ref(), options).await {
            Ok(()) => tracing::info!("Removed unstarted container {} ({})", name, id.short()),
            Err(e) => tracing::warn!(
                "Failed to remove unstarted container {} ({}): {}",
                name,
                id.short(),
                e
            ),
        }
    }
}

fn validate_settings(settings: &ContainerSettings) -> Result<()> {
    if settings.container_name.trim().is_empty() {
        return Err(CoreError::InvalidSettings(
            "container name must not be empty".to_string(),
        ));
    }
    if settings.image_name.trim().is_empty() {
        return Err(CoreError::InvalidSettings(
            "image name must not be empty".to_string(),
        ));
    }
    Ok(())
}
