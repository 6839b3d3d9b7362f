//! Docker engine implementation using bollard

use crate::{
    ContainerDetails, ContainerEngine, ContainerId, ContainerInfo, CreateContainerConfig, EngineInfo, ProviderError, RemoveOptions, RestartPolicy, Result,
};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, NetworkingConfig,
    RemoveContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::service::{
    EndpointSettings, HostConfig, HostConfigLogConfig, PortBinding,
    RestartPolicy as EngineRestartPolicy, RestartPolicyNameEnum,
};
use bollard::Docker;
use futures::StreamExt;
use std::collections::HashMap;

/// Docker engine using bollard crate
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect to the Docker daemon and verify it answers
    pub async fn new(socket_path: &str, timeout_secs: u64) -> Result<Self> {
        let client = if socket_path.starts_with("http://")
            || socket_path.starts_with("https://")
            || socket_path.starts_with("tcp://")
        {
            Docker::connect_with_http(socket_path, timeout_secs, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        } else {
            let path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(path, timeout_secs, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        };

        client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self { client })
    }
}

fn restart_policy_name(policy: RestartPolicy) -> RestartPolicyNameEnum {
    match policy {
        RestartPolicy::No => RestartPolicyNameEnum::NO,
        RestartPolicy::Always => RestartPolicyNameEnum::ALWAYS,
        RestartPolicy::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
        RestartPolicy::OnFailure => RestartPolicyNameEnum::ON_FAILURE,
    }
}

/// Translate a create request into the bollard container config
fn build_container_config(config: &CreateContainerConfig) -> Config<String> {
    let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
    let mut exposed_ports: HashMap<String, HashMap<(), ()>> = HashMap::new();

    for port in &config.ports {
        let key = port.key();
        exposed_ports.insert(key.clone(), HashMap::new());

        let binding = PortBinding {
            host_ip: port.host_ip.clone(),
            host_port: port.host_port.map(|p| p.to_string()),
        };
        port_bindings.insert(key, Some(vec![binding]));
    }

    let host_config = HostConfig {
        port_bindings: if port_bindings.is_empty() {
            None
        } else {
            Some(port_bindings)
        },
        restart_policy: Some(EngineRestartPolicy {
            name: Some(restart_policy_name(config.restart_policy)),
            maximum_retry_count: None,
        }),
        log_config: config.log_driver.as_ref().map(|driver| HostConfigLogConfig {
            typ: Some(driver.clone()),
            config: Some(HashMap::new()),
        }),
        ..Default::default()
    };

    let networking_config = if config.networks.is_empty() {
        None
    } else {
        Some(NetworkingConfig {
            endpoints_config: config
                .networks
                .iter()
                .map(|n| {
                    (
                        n.network.clone(),
                        EndpointSettings {
                            gateway: n.gateway.clone(),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        })
    };

    Config {
        image: Some(config.image.clone()),
        cmd: config.cmd.clone(),
        env: if config.env.is_empty() {
            None
        } else {
            Some(config.env.clone())
        },
        hostname: config.hostname.clone(),
        exposed_ports: if exposed_ports.is_empty() {
            None
        } else {
            Some(exposed_ports)
        },
        host_config: Some(host_config),
        networking_config,
        ..Default::default()
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn pull(&self, image: &str) -> Result<()> {
        let options = CreateImageOptions {
            from_image: image,
            ..Default::default()
        };

        tracing::info!("Pulling image {}", image);
        let mut stream = self.client.create_image(Some(options), None, None);

        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(error) = info.error {
                        return Err(ProviderError::PullError(error));
                    }
                    match (info.status, info.progress) {
                        (Some(status), Some(progress)) => {
                            tracing::debug!("{}: {} {}", image, status, progress)
                        }
                        (Some(status), None) => tracing::debug!("{}: {}", image, status),
                        _ => {}
                    }
                }
                Err(e) => {
                    return Err(match ProviderError::from(e) {
                        ProviderError::ContainerNotFound(msg) => ProviderError::ImageNotFound(msg),
                        ProviderError::RuntimeError(msg) => ProviderError::PullError(msg),
                        other => other,
                    });
                }
            }
        }

        Ok(())
    }

    async fn create(&self, config: &CreateContainerConfig) -> Result<ContainerId> {
        let options = config.name.as_ref().map(|name| CreateContainerOptions {
            name: name.clone(),
            platform: None,
        });

        let response = self
            .client
            .create_container(options, build_container_config(config))
            .await?;

        for warning in &response.warnings {
            tracing::warn!("Engine warning creating {}: {}", config.image, warning);
        }

        Ok(ContainerId::new(response.id))
    }

    async fn start(&self, target: &str) -> Result<()> {
        self.client
            .start_container(target, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, target: &str, timeout: Option<u32>) -> Result<()> {
        let options = timeout.map(|t| StopContainerOptions { t: i64::from(t) });
        self.client.stop_container(target, options).await?;
        Ok(())
    }

    async fn remove(&self, target: &str, options: RemoveOptions) -> Result<()> {
        let options = RemoveContainerOptions {
            force: options.force,
            v: options.volumes,
            ..Default::default()
        };
        self.client.remove_container(target, Some(options)).await?;
        Ok(())
    }

    async fn inspect(&self, target: &str) -> Result<ContainerDetails> {
        let info = self.client.inspect_container(target, None).await?;

        let state = info
            .state
            .as_ref()
            .and_then(|s| s.status)
            .map(|s| format!("{:?}", s).to_lowercase())
            .unwrap_or_default();

        Ok(ContainerDetails {
            id: ContainerId::new(info.id.unwrap_or_else(|| target.to_string())),
            state,
        })
    }

    async fn list(&self, all: bool) -> Result<Vec<ContainerInfo>> {
        let options = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };

        let containers = self.client.list_containers(Some(options)).await?;

        Ok(containers
            .into_iter()
            .filter_map(|c| c.id)
            .map(|id| ContainerInfo {
                id: ContainerId::new(id),
            })
            .collect())
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            name: "docker".to_string(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}
