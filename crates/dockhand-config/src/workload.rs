//! Workload profile: image, environment and the network/port/restart policy
//! applied to every container the service creates.

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Restart policies understood by the engine
pub const RESTART_POLICIES: &[&str] = &["no", "always", "unless-stopped", "on-failure"];

/// Profile for the single workload class the service manages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadProfile {
    /// Image pulled and run by StartContainer
    pub image: String,
    /// Environment variables, `KEY=VALUE`, in order
    pub env: Vec<String>,
    /// Command override, engine default when empty
    pub command: Vec<String>,
    /// Published ports
    pub ports: Vec<PortMapping>,
    /// Engine restart policy
    pub restart_policy: String,
    /// Engine log driver
    pub log_driver: String,
    /// Network endpoint the container joins
    pub network: NetworkProfile,
    /// Force-remove a container that was created but failed to start
    pub remove_on_failed_start: bool,
}

impl Default for WorkloadProfile {
    fn default() -> Self {
        Self {
            image: "homeassistant/home-assistant".to_string(),
            env: vec!["TZ=America/Chicago".to_string()],
            command: Vec::new(),
            ports: vec![PortMapping::default()],
            restart_policy: "unless-stopped".to_string(),
            log_driver: "json-file".to_string(),
            network: NetworkProfile::default(),
            remove_on_failed_start: true,
        }
    }
}

/// A single container port published on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortMapping {
    pub container_port: u16,
    /// `tcp` or `udp`
    pub protocol: String,
    pub host_ip: String,
    /// Host port, same as `container_port` when unset
    pub host_port: Option<u16>,
}

impl Default for PortMapping {
    fn default() -> Self {
        Self {
            container_port: 8123,
            protocol: "tcp".to_string(),
            host_ip: "0.0.0.0".to_string(),
            host_port: None,
        }
    }
}

impl PortMapping {
    /// Host port this mapping binds
    pub fn effective_host_port(&self) -> u16 {
        self.host_port.unwrap_or(self.container_port)
    }
}

/// Network endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkProfile {
    /// Network name, e.g. `bridge`
    pub name: String,
    /// Gateway hint passed with the endpoint
    pub gateway: Option<String>,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            name: "bridge".to_string(),
            gateway: None,
        }
    }
}

impl WorkloadProfile {
    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(ConfigError::Invalid("workload.image must not be empty".into()));
        }
        if !RESTART_POLICIES.contains(&self.restart_policy.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "workload.restart_policy '{}' is not one of {}",
                self.restart_policy,
                RESTART_POLICIES.join(", ")
            )));
        }
        if let Some(bad) = self.env.iter().find(|e| !e.contains('=')) {
            return Err(ConfigError::Invalid(format!(
                "workload.env entry '{}' is not KEY=VALUE",
                bad
            )));
        }
        for port in &self.ports {
            if port.container_port == 0 || port.host_port == Some(0) {
                return Err(ConfigError::Invalid("workload.ports must not use port 0".into()));
            }
            if port.protocol != "tcp" && port.protocol != "udp" {
                return Err(ConfigError::Invalid(format!(
                    "workload.ports protocol '{}' must be tcp or udp",
                    port.protocol
                )));
            }
        }
        Ok(())
    }
}
