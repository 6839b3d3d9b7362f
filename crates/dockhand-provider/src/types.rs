//! Common types for container engines

use serde::{Deserialize, Serialize};

/// Container ID wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        if self.0.len() > 12 {
            &self.0[..12]
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Restart policy applied by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    #[default]
    No,
    Always,
    UnlessStopped,
    OnFailure,
}

impl std::str::FromStr for RestartPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "no" => Ok(Self::No),
            "always" => Ok(Self::Always),
            "unless-stopped" => Ok(Self::UnlessStopped),
            "on-failure" => Ok(Self::OnFailure),
            _ => Err(format!("Unknown restart policy: {}", s)),
        }
    }
}

impl std::fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::No => write!(f, "no"),
            Self::Always => write!(f, "always"),
            Self::UnlessStopped => write!(f, "unless-stopped"),
            Self::OnFailure => write!(f, "on-failure"),
        }
    }
}

/// Configuration for creating a container
#[derive(Debug, Clone, Default)]
pub struct CreateContainerConfig {
    /// Image to use
    pub image: String,
    /// Container name
    pub name: Option<String>,
    /// Command to run
    pub cmd: Option<Vec<String>>,
    /// Environment variables as `KEY=VALUE`, order preserved
    pub env: Vec<String>,
    /// Port mappings
    pub ports: Vec<PortConfig>,
    /// Hostname
    pub hostname: Option<String>,
    /// Restart policy
    pub restart_policy: RestartPolicy,
    /// Log driver (e.g. json-file)
    pub log_driver: Option<String>,
    /// Network endpoints to attach at create time
    pub networks: Vec<NetworkEndpoint>,
}

/// Port configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    /// Host port (None for auto-assign)
    pub host_port: Option<u16>,
    /// Container port
    pub container_port: u16,
    /// Protocol (tcp/udp)
    pub protocol: String,
    /// Host IP to bind to
    pub host_ip: Option<String>,
}

impl PortConfig {
    /// Engine key for this port, e.g. `8123/tcp`
    pub fn key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

/// Network endpoint attached at create time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEndpoint {
    pub network: String,
    pub gateway: Option<String>,
}

/// Options for removing a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveOptions {
    /// Kill the container if it is still running
    pub force: bool,
    /// Remove anonymous volumes attached to the container
    pub volumes: bool,
}

/// Container entry returned by a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: ContainerId,
}

/// Current state of one container
#[derive(Debug, Clone)]
pub struct ContainerDetails {
    pub id: ContainerId,
    /// Raw status string reported by the engine, e.g. `running`
    pub state: String,
}

/// Engine information
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub name: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_short() {
        let id = ContainerId::new("0123456789abcdef0123");
        assert_eq!(id.short(), "0123456789ab");
        assert_eq!(ContainerId::new("abc").short(), "abc");
    }

    #[test]
    fn test_restart_policy_parse() {
        assert_eq!(
            "unless-stopped".parse::<RestartPolicy>().unwrap(),
            RestartPolicy::UnlessStopped
        );
        assert_eq!("".parse::<RestartPolicy>().unwrap(), RestartPolicy::No);
        assert!("sometimes".parse::<RestartPolicy>().is_err());
        assert_eq!(RestartPolicy::OnFailure.to_string(), "on-failure");
    }

    #[test]
    fn test_port_key() {
        let port = PortConfig {
            host_port: Some(8123),
            container_port: 8123,
            protocol: "tcp".to_string(),
            host_ip: Some("0.0.0.0".to_string()),
        };
        assert_eq!(port.key(), "8123/tcp");
    }
}
