//! Global configuration for dockhand
//!
//! Located at `~/.config/dockhand/config.toml`, or wherever `DOCKHAND_CONFIG`
//! points.

use crate::{ConfigError, Result, WorkloadProfile};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "DOCKHAND_CONFIG";

/// Global dockhand configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub workload: WorkloadProfile,
    pub files: FilesConfig,
}

/// RPC listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the RPC front binds to
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Container engine connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine socket path or URL
    pub socket: String,
    /// Per-request timeout handed to the engine client, in seconds
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            socket: default_docker_socket(),
            timeout_secs: 120,
        }
    }
}

#[cfg(windows)]
fn default_docker_socket() -> String {
    "//./pipe/docker_engine".to_string()
}

#[cfg(not(windows))]
fn default_docker_socket() -> String {
    "/var/run/docker.sock".to_string()
}

/// Settings for files written by the sync service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Permission bits for files the service creates (unix only)
    pub mode: u32,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self { mode: 0o600 }
    }
}

impl GlobalConfig {
    /// Load global configuration from `DOCKHAND_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::effective_path()?)
    }

    /// Path `load` reads: `DOCKHAND_CONFIG` if set, else the default path
    pub fn effective_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::config_path(),
        }
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        tracing::debug!(
            "Loaded config from {:?}: image={}",
            path,
            config.workload.image
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = self.to_toml()?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "dockhand").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Reject configurations the service cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.server.listen.trim().is_empty() {
            return Err(ConfigError::Invalid("server.listen must not be empty".into()));
        }
        if self.engine.socket.trim().is_empty() {
            return Err(ConfigError::Invalid("engine.socket must not be empty".into()));
        }
        if self.files.mode > 0o7777 {
            return Err(ConfigError::Invalid(format!(
                "files.mode {:o} is not a permission mask",
                self.files.mode
            )));
        }
        self.workload.validate()
    }
}
