//! Error types for dockhand-core

use crate::{LifecycleEvent, LifecyclePhase};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] dockhand_config::ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] dockhand_provider::ProviderError),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Invalid container settings: {0}")]
    InvalidSettings(String),

    #[error("Cannot {event} a container that is {from}")]
    InvalidTransition {
        from: LifecyclePhase,
        event: LifecycleEvent,
    },

    #[error("Invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Stream error: {0}")]
    Stream(String),
}

impl CoreError {
    /// Whether this error means the requested container or file does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ContainerNotFound(_) | Self::FileNotFound(_) => true,
            Self::Provider(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Map an I/O error on `path`, promoting `NotFound` to its own variant
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
