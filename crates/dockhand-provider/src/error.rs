//! Error types for container engines

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to connect to container engine: {0}")]
    ConnectionError(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Image pull failed: {0}")]
    PullError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Container engine error: {0}")]
    RuntimeError(String),

    #[error("Timeout waiting for operation")]
    Timeout,
}

impl ProviderError {
    /// Whether the engine reported the target as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ContainerNotFound(_))
    }
}

impl From<bollard::errors::Error> for ProviderError {
    fn from(err: bollard::errors::Error) -> Self {
        use bollard::errors::Error as BollardError;

        match err {
            BollardError::DockerResponseServerError {
                status_code: 404,
                message,
            } => Self::ContainerNotFound(message),
            BollardError::DockerResponseServerError {
                status_code: 409,
                message,
            } => Self::Conflict(message),
            BollardError::RequestTimeoutError => Self::Timeout,
            other => Self::RuntimeError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
