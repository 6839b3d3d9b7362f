//! Lifecycle state machine for a named container
//!
//! The controller walks a container name through these phases while it
//! drives the engine, and the test engine uses the same transition table to
//! decide which calls succeed.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Where a named container is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecyclePhase {
    /// No container with this name is known
    Absent,
    /// The image is present locally, no container yet
    ImageReady,
    Created,
    Running,
    Stopped,
    Removed,
}

/// Engine operations that move a container between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Pull,
    Create,
    Start,
    Stop,
    Remove,
}

impl LifecyclePhase {
    /// Apply `event`, returning the next phase or an invalid-transition error
    pub fn apply(self, event: LifecycleEvent) -> Result<Self> {
        use LifecycleEvent as E;
        use LifecyclePhase as P;

        let next = match (self, event) {
            (P::Absent | P::ImageReady | P::Removed, E::Pull) => P::ImageReady,
            // Pulling never touches an existing container
            (phase, E::Pull) => phase,
            (P::Absent | P::ImageReady | P::Removed, E::Create) => P::Created,
            (P::Created | P::Stopped | P::Running, E::Start) => P::Running,
            (P::Running, E::Stop) => P::Stopped,
            (P::Created | P::Running | P::Stopped, E::Remove) => P::Removed,
            (from, event) => return Err(CoreError::InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// Whether a container currently holds the name
    pub fn holds_name(self) -> bool {
        matches!(self, Self::Created | Self::Running | Self::Stopped)
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::ImageReady => write!(f, "image-ready"),
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pull => write!(f, "pull"),
            Self::Create => write!(f, "create"),
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::Remove => write!(f, "remove"),
        }
    }
}
