//! Test support utilities for dockhand-core
//!
//! Provides MockEngine, an in-memory container engine that follows the same
//! lifecycle state machine as the controller, so lifecycle operations can be
//! tested without a Docker daemon.

use crate::LifecyclePhase;
use crate::LifecycleEvent;
use async_trait::async_trait;
use dockhand_provider::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Pull { image: String },
    Create { image: String, name: String },
    Start { target: String },
    Stop { target: String },
    Remove { target: String, force: bool, volumes: bool },
    Inspect { target: String },
    List { all: bool },
}

#[derive(Debug, Clone)]
struct MockContainer {
    id: String,
    name: String,
    phase: LifecyclePhase,
}

/// In-memory container engine for tests
#[derive(Clone, Default)]
pub struct MockEngine {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Every config passed to `create`, in order
    pub created_configs: Arc<Mutex<Vec<CreateContainerConfig>>>,
    containers: Arc<Mutex<Vec<MockContainer>>>,
    images: Arc<Mutex<HashSet<String>>>,
    next_id: Arc<AtomicUsize>,
    pull_error: Arc<Mutex<Option<ProviderError>>>,
    create_error: Arc<Mutex<Option<ProviderError>>>,
    start_error: Arc<Mutex<Option<ProviderError>>>,
    stop_error: Arc<Mutex<Option<ProviderError>>>,
    remove_error: Arc<Mutex<Option<ProviderError>>>,
}

impl MockEngine {
    /// Create an empty engine where every call succeeds when the state allows it
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next pull fail with `err`
    pub fn fail_next_pull(&self, err: ProviderError) {
        *self.pull_error.lock().unwrap() = Some(err);
    }

    /// Make the next create fail with `err`
    pub fn fail_next_create(&self, err: ProviderError) {
        *self.create_error.lock().unwrap() = Some(err);
    }

    /// Make the next start fail with `err`
    pub fn fail_next_start(&self, err: ProviderError) {
        *self.start_error.lock().unwrap() = Some(err);
    }

    /// Make the next stop fail with `err`
    pub fn fail_next_stop(&self, err: ProviderError) {
        *self.stop_error.lock().unwrap() = Some(err);
    }

    /// Make the next remove fail with `err`
    pub fn fail_next_remove(&self, err: ProviderError) {
        *self.remove_error.lock().unwrap() = Some(err);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Current phase of the container holding `name`, if any
    pub fn phase_of(&self, name: &str) -> Option<LifecyclePhase> {
        self.containers
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.name == name)
            .map(|c| c.phase)
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Apply `event` to the live container matching `target` by name or ID prefix
    fn transition(&self, target: &str, event: LifecycleEvent, force: bool) -> Result<()> {
        let mut containers = self.containers.lock().unwrap();
        let container = containers
            .iter_mut()
            .find(|c| is_live_match(c, target))
            .ok_or_else(|| not_found(target))?;

        let current = container.phase;
        if event == LifecycleEvent::Remove && !force && current == LifecyclePhase::Running {
            return Err(ProviderError::Conflict(format!(
                "You cannot remove a running container {}",
                target
            )));
        }
        container.phase = current.apply(event).map_err(|_| {
            ProviderError::RuntimeError(format!(
                "cannot {} container {}: container is {}",
                event, target, current
            ))
        })?;
        Ok(())
    }
}

fn is_live_match(container: &MockContainer, target: &str) -> bool {
    container.phase.holds_name()
        && !target.is_empty()
        && (container.name == target || container.id.starts_with(target))
}

fn not_found(target: &str) -> ProviderError {
    ProviderError::ContainerNotFound(format!("No such container: {}", target))
}

fn engine_state(phase: LifecyclePhase) -> &'static str {
    match phase {
        LifecyclePhase::Created => "created",
        LifecyclePhase::Running => "running",
        LifecyclePhase::Stopped => "exited",
        _ => "",
    }
}

#[async_trait]
impl ContainerEngine for MockEngine {
    async fn pull(&self, image: &str) -> Result<()> {
        self.record(MockCall::Pull {
            image: image.to_string(),
        });
        if let Some(err) = self.pull_error.lock().unwrap().take() {
            return Err(err);
        }
        self.images.lock().unwrap().insert(image.to_string());
        Ok(())
    }

    async fn create(&self, config: &CreateContainerConfig) -> Result<ContainerId> {
        let name = config.name.clone().unwrap_or_default();
        self.record(MockCall::Create {
            image: config.image.clone(),
            name: name.clone(),
        });
        self.created_configs.lock().unwrap().push(config.clone());
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        if !self.images.lock().unwrap().contains(&config.image) {
            return Err(ProviderError::ImageNotFound(format!(
                "No such image: {}",
                config.image
            )));
        }

        let mut containers = self.containers.lock().unwrap();
        let previous = containers
            .iter()
            .rev()
            .find(|c| c.name == name)
            .map(|c| c.phase)
            .unwrap_or(LifecyclePhase::Absent);
        let phase = previous.apply(LifecycleEvent::Create).map_err(|_| {
            ProviderError::Conflict(format!(
                "Conflict. The container name \"/{}\" is already in use",
                name
            ))
        })?;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("{:064x}", n);
        containers.push(MockContainer {
            id: id.clone(),
            name,
            phase,
        });
        Ok(ContainerId::new(id))
    }

    async fn start(&self, target: &str) -> Result<()> {
        self.record(MockCall::Start {
            target: target.to_string(),
        });
        if let Some(err) = self.start_error.lock().unwrap().take() {
            return Err(err);
        }
        self.transition(target, LifecycleEvent::Start, false)
    }

    async fn stop(&self, target: &str, _timeout: Option<u32>) -> Result<()> {
        self.record(MockCall::Stop {
            target: target.to_string(),
        });
        if let Some(err) = self.stop_error.lock().unwrap().take() {
            return Err(err);
        }
        self.transition(target, LifecycleEvent::Stop, false)
    }

    async fn remove(&self, target: &str, options: RemoveOptions) -> Result<()> {
        self.record(MockCall::Remove {
            target: target.to_string(),
            force: options.force,
            volumes: options.volumes,
        });
        if let Some(err) = self.remove_error.lock().unwrap().take() {
            return Err(err);
        }
        self.transition(target, LifecycleEvent::Remove, options.force)
    }

    async fn inspect(&self, target: &str) -> Result<ContainerDetails> {
        self.record(MockCall::Inspect {
            target: target.to_string(),
        });
        let containers = self.containers.lock().unwrap();
        let container = containers
            .iter()
            .find(|c| is_live_match(c, target))
            .ok_or_else(|| not_found(target))?;

        Ok(ContainerDetails {
            id: ContainerId::new(container.id.clone()),
            state: engine_state(container.phase).to_string(),
        })
    }

    async fn list(&self, all: bool) -> Result<Vec<ContainerInfo>> {
        self.record(MockCall::List { all });
        let containers = self.containers.lock().unwrap();
        Ok(containers
            .iter()
            .filter(|c| c.phase.holds_name() && (all || c.phase == LifecyclePhase::Running))
            .map(|c| ContainerInfo {
                id: ContainerId::new(c.id.clone()),
            })
            .collect())
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            name: "mock".to_string(),
            api_version: "mock".to_string(),
            os: "test".to_string(),
            arch: "test".to_string(),
        }
    }
}

/// Seed `engine` with a running container named `name`, as if started earlier
pub async fn seed_running(engine: &MockEngine, image: &str, name: &str) -> ContainerId {
    engine.images.lock().unwrap().insert(image.to_string());
    let id = engine
        .create(&CreateContainerConfig {
            image: image.to_string(),
            name: Some(name.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    engine.start(id.as_ref()).await.unwrap();
    engine.calls.lock().unwrap().clear();
    engine.created_configs.lock().unwrap().clear();
    id
}
