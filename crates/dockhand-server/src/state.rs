//! Shared state handed to every handler

use dockhand_core::{ContainerController, FileSync};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ContainerController>,
    pub files: Arc<FileSync>,
}

impl AppState {
    pub fn new(controller: ContainerController, files: FileSync) -> Self {
        Self {
            controller: Arc::new(controller),
            files: Arc::new(files),
        }
    }
}
