//! Core logic for dockhand
//!
//! This crate provides the container lifecycle controller, which drives a
//! single named container through pull, create, start, stop and remove on a
//! container engine, and the file synchronization engine, which compares
//! and replaces whole files on the local filesystem.

mod controller;
mod error;
mod lifecycle;
pub mod sync;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use controller::*;
pub use error::*;
pub use lifecycle::*;
pub use sync::{
    ComparisonResult, FileRecord, FileSync, ProcessedResult, RecordOutcome, ResultSink,
};

pub use dockhand_provider::{ContainerEngine, ContainerId, ProviderError};
