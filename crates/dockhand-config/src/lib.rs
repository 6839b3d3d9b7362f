//! Configuration parsing for dockhand
//!
//! This crate handles:
//! - Global configuration (`~/.config/dockhand/config.toml`)
//! - The workload profile applied to every container the service creates

mod error;
mod global;
mod workload;

pub use error::*;
pub use global::*;
pub use workload::*;
