//! Paws Adapter Implementations
//!
//! Adapters for `paws-core` port traits:
//! - `http-api`: REST backend via `reqwest`
//! - `store_memory`: In-memory marketplace backend
//! - `labels_static`: Offline image-label source
//! - `observe-tracing`: Event sink via `tracing` crate

pub use paws_core as core;

#[cfg(feature = "http-api")]
pub mod http_api;

pub mod labels_static;
pub mod store_memory;

#[cfg(feature = "observe-tracing")]
pub mod observe;
