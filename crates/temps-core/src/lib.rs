//! Core utilities and types shared across the Temps data source crates

pub mod config;
pub mod context;
pub mod error;
pub mod namespace;
pub mod telemetry;

// Re-export commonly used types
pub use config::*;
pub use context::{RequestContext, SignedInUser, UserRole};
pub use error::{ContextError, ContextResult};
pub use namespace::{namespace_info_from, parse_namespace, NamespaceInfo, NamespaceMapper};

// Re-export external dependencies
pub use anyhow;
pub use chrono;
pub use thiserror;
pub use tokio_util;
pub use tracing;
pub use uuid;
