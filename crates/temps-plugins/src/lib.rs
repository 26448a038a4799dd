//! # temps-plugins
//!
//! Contract between the Temps data source API and the plugin runtime that
//! actually executes queries.
//!
//! ## Architecture
//!
//! - **PluginClient**: the three calls every plugin backend answers
//!   (`query_data`, `check_health`, `call_resource`)
//! - **CallResourceResponseSender**: sink for streamed resource responses
//! - **PluginRegistry**: a `PluginClient` that routes each call to the backend
//!   registered for `plugin_context.plugin_id` and honors request cancellation
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use temps_plugins::{PluginClient, PluginRegistry};
//!
//! # async fn example(prometheus: Arc<dyn PluginClient>) {
//! let registry = PluginRegistry::new();
//! registry.register("prometheus", prometheus).await;
//! assert!(registry.has_plugin("prometheus").await);
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{PluginError, Result};
pub use registry::PluginRegistry;
pub use traits::{CallResourceResponseSender, CollectingSender, PluginClient};
pub use types::{
    CallResourceRequest, CallResourceResponse, CheckHealthRequest, CheckHealthResult, DataQuery,
    DataResponse, HealthStatus, PluginContext, PluginJson, PluginType, PluginUser,
    QueryDataRequest, QueryDataResponse, TimeRange,
};
