//! # temps-datasource
//!
//! Exposes configured data sources as namespaced `DataSourceConnection`
//! resources and routes query, health and resource calls to the plugin
//! runtime.
//!
//! - **convert**: pure projection of registry records into connections
//! - **Querier**: tenant-checked façade over the plugin client and the registry
//! - **QuerierProvider**: factory seam handing out queriers per plugin
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use temps_core::RequestContext;
//! use temps_datasource::{
//!     DefaultQuerierProvider, InMemoryDataSourceStore, Querier, QuerierProvider, ResourceInfo,
//! };
//! use temps_plugins::{PluginJson, PluginRegistry};
//!
//! # async fn example() -> temps_datasource::Result<()> {
//! let store = Arc::new(InMemoryDataSourceStore::new());
//! let provider = DefaultQuerierProvider::provide_default(
//!     Arc::new(PluginRegistry::new()),
//!     store.clone(),
//!     store,
//! );
//!
//! let ctx = RequestContext::new().with_namespace("org-7");
//! let querier = provider.querier(
//!     &ctx,
//!     &ResourceInfo::connections_for_plugin("prometheus"),
//!     &PluginJson::datasource("prometheus", "Prometheus"),
//! )?;
//! let list = querier.datasources(&ctx).await?;
//! assert!(list.items.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod error;
pub mod meta;
pub mod provider;
pub mod querier;
pub mod resource;
pub mod services;
pub mod store;

pub use convert::{as_connection, as_connection_list, Projection};
pub use error::{DatasourceError, Result};
pub use meta::{calculate_cluster_wide_uid, meta_accessor, MetaAccessor, MetaError};
pub use provider::{DefaultQuerierProvider, QuerierFactoryFunc, QuerierProvider};
pub use querier::{DefaultQuerier, Querier};
pub use resource::{
    DataSourceConnection, DataSourceConnectionList, ListMeta, ObjectMeta, Resource, ResourceInfo,
    TypeMeta,
};
pub use services::{
    DataSourceCache, DataSourceRecord, DataSourceService, GetDataSourcesByTypeQuery, LookupError,
};
pub use store::InMemoryDataSourceStore;
