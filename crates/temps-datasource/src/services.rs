//! Contracts of the data source registry consumed by the querier

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use temps_core::{RequestContext, SignedInUser};
use thiserror::Error;

/// A configured data source as stored by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRecord {
    pub id: i64,
    pub org_id: i64,
    /// Stable identifier, also the connection name
    pub uid: String,
    pub name: String,
    /// Plugin type id serving this data source
    #[serde(rename = "type")]
    pub ds_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_default: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl DataSourceRecord {
    pub fn new(
        org_id: i64,
        uid: impl Into<String>,
        name: impl Into<String>,
        ds_type: impl Into<String>,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            org_id,
            uid: uid.into(),
            name: name.into(),
            ds_type: ds_type.into(),
            url: String::new(),
            is_default: false,
            created,
            updated,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDataSourcesByTypeQuery {
    pub org_id: i64,
    pub ds_type: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("data source not found: {uid}")]
    NotFound { uid: String },

    #[error("data source lookup failed: {0}")]
    Backend(String),
}

impl LookupError {
    pub fn not_found(uid: impl Into<String>) -> Self {
        LookupError::NotFound { uid: uid.into() }
    }
}

/// Lists data sources straight from the registry
#[async_trait]
pub trait DataSourceService: Send + Sync {
    /// Data sources of one plugin type within an organization, in registry order
    async fn get_data_sources_by_type(
        &self,
        ctx: &RequestContext,
        query: &GetDataSourcesByTypeQuery,
    ) -> Result<Vec<DataSourceRecord>, LookupError>;
}

/// Cached, permission-aware single data source lookup
#[async_trait]
pub trait DataSourceCache: Send + Sync {
    async fn get_datasource_by_uid(
        &self,
        ctx: &RequestContext,
        uid: &str,
        user: &SignedInUser,
        skip_cache: bool,
    ) -> Result<DataSourceRecord, LookupError>;
}
