use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of plugin described by a plugin manifest
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Datasource,
    Panel,
    App,
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginType::Datasource => write!(f, "datasource"),
            PluginType::Panel => write!(f, "panel"),
            PluginType::App => write!(f, "app"),
        }
    }
}

/// Manifest of an installed plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginJson {
    /// Plugin type id, also the data source type (e.g. "prometheus")
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    /// Whether the plugin ships a backend component
    #[serde(default)]
    pub backend: bool,
    #[serde(default)]
    pub info_version: Option<String>,
}

impl PluginJson {
    pub fn datasource(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            plugin_type: PluginType::Datasource,
            backend: true,
            info_version: None,
        }
    }
}

/// Identity of the caller as seen by a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginUser {
    pub login: String,
    pub role: String,
}

/// Context handed to a plugin with every call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginContext {
    pub org_id: i64,
    /// Routing key: the plugin that should serve the request
    pub plugin_id: String,
    pub user: Option<PluginUser>,
    /// Data source instance the request targets, if any
    pub datasource_uid: Option<String>,
}

impl PluginContext {
    pub fn new(org_id: i64, plugin_id: impl Into<String>) -> Self {
        Self {
            org_id,
            plugin_id: plugin_id.into(),
            user: None,
            datasource_uid: None,
        }
    }

    pub fn with_datasource(mut self, uid: impl Into<String>) -> Self {
        self.datasource_uid = Some(uid.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// A single query inside a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuery {
    pub ref_id: String,
    #[serde(default)]
    pub query_type: String,
    #[serde(default)]
    pub max_data_points: i64,
    #[serde(default)]
    pub interval_ms: i64,
    pub time_range: Option<TimeRange>,
    /// Plugin specific query model
    #[serde(default)]
    pub json: serde_json::Value,
}

impl DataQuery {
    pub fn new(ref_id: impl Into<String>, json: serde_json::Value) -> Self {
        Self {
            ref_id: ref_id.into(),
            query_type: String::new(),
            max_data_points: 0,
            interval_ms: 0,
            time_range: None,
            json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDataRequest {
    pub plugin_context: PluginContext,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub queries: Vec<DataQuery>,
}

/// Result of one query, keyed by ref id in [`QueryDataResponse`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    /// Encoded data frames
    #[serde(default)]
    pub frames: Vec<serde_json::Value>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDataResponse {
    pub responses: HashMap<String, DataResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckHealthRequest {
    pub plugin_context: PluginContext,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Ok,
    Error,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Unknown => write!(f, "UNKNOWN"),
            HealthStatus::Ok => write!(f, "OK"),
            HealthStatus::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
    pub json_details: Option<serde_json::Value>,
}

impl CheckHealthResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
            json_details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
            json_details: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResourceRequest {
    pub plugin_context: PluginContext,
    /// Resource path relative to the plugin root
    pub path: String,
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub body: Bytes,
}

/// One chunk of a (possibly streamed) resource response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResourceResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub body: Bytes,
}

impl CallResourceResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }
}
