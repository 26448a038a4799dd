use thiserror::Error;

/// Unified error type for all plugin backend calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// No backend is registered for the requested plugin id
    #[error("Plugin not registered: {0}")]
    PluginNotRegistered(String),

    /// Query execution failed inside the plugin
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Health check could not be executed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Resource call failed
    #[error("Resource call failed: {0}")]
    ResourceFailed(String),

    /// The receiving side of a resource response stream went away
    #[error("Response sender closed")]
    SenderClosed,

    /// The request was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// The request deadline passed before the plugin answered
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Generic backend error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl PluginError {
    pub fn not_registered(plugin_id: impl Into<String>) -> Self {
        PluginError::PluginNotRegistered(plugin_id.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        PluginError::Backend(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;
