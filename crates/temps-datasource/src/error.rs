use crate::meta::MetaError;
use crate::services::LookupError;
use temps_core::ContextError;
use temps_plugins::PluginError;
use thiserror::Error;

/// Errors surfaced by the querier and the connection projection.
///
/// Collaborator errors are wrapped transparently so callers see their
/// underlying messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasourceError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Meta(#[from] MetaError),

    #[error("Querier unavailable: {0}")]
    QuerierUnavailable(String),
}

impl DatasourceError {
    pub fn is_context(&self) -> bool {
        matches!(self, DatasourceError::Context(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatasourceError::Lookup(LookupError::NotFound { .. }))
    }
}

pub type Result<T> = std::result::Result<T, DatasourceError>;
