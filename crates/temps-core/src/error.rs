//! Errors raised while resolving the per-request tenant and user context

use thiserror::Error;

/// Failure to resolve the caller's namespace or identity from a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("namespace is missing from the request context")]
    MissingNamespace,

    #[error("invalid namespace {namespace:?}: {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    #[error("expected valid orgId in namespace {namespace:?}")]
    MissingOrgId { namespace: String },

    #[error("a signed in user was not found in the request context")]
    MissingUser,
}

impl ContextError {
    pub fn invalid_namespace(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        ContextError::InvalidNamespace {
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }
}

pub type ContextResult<T> = std::result::Result<T, ContextError>;
