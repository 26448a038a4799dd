//! Per-request context threaded explicitly through every data source call
//!
//! A `RequestContext` carries what the API layer learned about the caller:
//! - the tenant namespace the request targets (`default`, `org-7`, `stack-abc`)
//! - the signed in user acting on the request
//! - a cancellation token and an optional deadline inherited by downstream calls
//!
//! Nothing here is cached on long-lived services; each call receives its own context.

use crate::error::{ContextError, ContextResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Role of a user within its organization
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Viewer,
    Editor,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Viewer => write!(f, "viewer"),
            UserRole::Editor => write!(f, "editor"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// The identity acting on a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub user_id: i64,
    pub login: String,
    pub org_id: i64,
    pub org_role: UserRole,
    pub is_service_account: bool,
}

impl SignedInUser {
    pub fn new(user_id: i64, login: impl Into<String>, org_id: i64, org_role: UserRole) -> Self {
        Self {
            user_id,
            login: login.into(),
            org_id,
            org_role,
            is_service_account: false,
        }
    }

    pub fn service_account(user_id: i64, login: impl Into<String>, org_id: i64) -> Self {
        Self {
            user_id,
            login: login.into(),
            org_id,
            org_role: UserRole::Viewer,
            is_service_account: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    namespace: Option<String>,
    user: Option<SignedInUser>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            namespace: None,
            user: None,
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_user(mut self, user: SignedInUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Raw namespace value, empty when the request did not target one
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }

    /// Resolve the acting user
    pub fn user(&self) -> ContextResult<&SignedInUser> {
        self.user.as_ref().ok_or(ContextError::MissingUser)
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Derive a context for a nested operation; cancelling the parent cancels the child
    pub fn child(&self) -> Self {
        Self {
            request_id: self.request_id,
            namespace: self.namespace.clone(),
            user: self.user.clone(),
            cancellation: self.cancellation.child_token(),
            deadline: self.deadline,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
