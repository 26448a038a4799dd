//! Tenant namespace parsing and mapping
//!
//! Namespaces are the API-facing name of an organization:
//! - `default` is organization 1
//! - `org-<id>` is any other organization
//! - `stack-<id>` is a hosted stack, which always runs as organization 1

use crate::config::NamespaceSettings;
use crate::context::RequestContext;
use crate::error::{ContextError, ContextResult};
use serde::{Deserialize, Serialize};

const DEFAULT_NAMESPACE: &str = "default";
const ORG_PREFIX: &str = "org-";
const STACK_PREFIX: &str = "stack-";

/// Organization details decoded from a namespace string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Organization id, `-1` when the namespace does not name one
    pub org_id: i64,
    /// Stack id for `stack-` namespaces
    pub stack_id: Option<String>,
    /// The namespace value as received
    pub value: String,
}

/// Decode a namespace value.
///
/// Unknown shapes yield `org_id == -1` without an error; callers that need
/// an organization go through [`namespace_info_from`] with `required = true`.
pub fn parse_namespace(ns: &str) -> ContextResult<NamespaceInfo> {
    let mut info = NamespaceInfo {
        org_id: -1,
        stack_id: None,
        value: ns.to_string(),
    };

    if ns == DEFAULT_NAMESPACE {
        info.org_id = 1;
        return Ok(info);
    }

    if let Some(raw) = ns.strip_prefix(ORG_PREFIX) {
        let id: i64 = raw
            .parse()
            .map_err(|_| ContextError::invalid_namespace(ns, "invalid org id"))?;
        if id < 1 {
            return Err(ContextError::invalid_namespace(ns, "invalid org id"));
        }
        if id == 1 {
            return Err(ContextError::invalid_namespace(
                ns,
                "use default rather than org-1",
            ));
        }
        info.org_id = id;
        return Ok(info);
    }

    if let Some(raw) = ns.strip_prefix(STACK_PREFIX) {
        if raw.len() < 2 {
            return Err(ContextError::invalid_namespace(ns, "invalid stack id"));
        }
        info.stack_id = Some(raw.to_string());
        info.org_id = 1;
        return Ok(info);
    }

    Ok(info)
}

/// Resolve the namespace of a request.
///
/// With `required` set, a missing namespace or one without a valid
/// organization is an error.
pub fn namespace_info_from(ctx: &RequestContext, required: bool) -> ContextResult<NamespaceInfo> {
    let ns = ctx.namespace();
    if required && ns.is_empty() {
        return Err(ContextError::MissingNamespace);
    }

    let info = parse_namespace(ns)?;
    if required && info.org_id < 1 {
        return Err(ContextError::MissingOrgId {
            namespace: info.value,
        });
    }
    Ok(info)
}

/// Maps organization ids back to namespace values
#[derive(Debug, Clone, Default)]
pub struct NamespaceMapper {
    stack_id: Option<String>,
}

impl NamespaceMapper {
    pub fn new(settings: &NamespaceSettings) -> Self {
        Self {
            stack_id: settings.stack_id.clone().filter(|id| !id.is_empty()),
        }
    }

    pub fn namespace_for(&self, org_id: i64) -> String {
        if let Some(stack_id) = &self.stack_id {
            return format!("{}{}", STACK_PREFIX, stack_id);
        }
        if org_id == 1 {
            DEFAULT_NAMESPACE.to_string()
        } else {
            format!("{}{}", ORG_PREFIX, org_id)
        }
    }
}
