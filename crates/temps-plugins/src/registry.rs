use crate::error::{PluginError, Result};
use crate::traits::{CallResourceResponseSender, PluginClient};
use crate::types::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use temps_core::RequestContext;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Registry of plugin backends, routing calls by `plugin_context.plugin_id`
///
/// The registry is itself a [`PluginClient`], so it can be handed to
/// anything that expects the plugin runtime.
pub struct PluginRegistry {
    backends: Arc<RwLock<HashMap<String, Arc<dyn PluginClient>>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            backends: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a backend for a plugin id
    pub async fn register(&self, plugin_id: impl Into<String>, backend: Arc<dyn PluginClient>) {
        let plugin_id = plugin_id.into();
        let mut backends = self.backends.write().await;

        if backends.contains_key(&plugin_id) {
            warn!("Overwriting existing backend for plugin: {}", plugin_id);
        }

        debug!("Registered backend for plugin: {}", plugin_id);
        backends.insert(plugin_id, backend);
    }

    /// Remove a backend, returning whether one was registered
    pub async fn unregister(&self, plugin_id: &str) -> bool {
        let mut backends = self.backends.write().await;
        backends.remove(plugin_id).is_some()
    }

    /// List registered plugin ids
    pub async fn list_plugins(&self) -> Vec<String> {
        let backends = self.backends.read().await;
        let mut ids: Vec<String> = backends.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn has_plugin(&self, plugin_id: &str) -> bool {
        let backends = self.backends.read().await;
        backends.contains_key(plugin_id)
    }

    async fn backend_for(&self, plugin_id: &str) -> Result<Arc<dyn PluginClient>> {
        let backends = self.backends.read().await;
        backends
            .get(plugin_id)
            .cloned()
            .ok_or_else(|| PluginError::not_registered(plugin_id))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a backend call, giving up when the request is cancelled or its deadline passes
async fn run_with_context<T, F>(ctx: &RequestContext, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if ctx.is_cancelled() {
        return Err(PluginError::Cancelled);
    }

    let deadline = async {
        match ctx.deadline() {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = call => result,
        _ = ctx.cancellation().cancelled() => Err(PluginError::Cancelled),
        _ = deadline => Err(PluginError::DeadlineExceeded),
    }
}

#[async_trait]
impl PluginClient for PluginRegistry {
    async fn query_data(
        &self,
        ctx: &RequestContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse> {
        let backend = self.backend_for(&req.plugin_context.plugin_id).await?;
        debug!(
            request_id = %ctx.request_id,
            plugin_id = %req.plugin_context.plugin_id,
            queries = req.queries.len(),
            "Dispatching query"
        );
        run_with_context(ctx, backend.query_data(ctx, req)).await
    }

    async fn check_health(
        &self,
        ctx: &RequestContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult> {
        let backend = self.backend_for(&req.plugin_context.plugin_id).await?;
        debug!(
            request_id = %ctx.request_id,
            plugin_id = %req.plugin_context.plugin_id,
            "Dispatching health check"
        );
        run_with_context(ctx, backend.check_health(ctx, req)).await
    }

    async fn call_resource(
        &self,
        ctx: &RequestContext,
        req: CallResourceRequest,
        sender: &dyn CallResourceResponseSender,
    ) -> Result<()> {
        let backend = self.backend_for(&req.plugin_context.plugin_id).await?;
        debug!(
            request_id = %ctx.request_id,
            plugin_id = %req.plugin_context.plugin_id,
            path = %req.path,
            "Dispatching resource call"
        );
        run_with_context(ctx, backend.call_resource(ctx, req, sender)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CollectingSender;
    use std::time::Duration;

    struct StaticBackend {
        message: &'static str,
    }

    #[async_trait]
    impl PluginClient for StaticBackend {
        async fn query_data(
            &self,
            _ctx: &RequestContext,
            req: QueryDataRequest,
        ) -> Result<QueryDataResponse> {
            let mut resp = QueryDataResponse::default();
            for q in req.queries {
                resp.responses.insert(q.ref_id, DataResponse::default());
            }
            Ok(resp)
        }

        async fn check_health(
            &self,
            _ctx: &RequestContext,
            _req: CheckHealthRequest,
        ) -> Result<CheckHealthResult> {
            Ok(CheckHealthResult::ok(self.message))
        }

        async fn call_resource(
            &self,
            _ctx: &RequestContext,
            _req: CallResourceRequest,
            sender: &dyn CallResourceResponseSender,
        ) -> Result<()> {
            sender.send(CallResourceResponse::new(200, "first")).await?;
            sender.send(CallResourceResponse::new(200, "second")).await
        }
    }

    struct SlowBackend;

    #[async_trait]
    impl PluginClient for SlowBackend {
        async fn query_data(
            &self,
            _ctx: &RequestContext,
            _req: QueryDataRequest,
        ) -> Result<QueryDataResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(QueryDataResponse::default())
        }

        async fn check_health(
            &self,
            _ctx: &RequestContext,
            _req: CheckHealthRequest,
        ) -> Result<CheckHealthResult> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(CheckHealthResult::default())
        }

        async fn call_resource(
            &self,
            _ctx: &RequestContext,
            _req: CallResourceRequest,
            _sender: &dyn CallResourceResponseSender,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn health_request(plugin_id: &str) -> CheckHealthRequest {
        CheckHealthRequest {
            plugin_context: PluginContext::new(1, plugin_id),
            headers: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_registry_creation() {
        let registry = PluginRegistry::new();
        assert!(registry.list_plugins().await.is_empty());
        assert!(!registry.has_plugin("prometheus").await);
    }

    #[tokio::test]
    async fn test_dispatch_by_plugin_id() {
        let registry = PluginRegistry::new();
        registry
            .register("prometheus", Arc::new(StaticBackend { message: "prom" }))
            .await;
        registry
            .register("loki", Arc::new(StaticBackend { message: "loki" }))
            .await;

        let ctx = RequestContext::new();
        let result = registry
            .check_health(&ctx, health_request("loki"))
            .await
            .unwrap();
        assert_eq!(result.message, "loki");
        assert_eq!(registry.list_plugins().await, vec!["loki", "prometheus"]);
    }

    #[tokio::test]
    async fn test_unknown_plugin() {
        let registry = PluginRegistry::new();
        let err = registry
            .check_health(&RequestContext::new(), health_request("tempo"))
            .await
            .unwrap_err();
        assert_eq!(err, PluginError::PluginNotRegistered("tempo".to_string()));
    }

    #[tokio::test]
    async fn test_unregister() {
        let registry = PluginRegistry::new();
        registry
            .register("prometheus", Arc::new(StaticBackend { message: "prom" }))
            .await;
        assert!(registry.unregister("prometheus").await);
        assert!(!registry.unregister("prometheus").await);
        assert!(!registry.has_plugin("prometheus").await);
    }

    #[tokio::test]
    async fn test_resource_chunks_are_streamed() {
        let registry = PluginRegistry::new();
        registry
            .register("prometheus", Arc::new(StaticBackend { message: "prom" }))
            .await;

        let sender = CollectingSender::new();
        let req = CallResourceRequest {
            plugin_context: PluginContext::new(1, "prometheus"),
            path: "api/v1/labels".to_string(),
            method: "GET".to_string(),
            ..Default::default()
        };
        registry
            .call_resource(&RequestContext::new(), req, &sender)
            .await
            .unwrap();

        let chunks = sender.into_chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[0].body[..], b"first");
    }

    #[tokio::test]
    async fn test_cancelled_context_short_circuits() {
        let registry = PluginRegistry::new();
        registry.register("slow", Arc::new(SlowBackend)).await;

        let ctx = RequestContext::new();
        ctx.cancellation().cancel();
        let err = registry
            .check_health(&ctx, health_request("slow"))
            .await
            .unwrap_err();
        assert_eq!(err, PluginError::Cancelled);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let registry = PluginRegistry::new();
        registry.register("slow", Arc::new(SlowBackend)).await;

        let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));
        let req = QueryDataRequest {
            plugin_context: PluginContext::new(1, "slow"),
            headers: HashMap::new(),
            queries: vec![DataQuery::new("A", serde_json::json!({}))],
        };
        let err = registry.query_data(&ctx, req).await.unwrap_err();
        assert_eq!(err, PluginError::DeadlineExceeded);
    }
}
