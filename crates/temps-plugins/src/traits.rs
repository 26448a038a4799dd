use crate::error::{PluginError, Result};
use crate::types::*;
use async_trait::async_trait;
use std::sync::Mutex;
use temps_core::RequestContext;
use tokio::sync::mpsc;

/// Client for the plugin runtime.
///
/// Implementations must accept concurrent calls; no ordering is guaranteed
/// between independent requests. The request context is passed through so
/// cancellation and deadlines reach the backend.
#[async_trait]
pub trait PluginClient: Send + Sync {
    /// Run a batch of queries
    async fn query_data(
        &self,
        ctx: &RequestContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse>;

    /// Check that the plugin (and the data source it targets) is reachable
    async fn check_health(
        &self,
        ctx: &RequestContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult>;

    /// Call a plugin resource; response chunks are pushed through `sender`
    /// before the call returns
    async fn call_resource(
        &self,
        ctx: &RequestContext,
        req: CallResourceRequest,
        sender: &dyn CallResourceResponseSender,
    ) -> Result<()>;
}

/// Sink receiving streamed resource response chunks
#[async_trait]
pub trait CallResourceResponseSender: Send + Sync {
    async fn send(&self, resp: CallResourceResponse) -> Result<()>;
}

#[async_trait]
impl CallResourceResponseSender for mpsc::Sender<CallResourceResponse> {
    async fn send(&self, resp: CallResourceResponse) -> Result<()> {
        mpsc::Sender::send(self, resp)
            .await
            .map_err(|_| PluginError::SenderClosed)
    }
}

/// Sender that buffers every chunk in memory
#[derive(Debug, Default)]
pub struct CollectingSender {
    chunks: Mutex<Vec<CallResourceResponse>>,
}

impl CollectingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_chunks(self) -> Vec<CallResourceResponse> {
        self.chunks.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.chunks.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CallResourceResponseSender for CollectingSender {
    async fn send(&self, resp: CallResourceResponse) -> Result<()> {
        self.chunks
            .lock()
            .map_err(|_| PluginError::backend("response buffer poisoned"))?
            .push(resp);
        Ok(())
    }
}
