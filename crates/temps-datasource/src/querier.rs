use crate::convert::{as_connection, as_connection_list};
use crate::error::Result;
use crate::resource::{DataSourceConnection, DataSourceConnectionList, ResourceInfo};
use crate::services::{DataSourceCache, DataSourceService, GetDataSourcesByTypeQuery};
use async_trait::async_trait;
use std::sync::Arc;
use temps_core::{namespace_info_from, NamespaceInfo, QuerierSettings, RequestContext};
use temps_plugins::{
    CallResourceRequest, CallResourceResponseSender, CheckHealthRequest, CheckHealthResult,
    PluginClient, PluginJson, QueryDataRequest, QueryDataResponse,
};
use tracing::debug;

/// Entry point for everything a data source plugin API serves.
///
/// Every call resolves the tenant namespace from its own context; a querier
/// is shared across requests of many tenants.
#[async_trait]
pub trait Querier: Send + Sync {
    /// Run the query on behalf of the user in context
    async fn query(
        &self,
        ctx: &RequestContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse>;

    /// Check the health of the plugin
    async fn health(
        &self,
        ctx: &RequestContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult>;

    /// Call a plugin resource, streaming the response through `sender`
    async fn resource(
        &self,
        ctx: &RequestContext,
        req: CallResourceRequest,
        sender: &dyn CallResourceResponseSender,
    ) -> Result<()>;

    /// Get one connection by name (the data source uid)
    async fn datasource(&self, ctx: &RequestContext, name: &str) -> Result<DataSourceConnection>;

    /// List all connections of this querier's plugin type in the caller's namespace
    async fn datasources(&self, ctx: &RequestContext) -> Result<DataSourceConnectionList>;
}

pub struct DefaultQuerier {
    connection_resource_info: ResourceInfo,
    plugin_json: PluginJson,
    plugin_client: Arc<dyn PluginClient>,
    ds_service: Arc<dyn DataSourceService>,
    ds_cache: Arc<dyn DataSourceCache>,
    settings: QuerierSettings,
}

impl DefaultQuerier {
    pub fn new(
        connection_resource_info: ResourceInfo,
        plugin_json: PluginJson,
        plugin_client: Arc<dyn PluginClient>,
        ds_service: Arc<dyn DataSourceService>,
        ds_cache: Arc<dyn DataSourceCache>,
    ) -> Self {
        Self {
            connection_resource_info,
            plugin_json,
            plugin_client,
            ds_service,
            ds_cache,
            settings: QuerierSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: QuerierSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn plugin_json(&self) -> &PluginJson {
        &self.plugin_json
    }

    pub fn connection_resource_info(&self) -> &ResourceInfo {
        &self.connection_resource_info
    }

    fn resolve(&self, ctx: &RequestContext, operation: &'static str) -> Result<NamespaceInfo> {
        let info = namespace_info_from(ctx, true)?;
        debug!(
            request_id = %ctx.request_id,
            namespace = %info.value,
            plugin_id = %self.plugin_json.id,
            operation,
            "Resolved namespace"
        );
        Ok(info)
    }
}

#[async_trait]
impl Querier for DefaultQuerier {
    async fn query(
        &self,
        ctx: &RequestContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse> {
        self.resolve(ctx, "query")?;
        Ok(self.plugin_client.query_data(ctx, req).await?)
    }

    async fn health(
        &self,
        ctx: &RequestContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult> {
        self.resolve(ctx, "health")?;
        Ok(self.plugin_client.check_health(ctx, req).await?)
    }

    async fn resource(
        &self,
        ctx: &RequestContext,
        req: CallResourceRequest,
        sender: &dyn CallResourceResponseSender,
    ) -> Result<()> {
        self.resolve(ctx, "resource")?;
        Ok(self.plugin_client.call_resource(ctx, req, sender).await?)
    }

    async fn datasource(&self, ctx: &RequestContext, name: &str) -> Result<DataSourceConnection> {
        let info = self.resolve(ctx, "datasource")?;
        let user = ctx.user()?;
        let ds = self
            .ds_cache
            .get_datasource_by_uid(ctx, name, user, self.settings.skip_cache)
            .await?;
        as_connection(
            &self.connection_resource_info.type_meta(),
            &ds,
            &info.value,
        )
        .into_result()
    }

    async fn datasources(&self, ctx: &RequestContext) -> Result<DataSourceConnectionList> {
        let info = self.resolve(ctx, "datasources")?;
        let query = GetDataSourcesByTypeQuery {
            org_id: info.org_id,
            ds_type: self.plugin_json.id.clone(),
        };
        let dss = self.ds_service.get_data_sources_by_type(ctx, &query).await?;
        Ok(as_connection_list(
            &self.connection_resource_info.type_meta(),
            &dss,
            &info.value,
        ))
    }
}
