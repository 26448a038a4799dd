use crate::error::Result;
use crate::querier::{DefaultQuerier, Querier};
use crate::resource::ResourceInfo;
use crate::services::{DataSourceCache, DataSourceService};
use std::sync::Arc;
use temps_core::{QuerierSettings, RequestContext};
use temps_plugins::{PluginClient, PluginJson};

/// Builds a querier for one connection resource and plugin
pub type QuerierFactoryFunc = Arc<
    dyn Fn(&RequestContext, &ResourceInfo, &PluginJson) -> Result<Arc<dyn Querier>> + Send + Sync,
>;

pub trait QuerierProvider: Send + Sync {
    fn querier(
        &self,
        ctx: &RequestContext,
        ri: &ResourceInfo,
        pj: &PluginJson,
    ) -> Result<Arc<dyn Querier>>;
}

/// Provider delegating to a swappable factory function
pub struct DefaultQuerierProvider {
    factory: QuerierFactoryFunc,
}

impl DefaultQuerierProvider {
    pub fn new(factory: QuerierFactoryFunc) -> Self {
        Self { factory }
    }

    /// Provider wiring [`DefaultQuerier`] to process-wide collaborators
    pub fn provide_default(
        plugin_client: Arc<dyn PluginClient>,
        ds_service: Arc<dyn DataSourceService>,
        ds_cache: Arc<dyn DataSourceCache>,
    ) -> Self {
        Self::provide_with_settings(
            plugin_client,
            ds_service,
            ds_cache,
            QuerierSettings::default(),
        )
    }

    pub fn provide_with_settings(
        plugin_client: Arc<dyn PluginClient>,
        ds_service: Arc<dyn DataSourceService>,
        ds_cache: Arc<dyn DataSourceCache>,
        settings: QuerierSettings,
    ) -> Self {
        Self::new(Arc::new(
            move |_ctx: &RequestContext, ri: &ResourceInfo, pj: &PluginJson| {
                let querier = DefaultQuerier::new(
                    ri.clone(),
                    pj.clone(),
                    plugin_client.clone(),
                    ds_service.clone(),
                    ds_cache.clone(),
                )
                .with_settings(settings.clone());
                Ok(Arc::new(querier) as Arc<dyn Querier>)
            },
        ))
    }
}

impl QuerierProvider for DefaultQuerierProvider {
    fn querier(
        &self,
        ctx: &RequestContext,
        ri: &ResourceInfo,
        pj: &PluginJson,
    ) -> Result<Arc<dyn Querier>> {
        (self.factory)(ctx, ri, pj)
    }
}
