use crate::services::{
    DataSourceCache, DataSourceRecord, DataSourceService, GetDataSourcesByTypeQuery, LookupError,
};
use async_trait::async_trait;
use temps_core::{RequestContext, SignedInUser};
use tokio::sync::RwLock;
use tracing::debug;

/// In-process data source registry
///
/// Keeps records in insertion order and scopes every read to one
/// organization. Serves as both the listing service and the uid cache.
#[derive(Debug, Default)]
pub struct InMemoryDataSourceStore {
    records: RwLock<Vec<DataSourceRecord>>,
}

impl InMemoryDataSourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DataSourceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Insert a record, replacing one with the same org and uid in place
    pub async fn add(&self, record: DataSourceRecord) {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.org_id == record.org_id && r.uid == record.uid)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub async fn remove(&self, org_id: i64, uid: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !(r.org_id == org_id && r.uid == uid));
        records.len() != before
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DataSourceService for InMemoryDataSourceStore {
    async fn get_data_sources_by_type(
        &self,
        _ctx: &RequestContext,
        query: &GetDataSourcesByTypeQuery,
    ) -> Result<Vec<DataSourceRecord>, LookupError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.org_id == query.org_id && r.ds_type == query.ds_type)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DataSourceCache for InMemoryDataSourceStore {
    async fn get_datasource_by_uid(
        &self,
        ctx: &RequestContext,
        uid: &str,
        user: &SignedInUser,
        skip_cache: bool,
    ) -> Result<DataSourceRecord, LookupError> {
        debug!(
            request_id = %ctx.request_id,
            uid = %uid,
            org_id = user.org_id,
            skip_cache,
            "Looking up data source"
        );
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.org_id == user.org_id && r.uid == uid)
            .cloned()
            .ok_or_else(|| LookupError::not_found(uid))
    }
}
