//! Projection of registry records into connection resources

use crate::error::{DatasourceError, Result};
use crate::meta::{calculate_cluster_wide_uid, meta_accessor};
use crate::resource::{
    DataSourceConnection, DataSourceConnectionList, ObjectMeta, Resource, TypeMeta,
};
use crate::services::DataSourceRecord;
use chrono::{DateTime, Utc};
use tracing::warn;

/// A projected connection plus the error, if any, raised while decorating it.
///
/// The connection is complete even when `error` is set; only the extended
/// metadata may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub connection: DataSourceConnection,
    pub error: Option<DatasourceError>,
}

impl Projection {
    /// Treat a decoration failure as fatal
    pub fn into_result(self) -> Result<DataSourceConnection> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.connection),
        }
    }
}

pub fn as_connection(type_meta: &TypeMeta, ds: &DataSourceRecord, namespace: &str) -> Projection {
    let mut connection = DataSourceConnection {
        type_meta: type_meta.clone(),
        metadata: ObjectMeta {
            name: ds.uid.clone(),
            namespace: namespace.to_string(),
            creation_timestamp: Some(ds.created),
            resource_version: ds.updated.timestamp_millis().to_string(),
            ..ObjectMeta::default()
        },
        title: ds.name.clone(),
    };
    // changes whenever the connection is renamed or moved
    connection.metadata.uid = calculate_cluster_wide_uid(&connection);

    let error = stamp_updated(&mut connection, &ds.updated);

    Projection { connection, error }
}

/// Annotate `obj` with its last update time. The object is left untouched
/// and the error returned when it carries no object metadata.
pub fn stamp_updated<R: Resource + ?Sized>(
    obj: &mut R,
    updated: &DateTime<Utc>,
) -> Option<DatasourceError> {
    match meta_accessor(obj) {
        Ok(mut meta) => {
            meta.set_updated_timestamp(Some(updated));
            None
        }
        Err(err) => Some(err.into()),
    }
}

/// Project every record in order. Decoration errors are not returned.
pub fn as_connection_list(
    type_meta: &TypeMeta,
    dss: &[DataSourceRecord],
    namespace: &str,
) -> DataSourceConnectionList {
    let mut result = DataSourceConnectionList {
        type_meta: TypeMeta::new(type_meta.api_version.clone(), format!("{}List", type_meta.kind)),
        items: Vec::with_capacity(dss.len()),
        ..Default::default()
    };

    for ds in dss {
        push_projection(&mut result, as_connection(type_meta, ds, namespace));
    }

    result
}

fn push_projection(list: &mut DataSourceConnectionList, projection: Projection) {
    if let Some(err) = &projection.error {
        warn!(
            uid = %projection.connection.metadata.name,
            namespace = %projection.connection.metadata.namespace,
            "Connection metadata incomplete: {}", err
        );
    }
    list.items.push(projection.connection);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{MetaError, ANNOTATION_UPDATED_TIMESTAMP};
    use crate::resource::ResourceInfo;
    use chrono::{TimeZone, Utc};

    fn record(uid: &str, name: &str) -> DataSourceRecord {
        DataSourceRecord::new(
            7,
            uid,
            name,
            "prometheus",
            Utc.timestamp_millis_opt(1_690_000_000_000).unwrap(),
            Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        )
    }

    fn type_meta() -> TypeMeta {
        ResourceInfo::connections_for_plugin("prometheus").type_meta()
    }

    #[test]
    fn test_as_connection_fields() {
        let ds = record("abc", "My DB");
        let projection = as_connection(&type_meta(), &ds, "org-7");
        assert!(projection.error.is_none());

        let conn = projection.connection;
        assert_eq!(conn.metadata.name, "abc");
        assert_eq!(conn.metadata.namespace, "org-7");
        assert_eq!(conn.title, "My DB");
        assert_eq!(conn.metadata.creation_timestamp, Some(ds.created));
        assert_eq!(conn.metadata.resource_version, "1700000000123");
        assert_eq!(conn.type_meta, type_meta());
        assert_eq!(
            conn.metadata
                .annotations
                .get(ANNOTATION_UPDATED_TIMESTAMP)
                .map(String::as_str),
            Some("2023-11-14T22:13:20Z")
        );
    }

    #[test]
    fn test_uid_matches_recomputation() {
        let conn = as_connection(&type_meta(), &record("abc", "My DB"), "org-7").connection;
        assert_eq!(conn.metadata.uid, calculate_cluster_wide_uid(&conn));
    }

    #[test]
    fn test_as_connection_is_deterministic() {
        let ds = record("abc", "My DB");
        let a = as_connection(&type_meta(), &ds, "org-7").connection;
        let b = as_connection(&type_meta(), &ds, "org-7").connection;
        assert_eq!(a, b);
    }

    #[test]
    fn test_uid_differs_by_record_uid() {
        let a = as_connection(&type_meta(), &record("abc", "My DB"), "org-7").connection;
        let b = as_connection(&type_meta(), &record("abd", "My DB"), "org-7").connection;
        assert_ne!(a.metadata.uid, b.metadata.uid);
    }

    #[test]
    fn test_resource_version_tracks_update_time() {
        let mut ds = record("abc", "My DB");
        ds.updated = Utc.timestamp_millis_opt(1).unwrap();
        let conn = as_connection(&type_meta(), &ds, "org-7").connection;
        assert_eq!(conn.metadata.resource_version, "1");
    }

    #[test]
    fn test_into_result() {
        let projection = as_connection(&type_meta(), &record("abc", "My DB"), "org-7");
        assert!(projection.into_result().is_ok());

        let failed = Projection {
            connection: DataSourceConnection::default(),
            error: Some(DatasourceError::QuerierUnavailable("x".to_string())),
        };
        assert!(failed.into_result().is_err());
    }

    #[test]
    fn test_uid_unambiguous_across_namespace_and_name() {
        let a = as_connection(&type_meta(), &record("z", "Z"), "stack-x|y").connection;
        let b = as_connection(&type_meta(), &record("y|z", "Z"), "stack-x").connection;
        assert_ne!(a.metadata.uid, b.metadata.uid);
    }

    #[test]
    fn test_stamp_updated_without_object_meta() {
        let mut list = DataSourceConnectionList {
            type_meta: TypeMeta::new("v1", "DataSourceConnectionList"),
            ..Default::default()
        };
        let untouched = list.clone();
        let updated = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let err = stamp_updated(&mut list, &updated);
        assert_eq!(
            err,
            Some(DatasourceError::Meta(MetaError::MissingObjectMeta {
                kind: "DataSourceConnectionList".to_string()
            }))
        );
        assert_eq!(list, untouched);
    }

    #[test]
    fn test_list_keeps_connection_with_decoration_error() {
        let mut list = DataSourceConnectionList::default();
        let connection = as_connection(&type_meta(), &record("abc", "My DB"), "org-7").connection;
        push_projection(
            &mut list,
            Projection {
                connection: connection.clone(),
                error: Some(DatasourceError::Meta(MetaError::MissingObjectMeta {
                    kind: "DataSourceConnection".to_string(),
                })),
            },
        );
        assert_eq!(list.items, vec![connection]);
    }

    #[test]
    fn test_list_empty() {
        let list = as_connection_list(&type_meta(), &[], "org-7");
        assert!(list.items.is_empty());
        assert_eq!(list.type_meta.kind, "DataSourceConnectionList");
    }

    #[test]
    fn test_list_preserves_order() {
        let records = vec![record("c", "C"), record("a", "A"), record("b", "B")];
        let list = as_connection_list(&type_meta(), &records, "org-7");
        let names: Vec<&str> = list.items.iter().map(|c| c.metadata.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
