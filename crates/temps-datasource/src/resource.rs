//! API resource shapes for data source connections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix of the API group every data source plugin is served under
pub const DATASOURCE_GROUP_SUFFIX: &str = "datasource.temps.sh";
pub const CONNECTION_VERSION: &str = "v0alpha1";
pub const CONNECTION_RESOURCE: &str = "connections";
pub const CONNECTION_KIND: &str = "DataSourceConnection";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// `group/version`, or just `version` for the core group
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    pub fn group(&self) -> &str {
        match self.api_version.split_once('/') {
            Some((group, _)) => group,
            None => "",
        }
    }

    pub fn version(&self) -> &str {
        match self.api_version.split_once('/') {
            Some((_, version)) => version,
            None => &self.api_version,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

/// Anything served through the API: always typed, optionally carrying object metadata
pub trait Resource {
    fn type_meta(&self) -> &TypeMeta;

    /// `None` for resources without object metadata (lists)
    fn object_meta(&self) -> Option<&ObjectMeta>;

    fn object_meta_mut(&mut self) -> Option<&mut ObjectMeta>;
}

/// Connection to a configured data source, projected from the data source registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConnection {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ObjectMeta,
    /// Display name of the data source
    pub title: String,
}

impl Resource for DataSourceConnection {
    fn type_meta(&self) -> &TypeMeta {
        &self.type_meta
    }

    fn object_meta(&self) -> Option<&ObjectMeta> {
        Some(&self.metadata)
    }

    fn object_meta_mut(&mut self) -> Option<&mut ObjectMeta> {
        Some(&mut self.metadata)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConnectionList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub metadata: ListMeta,
    pub items: Vec<DataSourceConnection>,
}

impl Resource for DataSourceConnectionList {
    fn type_meta(&self) -> &TypeMeta {
        &self.type_meta
    }

    fn object_meta(&self) -> Option<&ObjectMeta> {
        None
    }

    fn object_meta_mut(&mut self) -> Option<&mut ObjectMeta> {
        None
    }
}

/// Describes one resource kind served by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub group: String,
    pub version: String,
    /// Plural resource name used in paths
    pub resource_name: String,
    pub singular_name: String,
    pub kind: String,
}

impl ResourceInfo {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource_name: impl Into<String>,
        singular_name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource_name: resource_name.into(),
            singular_name: singular_name.into(),
            kind: kind.into(),
        }
    }

    /// Connection resource of a data source plugin, served as
    /// `<plugin>.datasource.temps.sh/v0alpha1`
    pub fn connections_for_plugin(plugin_id: &str) -> Self {
        Self::new(
            format!("{}.{}", plugin_id, DATASOURCE_GROUP_SUFFIX),
            CONNECTION_VERSION,
            CONNECTION_RESOURCE,
            "connection",
            CONNECTION_KIND,
        )
    }

    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// `resource.group`, as used for storage keys and authorization
    pub fn group_resource(&self) -> String {
        if self.group.is_empty() {
            self.resource_name.clone()
        } else {
            format!("{}.{}", self.resource_name, self.group)
        }
    }

    pub fn type_meta(&self) -> TypeMeta {
        TypeMeta::new(self.group_version(), self.kind.clone())
    }

    pub fn list_type_meta(&self) -> TypeMeta {
        TypeMeta::new(self.group_version(), format!("{}List", self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_for_plugin() {
        let info = ResourceInfo::connections_for_plugin("prometheus");
        assert_eq!(info.group, "prometheus.datasource.temps.sh");
        assert_eq!(info.group_version(), "prometheus.datasource.temps.sh/v0alpha1");
        assert_eq!(
            info.group_resource(),
            "connections.prometheus.datasource.temps.sh"
        );

        let tm = info.type_meta();
        assert_eq!(tm.kind, "DataSourceConnection");
        assert_eq!(tm.group(), "prometheus.datasource.temps.sh");
        assert_eq!(tm.version(), "v0alpha1");
        assert_eq!(info.list_type_meta().kind, "DataSourceConnectionList");
    }

    #[test]
    fn test_core_group() {
        let info = ResourceInfo::new("", "v1", "configmaps", "configmap", "ConfigMap");
        assert_eq!(info.group_version(), "v1");
        assert_eq!(info.group_resource(), "configmaps");
        assert_eq!(info.type_meta().group(), "");
        assert_eq!(info.type_meta().version(), "v1");
    }

    #[test]
    fn test_connection_wire_format() {
        let conn = DataSourceConnection {
            type_meta: TypeMeta::new("prometheus.datasource.temps.sh/v0alpha1", "DataSourceConnection"),
            metadata: ObjectMeta {
                name: "abc".to_string(),
                namespace: "org-7".to_string(),
                resource_version: "1700000000123".to_string(),
                ..ObjectMeta::default()
            },
            title: "My DB".to_string(),
        };

        let value = serde_json::to_value(&conn).unwrap();
        assert_eq!(value["apiVersion"], "prometheus.datasource.temps.sh/v0alpha1");
        assert_eq!(value["kind"], "DataSourceConnection");
        assert_eq!(value["metadata"]["resourceVersion"], "1700000000123");
        assert_eq!(value["title"], "My DB");
        assert!(value["metadata"].get("annotations").is_none());
    }

    #[test]
    fn test_list_has_no_object_meta() {
        let mut list = DataSourceConnectionList::default();
        assert!(list.object_meta().is_none());
        assert!(list.object_meta_mut().is_none());
    }
}
