//! Metadata helpers shared by every served resource

use crate::resource::{ObjectMeta, Resource};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const ANNOTATION_UPDATED_TIMESTAMP: &str = "temps.sh/updatedTimestamp";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    #[error("resource of kind {kind:?} has no object metadata")]
    MissingObjectMeta { kind: String },

    #[error("invalid value {value:?} for annotation {key}")]
    InvalidAnnotation { key: String, value: String },
}

/// Typed access to the annotations of a resource
pub struct MetaAccessor<'a> {
    meta: &'a mut ObjectMeta,
}

/// Obtain an accessor; fails for resources that carry no object metadata
pub fn meta_accessor<R: Resource + ?Sized>(obj: &mut R) -> Result<MetaAccessor<'_>, MetaError> {
    let kind = obj.type_meta().kind.clone();
    obj.object_meta_mut()
        .map(|meta| MetaAccessor { meta })
        .ok_or(MetaError::MissingObjectMeta { kind })
}

impl MetaAccessor<'_> {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.meta.annotations.get(key).map(String::as_str)
    }

    fn set_annotation(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(v) => {
                self.meta.annotations.insert(key.to_string(), v);
            }
            None => {
                self.meta.annotations.remove(key);
            }
        }
    }

    /// Record when the underlying object last changed; `None` clears it
    pub fn set_updated_timestamp(&mut self, ts: Option<&DateTime<Utc>>) {
        let value = ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
        self.set_annotation(ANNOTATION_UPDATED_TIMESTAMP, value);
    }

    pub fn updated_timestamp(&self) -> Result<Option<DateTime<Utc>>, MetaError> {
        let Some(raw) = self.annotation(ANNOTATION_UPDATED_TIMESTAMP) else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| MetaError::InvalidAnnotation {
                key: ANNOTATION_UPDATED_TIMESTAMP.to_string(),
                value: raw.to_string(),
            })
    }
}

/// Deterministic identity of a resource across the cluster.
///
/// Derived from group, kind, namespace and name only, so recomputing it after
/// a rename or move yields a different value. Each field is length-prefixed;
/// names and namespaces may contain any byte.
pub fn calculate_cluster_wide_uid<R: Resource + ?Sized>(obj: &R) -> String {
    fn update_field(hasher: &mut Sha256, field: &str) {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }

    let type_meta = obj.type_meta();
    let mut hasher = Sha256::new();
    update_field(&mut hasher, type_meta.group());
    update_field(&mut hasher, &type_meta.kind);
    if let Some(meta) = obj.object_meta() {
        update_field(&mut hasher, &meta.namespace);
        update_field(&mut hasher, &meta.name);
    }
    hex::encode(hasher.finalize())
}
