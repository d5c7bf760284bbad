use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Limit sent when the caller does not supply a query.
pub const DEFAULT_QUERY_LIMIT: u32 = 10;

/// Ordered key/value tags.
pub type TagSet = BTreeMap<String, String>;

/// Backend-assigned manifest identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub u64);

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub id: ManifestId,
    /// Author-assigned tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: TagSet,
    /// Machine-suggested tags; absent until enrichment succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tags: Option<TagSet>,
}

impl Manifest {
    pub fn new(id: u64, tags: TagSet) -> Self {
        Self {
            id: ManifestId(id),
            tags,
            suggested_tags: None,
        }
    }
}

/// Request body for `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestQuery {
    pub limit: u32,
    /// Tag filters; omitted from the body when empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: TagSet,
}

impl ManifestQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            query: TagSet::new(),
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

impl Default for ManifestQuery {
    fn default() -> Self {
        Self::with_limit(DEFAULT_QUERY_LIMIT)
    }
}

/// Response body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub manifests: Vec<Manifest>,
}

/// Download path for a manifest's data: `/d/{id}`, decimal, unpadded.
pub fn make_data_url(id: ManifestId) -> String {
    format!("/d/{id}")
}

// The backend encodes empty maps and slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_is_plain_decimal() {
        assert_eq!(make_data_url(ManifestId(7)), "/d/7");
        assert_eq!(make_data_url(ManifestId(12345)), "/d/12345");
        assert_eq!(make_data_url(ManifestId(7)), make_data_url(ManifestId(7)));
    }

    #[test]
    fn default_query_matches_explicit_limit() {
        let default = serde_json::to_value(ManifestQuery::default()).unwrap();
        let explicit = serde_json::to_value(ManifestQuery::with_limit(10)).unwrap();
        assert_eq!(default, explicit);
        assert_eq!(default, serde_json::json!({ "limit": 10 }));
    }

    #[test]
    fn filters_are_serialized_under_query() {
        let query = ManifestQuery::with_limit(3).filter("color", "red");
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            serde_json::json!({ "limit": 3, "query": { "color": "red" } })
        );
    }

    #[test]
    fn manifest_decoding_ignores_unknown_fields_and_nulls() {
        let raw = r#"{"id": 4, "tags": null, "blob_count": 12, "webref": {"x": 1}}"#;
        let manifest: Manifest = serde_json::from_str(raw).unwrap();
        assert_eq!(manifest.id, ManifestId(4));
        assert!(manifest.tags.is_empty());
        assert_eq!(manifest.suggested_tags, None);
    }

    #[test]
    fn query_response_with_null_manifests_is_empty() {
        let response: QueryResponse = serde_json::from_str(r#"{"manifests": null}"#).unwrap();
        assert!(response.manifests.is_empty());
        let response: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.manifests.is_empty());
    }
}
