//! Response shapes returned by Elasticsearch and their mapping into results

use crate::error::{Error, Result};
use crate::transport::TransportResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A flat key-value record as stored in `_source`
pub type Document = Map<String, Value>;

/// One document as returned by get, search and multi-get
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HashMap<String, Vec<String>>>,
}

impl Hit {
    /// Look a field up in `_source`, then in `fields`
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.source
            .as_ref()
            .and_then(|s| s.get(field))
            .or_else(|| self.fields.as_ref().and_then(|f| f.get(field)))
    }

    /// Deserialize `_source` into a caller type
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.source
            .as_ref()
            .map(|s| serde_json::from_value(Value::Object(s.clone())))
            .transpose()
            .map_err(Error::from)
    }

    /// False only when the server reported the document missing
    pub fn exists(&self) -> bool {
        self.found.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub successful: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub failed: u32,
}

/// `hits.total` is a bare number before 7.x and an object since
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64, relation: String },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(v) | Self::Object { value: v, .. } => *v,
        }
    }
}

/// Raw `_search` response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(rename = "_shards", default)]
    pub shards: ShardStats,
    pub hits: HitsResponse,
    #[serde(default)]
    pub aggregations: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitsResponse {
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Ordered search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hits {
    pub total: u64,
    pub max_score: Option<f64>,
    pub took: u64,
    pub hits: Vec<Hit>,
    pub aggregations: Option<Value>,
}

impl Hits {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.hits.iter()
    }

    pub fn first(&self) -> Option<&Hit> {
        self.hits.first()
    }

    pub fn ids(&self) -> Vec<String> {
        self.hits.iter().map(|h| h.id.clone()).collect()
    }
}

impl std::ops::Index<usize> for Hits {
    type Output = Hit;

    fn index(&self, i: usize) -> &Hit {
        &self.hits[i]
    }
}

impl IntoIterator for Hits {
    type Item = Hit;
    type IntoIter = std::vec::IntoIter<Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a Hits {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

/// Index (create/overwrite) acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    found: Option<bool>,
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CountResponse {
    count: u64,
}

/// `_delete_by_query` summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteByQueryResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub version_conflicts: u64,
    #[serde(default)]
    pub failures: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct MultiGetResponse {
    docs: Vec<Hit>,
}

/// Bulk acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    pub errors: bool,
    pub items: Vec<BulkItemResponse>,
}

impl BulkResponse {
    /// Items that the server rejected
    pub fn failed_items(&self) -> impl Iterator<Item = &BulkItemResult> {
        self.items
            .iter()
            .filter_map(BulkItemResponse::result)
            .filter(|r| r.error.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<BulkItemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<BulkItemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<BulkItemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<BulkItemResult>,
}

impl BulkItemResponse {
    /// Whichever action this item reports on
    pub fn result(&self) -> Option<&BulkItemResult> {
        self.index
            .as_ref()
            .or(self.create.as_ref())
            .or(self.update.as_ref())
            .or(self.delete.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// `_cluster/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: String,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub number_of_nodes: u32,
    #[serde(default)]
    pub number_of_data_nodes: u32,
    #[serde(default)]
    pub active_primary_shards: u32,
    #[serde(default)]
    pub active_shards: u32,
    #[serde(default)]
    pub relocating_shards: u32,
    #[serde(default)]
    pub initializing_shards: u32,
    #[serde(default)]
    pub unassigned_shards: u32,
}

/// Interprets raw responses for each operation
pub struct ResponseMapper;

impl ResponseMapper {
    /// Single-document get: 404 means no such document (or index)
    pub fn document(response: TransportResponse) -> Result<Option<Hit>> {
        if response.status == 404 {
            return Ok(None);
        }
        let hit: Hit = response.expect_status(&[200])?.json()?;
        Ok(hit.exists().then_some(hit))
    }

    pub fn indexed(response: TransportResponse) -> Result<IndexResponse> {
        response.expect_status(&[200, 201])?.json()
    }

    /// Delete: whether the document existed
    ///
    /// Newer servers answer a missing document with 404 and
    /// `"result": "not_found"`; older ones always answer 200 with `found`.
    pub fn deleted(response: TransportResponse) -> Result<bool> {
        let response = response.expect_status(&[200, 404])?;
        let parsed: DeleteResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(_) if response.status == 404 => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(match (parsed.found, parsed.result.as_deref()) {
            (Some(found), _) => found,
            (None, Some(result)) => result == "deleted",
            (None, None) => response.status == 200,
        })
    }

    pub fn search(response: TransportResponse) -> Result<Hits> {
        let raw: SearchResponse = response.expect_status(&[200])?.json()?;
        let total = raw
            .hits
            .total
            .as_ref()
            .map(TotalHits::value)
            .unwrap_or(raw.hits.hits.len() as u64);
        Ok(Hits {
            total,
            max_score: raw.hits.max_score,
            took: raw.took,
            hits: raw.hits.hits,
            aggregations: raw.aggregations,
        })
    }

    pub fn count(response: TransportResponse) -> Result<u64> {
        let raw: CountResponse = response.expect_status(&[200])?.json()?;
        Ok(raw.count)
    }

    pub fn deleted_by_query(response: TransportResponse) -> Result<DeleteByQueryResponse> {
        response.expect_status(&[200])?.json()
    }

    /// Multi-get docs, in the order they were requested
    pub fn multi_get(response: TransportResponse) -> Result<Vec<Hit>> {
        let raw: MultiGetResponse = response.expect_status(&[200])?.json()?;
        Ok(raw.docs)
    }

    pub fn bulk(response: TransportResponse) -> Result<BulkResponse> {
        response.expect_status(&[200])?.json()
    }

    /// Acknowledged-only responses (refresh, mappings, index creation)
    pub fn acknowledged(response: TransportResponse) -> Result<()> {
        response.expect_status(&[200, 201]).map(|_| ())
    }
}
