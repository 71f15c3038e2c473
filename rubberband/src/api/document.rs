//! Single-document endpoints: index, get, delete, multi-get

use crate::client::Client;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::response::{Hit, IndexResponse, ResponseMapper};
use crate::transport::TransportRequest;
use crate::uri::{Endpoint, IndexScope};
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// What to fetch with `_mget`
#[derive(Debug, Clone, PartialEq)]
pub enum MultiGet {
    /// Ids within the target index/type
    Ids(Vec<String>),
    /// A raw `{"docs": [...]}` request with per-document `_id`, `_index`,
    /// `stored_fields`/`fields` and `_source` controls
    Docs(Value),
}

impl From<Vec<String>> for MultiGet {
    fn from(ids: Vec<String>) -> Self {
        Self::Ids(ids)
    }
}

impl From<&[&str]> for MultiGet {
    fn from(ids: &[&str]) -> Self {
        Self::Ids(ids.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for MultiGet {
    fn from(ids: [&str; N]) -> Self {
        Self::Ids(ids.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Value> for MultiGet {
    fn from(docs: Value) -> Self {
        Self::Docs(docs)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Client {
    /// Index a document
    ///
    /// With an id the document is created or replaced at that id (`PUT`);
    /// without one the server assigns an id (`POST`).
    pub async fn index<D>(
        &self,
        document: &D,
        id: Option<&str>,
        opts: RequestOptions,
    ) -> Result<IndexResponse>
    where
        D: Serialize + ?Sized,
    {
        let body = serde_json::to_value(document)?;
        if !body.is_object() {
            return Err(Error::InvalidDocument(json_kind(&body)));
        }

        let endpoint = self.document_endpoint(&opts, "index")?;
        let (method, endpoint) = match id {
            Some(id) if !id.is_empty() => (Method::PUT, endpoint.id(id)),
            _ => (Method::POST, endpoint),
        };

        let request = TransportRequest::new(method, endpoint)
            .params(opts.params)
            .json_body(body.to_string());
        let indexed = ResponseMapper::indexed(self.send(request).await?)?;

        debug!(index = %indexed.index, id = %indexed.id, version = indexed.version, "indexed document");
        Ok(indexed)
    }

    /// Fetch a document by id; `None` when it doesn't exist
    pub async fn get(&self, id: &str, opts: RequestOptions) -> Result<Option<Hit>> {
        if id.is_empty() {
            return Ok(None);
        }
        let endpoint = self.document_endpoint(&opts, "get")?.id(id);
        let request = TransportRequest::new(Method::GET, endpoint).params(opts.params);
        ResponseMapper::document(self.send(request).await?)
    }

    /// Delete a document by id, returning whether it existed
    ///
    /// An empty id deletes nothing and sends no request.
    pub async fn delete(&self, id: &str, opts: RequestOptions) -> Result<bool> {
        if id.is_empty() {
            return Ok(false);
        }
        let endpoint = self.document_endpoint(&opts, "delete")?.id(id);
        let request = TransportRequest::new(Method::DELETE, endpoint).params(opts.params);
        let found = ResponseMapper::deleted(self.send(request).await?)?;

        debug!(id, found, "deleted document");
        Ok(found)
    }

    /// Fetch several documents in one round trip, in request order
    ///
    /// Missing documents are returned with `found == Some(false)`.
    pub async fn multi_get(
        &self,
        request: impl Into<MultiGet>,
        opts: RequestOptions,
    ) -> Result<Vec<Hit>> {
        let scope = self.scope(&opts);
        let body = match request.into() {
            MultiGet::Ids(ids) => {
                if scope == IndexScope::Default {
                    return Err(Error::MissingIndex("multi_get"));
                }
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                json!({ "ids": ids })
            }
            MultiGet::Docs(docs) => docs,
        };

        let endpoint = Endpoint::new(scope)
            .doc_type(self.doc_type(&opts))
            .action("_mget");
        let request = TransportRequest::new(Method::POST, endpoint)
            .params(opts.params)
            .json_body(body.to_string());
        ResponseMapper::multi_get(self.send(request).await?)
    }
}
