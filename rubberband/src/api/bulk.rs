//! _bulk endpoint

use crate::api::document::json_kind;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::response::{BulkResponse, ResponseMapper};
use crate::transport::TransportRequest;
use crate::uri::Endpoint;
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulkKind {
    Index,
    Create,
    Update,
    Delete,
}

impl BulkKind {
    fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

fn object<D: Serialize + ?Sized>(document: &D) -> Result<Value> {
    let value = serde_json::to_value(document)?;
    if !value.is_object() {
        return Err(Error::InvalidDocument(json_kind(&value)));
    }
    Ok(value)
}

/// One line pair (or single line, for deletes) of a bulk request
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAction {
    kind: BulkKind,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    source: Option<Value>,
}

impl BulkAction {
    fn with_source(kind: BulkKind, source: Value) -> Self {
        Self {
            kind,
            index: None,
            doc_type: None,
            id: None,
            source: Some(source),
        }
    }

    /// Create or replace a document; the server assigns an id unless one is set
    pub fn index<D: Serialize + ?Sized>(document: &D) -> Result<Self> {
        Ok(Self::with_source(BulkKind::Index, object(document)?))
    }

    /// Create a document, failing per-item if the id already exists
    pub fn create<D: Serialize + ?Sized>(id: &str, document: &D) -> Result<Self> {
        Ok(Self::with_source(BulkKind::Create, object(document)?).id(id))
    }

    /// Merge `partial` into an existing document
    pub fn update<D: Serialize + ?Sized>(id: &str, partial: &D) -> Result<Self> {
        let doc = json!({ "doc": object(partial)? });
        Ok(Self::with_source(BulkKind::Update, doc).id(id))
    }

    pub fn delete(id: &str) -> Self {
        Self {
            kind: BulkKind::Delete,
            index: None,
            doc_type: None,
            id: Some(id.to_string()),
            source: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Target an index other than the client default
    pub fn in_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    fn write_lines(
        &self,
        out: &mut String,
        default_index: Option<&str>,
        default_type: Option<&str>,
    ) -> Result<()> {
        let index = self
            .index
            .as_deref()
            .or(default_index)
            .ok_or(Error::MissingIndex("bulk"))?;

        let mut meta = Map::new();
        meta.insert("_index".to_string(), Value::String(index.to_lowercase()));
        if let Some(doc_type) = self.doc_type.as_deref().or(default_type) {
            meta.insert("_type".to_string(), Value::String(doc_type.to_string()));
        }
        if let Some(id) = &self.id {
            meta.insert("_id".to_string(), Value::String(id.clone()));
        }

        let mut action = Map::new();
        action.insert(self.kind.name().to_string(), Value::Object(meta));
        out.push_str(&serde_json::to_string(&action)?);
        out.push('\n');

        if let Some(source) = &self.source {
            out.push_str(&serde_json::to_string(source)?);
            out.push('\n');
        }
        Ok(())
    }
}

/// A batch of actions sent as one NDJSON request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bulk {
    actions: Vec<BulkAction>,
}

impl Bulk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: BulkAction) -> &mut Self {
        self.actions.push(action);
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Render the request body; every line, including the last, ends in `\n`
    pub fn to_ndjson(&self, default_index: Option<&str>, default_type: Option<&str>) -> Result<String> {
        let mut out = String::new();
        for action in &self.actions {
            action.write_lines(&mut out, default_index, default_type)?;
        }
        Ok(out)
    }
}

impl Extend<BulkAction> for Bulk {
    fn extend<T: IntoIterator<Item = BulkAction>>(&mut self, iter: T) {
        self.actions.extend(iter);
    }
}

impl FromIterator<BulkAction> for Bulk {
    fn from_iter<T: IntoIterator<Item = BulkAction>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl Client {
    /// Send a batch of index/create/update/delete actions
    ///
    /// Per-item failures don't fail the call; check `errors` and
    /// [`BulkResponse::failed_items`].
    pub async fn bulk(&self, bulk: &Bulk, opts: RequestOptions) -> Result<BulkResponse> {
        if bulk.is_empty() {
            return Ok(BulkResponse {
                took: 0,
                errors: false,
                items: Vec::new(),
            });
        }

        let scope = self.scope(&opts);
        let body = bulk.to_ndjson(scope.single(), self.doc_type(&opts))?;
        let request = TransportRequest::new(Method::POST, Endpoint::root().action("_bulk"))
            .params(opts.params)
            .ndjson_body(body);
        let resp = ResponseMapper::bulk(self.send(request).await?)?;

        if resp.errors {
            warn!(
                failed = resp.failed_items().count(),
                total = resp.items.len(),
                "bulk request had item failures"
            );
        } else {
            debug!(items = resp.items.len(), took_ms = resp.took, "bulk request complete");
        }
        Ok(resp)
    }
}
