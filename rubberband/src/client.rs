//! The public client
//!
//! Operations live in [`crate::api`], grouped by endpoint family; this module
//! holds the shared state and the scope resolution every operation goes
//! through.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
use crate::uri::{Endpoint, IndexScope, DEFAULT_DOC_TYPE};
use std::sync::Arc;

/// Elasticsearch client bound to a server and, optionally, a default
/// index and type
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    index: Option<String>,
    doc_type: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.transport.base_url().as_str())
            .field("index", &self.index)
            .field("doc_type", &self.doc_type)
            .finish()
    }
}

impl Client {
    /// Create a client with an HTTP transport built from `config`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Unscoped client for the server at `url`
    pub fn connect(url: &str) -> Result<Self> {
        Self::new(ClientConfig::new(url))
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            index: config.index,
            doc_type: config.doc_type,
        }
    }

    /// A client sharing this one's session but with different defaults
    pub fn scoped(&self, index: Option<&str>, doc_type: Option<&str>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            index: index.map(String::from),
            doc_type: doc_type.map(String::from),
        }
    }

    pub fn default_index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn default_doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        request.endpoint.validate()?;
        self.transport.send(request).await
    }

    /// Scope for a multi-index operation, falling back to the default index
    pub(crate) fn scope(&self, opts: &RequestOptions) -> IndexScope {
        opts.scope.resolve(self.index.as_deref())
    }

    /// Scope for search-style operations: unscoped clients address `_all`
    pub(crate) fn search_scope(&self, opts: &RequestOptions) -> IndexScope {
        match self.scope(opts) {
            IndexScope::Default => IndexScope::All,
            scope => scope,
        }
    }

    pub(crate) fn doc_type<'a>(&'a self, opts: &'a RequestOptions) -> Option<&'a str> {
        opts.doc_type.as_deref().or(self.doc_type.as_deref())
    }

    /// Endpoint for a single-document operation
    ///
    /// Requires exactly one concrete index; the type falls back to `_doc`.
    pub(crate) fn document_endpoint(
        &self,
        opts: &RequestOptions,
        operation: &'static str,
    ) -> Result<Endpoint> {
        let scope = self.scope(opts);
        let index = scope.single().ok_or(Error::MissingIndex(operation))?;
        Ok(Endpoint::new(IndexScope::named(index))
            .doc_type(Some(self.doc_type(opts).unwrap_or(DEFAULT_DOC_TYPE))))
    }
}
