//! Query endpoints: _search, _count, _delete_by_query

use crate::client::Client;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::query::Query;
use crate::response::{DeleteByQueryResponse, Hits, ResponseMapper};
use crate::transport::TransportRequest;
use crate::uri::{Endpoint, IndexScope};
use reqwest::Method;
use tracing::{debug, info};

impl Client {
    /// Run a search
    ///
    /// A query string goes out as `GET _search?q=...`. A DSL value is posted
    /// as the complete search body, so `size`, `from`, `sort` and friends
    /// belong inside it.
    pub async fn search(&self, query: impl Into<Query>, opts: RequestOptions) -> Result<Hits> {
        let scope = self.search_scope(&opts);
        let request = self.query_request(scope, "_search", query.into(), opts, false);
        let hits = ResponseMapper::search(self.send(request).await?)?;

        debug!(total = hits.total, returned = hits.len(), took_ms = hits.took, "search complete");
        Ok(hits)
    }

    /// Run a search and return only the matching ids
    pub async fn search_ids(
        &self,
        query: impl Into<Query>,
        opts: RequestOptions,
    ) -> Result<Vec<String>> {
        let scope = self.search_scope(&opts);
        let request = self.query_request(scope, "_search", query.into(), opts, true);
        let hits = ResponseMapper::search(self.send(request).await?)?;
        Ok(hits.ids())
    }

    /// Count matching documents
    ///
    /// A DSL value may be a bare clause (`{"term": {...}}`); it is wrapped in
    /// a `query` envelope if it doesn't already have one.
    pub async fn count(&self, query: impl Into<Query>, opts: RequestOptions) -> Result<u64> {
        let scope = self.search_scope(&opts);
        let query = match query.into() {
            Query::Dsl(value) => Query::Dsl(Query::enveloped(value)),
            q => q,
        };
        let request = self.query_request(scope, "_count", query, opts, false);
        ResponseMapper::count(self.send(request).await?)
    }

    /// Delete every document matching the query
    ///
    /// Scoped to the default (or given) index; a client with no default
    /// index deletes across all indices.
    pub async fn delete_by_query(
        &self,
        query: impl Into<Query>,
        opts: RequestOptions,
    ) -> Result<DeleteByQueryResponse> {
        let scope = self.search_scope(&opts);
        let query = match query.into() {
            Query::Dsl(value) => Query::Dsl(Query::enveloped(value)),
            q => q,
        };
        let scope_name = scope.segment().unwrap_or_default();
        let request = self.query_request(scope, "_delete_by_query", query, opts, false);
        let resp = ResponseMapper::deleted_by_query(self.send(request).await?)?;

        info!(scope = %scope_name, deleted = resp.deleted, "delete by query");
        Ok(resp)
    }

    fn query_request(
        &self,
        scope: IndexScope,
        action: &str,
        query: Query,
        opts: RequestOptions,
        ids_only: bool,
    ) -> TransportRequest {
        let endpoint = Endpoint::new(scope)
            .doc_type(self.doc_type(&opts))
            .action(action);

        // _delete_by_query only accepts POST
        let must_post = action == "_delete_by_query";

        match query {
            Query::QueryString(q) => {
                let mut opts = opts.param("q", q);
                if ids_only {
                    opts = opts.param("_source", false);
                }
                let method = if must_post { Method::POST } else { Method::GET };
                TransportRequest::new(method, endpoint).params(opts.params)
            }
            Query::Dsl(body) => {
                let body = if ids_only {
                    Query::without_source(body)
                } else {
                    body
                };
                TransportRequest::new(Method::POST, endpoint)
                    .params(opts.params)
                    .json_body(body.to_string())
            }
        }
    }
}
