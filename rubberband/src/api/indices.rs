//! Index administration: refresh, create/delete/exists, mappings

use crate::client::Client;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::response::ResponseMapper;
use crate::transport::TransportRequest;
use crate::uri::{Endpoint, IndexScope};
use reqwest::Method;
use serde_json::Value;
use tracing::info;

impl Client {
    /// Make recent changes searchable
    ///
    /// Refreshes the default (or given) index; an unscoped client refreshes
    /// everything.
    pub async fn refresh(&self, opts: RequestOptions) -> Result<()> {
        let endpoint = Endpoint::new(self.scope(&opts)).action("_refresh");
        let request = TransportRequest::new(Method::POST, endpoint).params(opts.params);
        ResponseMapper::acknowledged(self.send(request).await?)
    }

    /// Create an index, optionally with a settings/mappings body
    pub async fn create_index(&self, name: &str, body: Option<Value>) -> Result<()> {
        let mut request = TransportRequest::new(Method::PUT, Endpoint::new(IndexScope::named(name)));
        if let Some(body) = body {
            request = request.json_body(body.to_string());
        }
        ResponseMapper::acknowledged(self.send(request).await?)?;

        info!(index = name, "created index");
        Ok(())
    }

    /// Delete an index; `false` if it didn't exist
    pub async fn delete_index(&self, name: &str) -> Result<bool> {
        let request = TransportRequest::new(Method::DELETE, Endpoint::new(IndexScope::named(name)));
        let response = self.send(request).await?;
        if response.status == 404 {
            return Ok(false);
        }
        ResponseMapper::acknowledged(response)?;

        info!(index = name, "deleted index");
        Ok(true)
    }

    pub async fn index_exists(&self, name: &str) -> Result<bool> {
        let request = TransportRequest::new(Method::HEAD, Endpoint::new(IndexScope::named(name)));
        let response = self.send(request).await?;
        match response.status {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(Error::from_response(status, &response.body)),
        }
    }

    /// Put a mapping on the default (or given) index and type
    pub async fn put_mapping(&self, mapping: &Value, opts: RequestOptions) -> Result<()> {
        let scope = self.scope(&opts);
        if scope == IndexScope::Default {
            return Err(Error::MissingIndex("put_mapping"));
        }
        let endpoint = Endpoint::new(scope)
            .doc_type(self.doc_type(&opts))
            .action("_mapping");
        let request = TransportRequest::new(Method::PUT, endpoint)
            .params(opts.params)
            .json_body(mapping.to_string());
        ResponseMapper::acknowledged(self.send(request).await?)
    }

    /// Mappings for the default (or given) index and type
    pub async fn get_mapping(&self, opts: RequestOptions) -> Result<Value> {
        let endpoint = Endpoint::new(self.scope(&opts))
            .doc_type(self.doc_type(&opts))
            .action("_mapping");
        let request = TransportRequest::new(Method::GET, endpoint).params(opts.params);
        self.send(request).await?.expect_status(&[200])?.json()
    }
}
