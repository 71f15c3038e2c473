//! URL assembly for Elasticsearch REST endpoints
//!
//! An [`Endpoint`] names the logical target of a request (index scope, type,
//! id, action). [`build_url`] turns it plus query parameters into a full URL
//! under the configured server, percent-encoding every path segment so ids
//! and names containing `/`, `'` or spaces survive intact.

use crate::error::{Error, Result};
use url::Url;

/// Type used for document-level operations when none is configured
pub const DEFAULT_DOC_TYPE: &str = "_doc";

/// Which indices a request addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IndexScope {
    /// The client's configured default index (if any)
    #[default]
    Default,
    /// One or more explicit indices
    Named(Vec<String>),
    /// Every index in the cluster
    All,
}

impl IndexScope {
    pub fn named(index: impl Into<String>) -> Self {
        Self::Named(vec![index.into()])
    }

    /// Resolve `Default` against the client's default index
    pub fn resolve(&self, default_index: Option<&str>) -> IndexScope {
        match self {
            Self::Default => match default_index {
                Some(index) => Self::named(index),
                None => Self::Default,
            },
            other => other.clone(),
        }
    }

    /// Render as a single path segment; `None` for an unresolved default
    pub fn segment(&self) -> Option<String> {
        match self {
            Self::Default => None,
            Self::All => Some("_all".to_string()),
            Self::Named(names) if names.is_empty() => Some("_all".to_string()),
            Self::Named(names) => Some(
                names
                    .iter()
                    .map(|n| n.to_lowercase())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    /// The single concrete index this scope names, if exactly one
    pub fn single(&self) -> Option<&str> {
        match self {
            Self::Named(names) if names.len() == 1 => Some(names[0].as_str()),
            _ => None,
        }
    }
}

impl From<&str> for IndexScope {
    fn from(index: &str) -> Self {
        Self::named(index)
    }
}

impl From<String> for IndexScope {
    fn from(index: String) -> Self {
        Self::named(index)
    }
}

impl From<Vec<String>> for IndexScope {
    fn from(indices: Vec<String>) -> Self {
        Self::Named(indices)
    }
}

/// Logical target of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub scope: IndexScope,
    pub doc_type: Option<String>,
    pub id: Option<String>,
    pub action: Option<String>,
}

impl Endpoint {
    pub fn new(scope: IndexScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    /// Endpoint not bound to any index, e.g. `/_bulk` or `/_cluster/health`
    pub fn root() -> Self {
        Self::default()
    }

    pub fn doc_type(mut self, doc_type: Option<impl Into<String>>) -> Self {
        self.doc_type = doc_type.map(Into::into);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Check that every caller-supplied segment addresses exactly one path
    /// segment
    ///
    /// URL path normalisation drops `.` and `..` (even percent-encoded) and
    /// collapses empty segments, which would silently retarget the request
    /// at a parent endpoint.
    pub fn validate(&self) -> Result<()> {
        if let IndexScope::Named(names) = &self.scope {
            for name in names {
                check_segment("index name", name)?;
            }
        }
        if let Some(doc_type) = &self.doc_type {
            check_segment("type", doc_type)?;
        }
        if let Some(id) = &self.id {
            check_segment("id", id)?;
        }
        Ok(())
    }

    /// Path segments in order: index scope, type, id, action
    ///
    /// Actions may contain `/` (e.g. `_cluster/health`) and are split so
    /// their separators are kept literal.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = Vec::with_capacity(4);
        if let Some(scope) = self.scope.segment() {
            segments.push(scope);
        }
        if let Some(doc_type) = &self.doc_type {
            segments.push(doc_type.clone());
        }
        if let Some(id) = &self.id {
            segments.push(id.clone());
        }
        if let Some(action) = &self.action {
            segments.extend(
                action
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }
        segments
    }
}

fn check_segment(kind: &'static str, value: &str) -> Result<()> {
    if matches!(value, "" | "." | "..") {
        return Err(Error::InvalidName {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Build the full request URL for an endpoint under `base`
pub fn build_url(base: &Url, endpoint: &Endpoint, params: &[(String, String)]) -> Result<Url> {
    endpoint.validate()?;
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::Config(format!("server URL cannot be a base: {}", base)))?;
        path.pop_if_empty();
        path.extend(endpoint.segments());
    }
    url.set_query(None);
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}
