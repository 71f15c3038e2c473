//! Per-request options

use crate::uri::IndexScope;

/// Scope overrides and URL parameters for a single call
///
/// Anything that isn't index/type scoping travels as a query parameter, in
/// the order it was added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub scope: IndexScope,
    pub doc_type: Option<String>,
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a single index instead of the client default
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.scope = IndexScope::named(index);
        self
    }

    /// Target several indices
    pub fn indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = IndexScope::Named(indices.into_iter().map(Into::into).collect());
        self
    }

    /// Target every index
    pub fn all_indices(mut self) -> Self {
        self.scope = IndexScope::All;
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Make the change visible to search before the call returns
    pub fn refresh(self, refresh: bool) -> Self {
        self.param("refresh", refresh)
    }

    pub fn routing(self, routing: impl Into<String>) -> Self {
        self.param("routing", routing.into())
    }

    pub fn size(self, size: usize) -> Self {
        self.param("size", size)
    }

    pub fn from(self, from: usize) -> Self {
        self.param("from", from)
    }

    /// Any other URL parameter; a repeated key replaces the earlier value
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }
}
