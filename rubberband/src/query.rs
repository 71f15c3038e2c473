//! Query input for search, count and delete-by-query

use serde_json::{json, Map, Value};

/// A search query: either Lucene query-string syntax or a Query DSL value
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Sent as the `q` URL parameter
    QueryString(String),
    /// Sent as the JSON request body
    Dsl(Value),
}

impl Query {
    pub fn match_all() -> Self {
        Self::Dsl(json!({ "match_all": {} }))
    }

    /// `{"term": {field: value}}`
    pub fn term(field: &str, value: impl Into<Value>) -> Self {
        let mut clause = Map::new();
        clause.insert(field.to_string(), value.into());
        Self::Dsl(json!({ "term": clause }))
    }

    /// Body for endpoints that expect a `{"query": ...}` envelope
    ///
    /// A bare clause such as `{"term": {...}}` is wrapped; a value that
    /// already carries a top-level `query` key is sent unchanged.
    pub(crate) fn enveloped(value: Value) -> Value {
        match value {
            Value::Object(ref obj) if obj.contains_key("query") => value,
            clause => json!({ "query": clause }),
        }
    }

    /// Search body asking for ids only
    pub(crate) fn without_source(value: Value) -> Value {
        match value {
            Value::Object(mut obj) => {
                obj.insert("_source".to_string(), Value::Bool(false));
                Value::Object(obj)
            }
            other => other,
        }
    }
}

impl From<&str> for Query {
    fn from(q: &str) -> Self {
        Self::QueryString(q.to_string())
    }
}

impl From<String> for Query {
    fn from(q: String) -> Self {
        Self::QueryString(q)
    }
}

impl From<Value> for Query {
    fn from(dsl: Value) -> Self {
        Self::Dsl(dsl)
    }
}
