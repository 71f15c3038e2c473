//! In-process fake Elasticsearch for integration tests.
//!
//! Serves just enough of the REST API (documents, _search, _count,
//! _delete_by_query, _mget, _bulk, _refresh, index admin, cluster info) over
//! a real HTTP listener so the client is exercised end to end through
//! reqwest. Documents only become searchable after a refresh, as on a real
//! cluster; get is realtime.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::form_urlencoded;

type Shared = Arc<RwLock<FakeState>>;

#[derive(Debug, Clone)]
struct StoredDoc {
    doc_type: String,
    source: Map<String, Value>,
    version: u64,
    visible: bool,
}

#[derive(Debug, Default)]
struct IndexState {
    docs: BTreeMap<String, StoredDoc>,
    mapping: Option<Value>,
}

#[derive(Debug, Default)]
struct FakeState {
    indices: BTreeMap<String, IndexState>,
    fail_next: Option<u16>,
    next_id: u64,
    requests: Vec<String>,
    addr: String,
}

struct Req {
    method: String,
    segments: Vec<String>,
    params: Vec<(String, String)>,
    body: Bytes,
}

impl Req {
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn refresh(&self) -> bool {
        matches!(self.param("refresh"), Some("true") | Some("") | Some("wait_for"))
    }

    fn json(&self) -> Result<Option<Value>, Response> {
        if self.body.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&self.body)
            .map(Some)
            .map_err(|e| reply(400, es_error("parse_exception", &e.to_string())))
    }
}

/// Handle to a running fake server
pub struct FakeElasticsearch {
    state: Shared,
    pub url: String,
}

impl FakeElasticsearch {
    /// Bind to a random local port and start serving
    pub async fn start() -> Self {
        let state: Shared = Arc::new(RwLock::new(FakeState::default()));
        let router = Router::new().fallback(dispatch).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        state.write().addr = addr.to_string();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            state,
            url: format!("http://{}", addr),
        }
    }

    /// Answer the next request with this status and an error body
    pub fn fail_next(&self, status: u16) {
        self.state.write().fail_next = Some(status);
    }

    /// `METHOD /path?query` of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.state.read().requests.clone()
    }

    /// Stored documents in an index, searchable or not
    pub fn doc_count(&self, index: &str) -> usize {
        self.state
            .read()
            .indices
            .get(index)
            .map(|i| i.docs.len())
            .unwrap_or(0)
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.state.read().indices.contains_key(index)
    }
}

async fn dispatch(State(state): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response {
    let segments = uri
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect();
    let params = uri
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let mut state = state.write();
    state.requests.push(format!("{} {}", method, uri));
    if let Some(status) = state.fail_next.take() {
        return reply(status, es_error("exception", "simulated failure"));
    }

    state.handle(Req {
        method: method.as_str().to_string(),
        segments,
        params,
        body,
    })
}

fn decode_segment(segment: &str) -> String {
    let escaped = segment
        .replace('+', "%2B")
        .replace('=', "%3D")
        .replace('&', "%26");
    form_urlencoded::parse(escaped.as_bytes())
        .map(|(k, _)| k.into_owned())
        .next()
        .unwrap_or_default()
}

fn reply(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, axum::Json(body)).into_response()
}

fn es_error(error_type: &str, reason: &str) -> Value {
    json!({
        "error": {
            "root_cause": [{"type": error_type, "reason": reason}],
            "type": error_type,
            "reason": reason
        },
        "status": 400
    })
}

fn index_not_found(index: &str) -> Response {
    reply(
        404,
        es_error("index_not_found_exception", &format!("no such index [{}]", index)),
    )
}

fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn value_tokens(v: &Value) -> Vec<String> {
    match v {
        Value::String(s) => tokens(s),
        Value::Array(items) => items.iter().flat_map(value_tokens).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string().to_lowercase()],
    }
}

fn field_matches(source: &Map<String, Value>, field: &str, wanted: &Value) -> bool {
    let Some(stored) = source.get(field) else {
        return false;
    };
    let stored = value_tokens(stored);
    value_tokens(wanted).iter().any(|t| stored.contains(t))
}

/// `{field: value}` or `{field: {"query"|"value": value}}`
fn single_field(clause: &Value) -> Result<(&str, &Value), String> {
    let obj = clause.as_object().ok_or("expected an object")?;
    let (field, value) = obj.iter().next().ok_or("empty clause")?;
    let value = value
        .get("query")
        .or_else(|| value.get("value"))
        .unwrap_or(value);
    Ok((field.as_str(), value))
}

fn clauses(v: Option<&Value>) -> Vec<&Value> {
    match v {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    }
}

fn query_matches(query: &Value, id: &str, source: &Map<String, Value>) -> Result<bool, String> {
    let obj = query.as_object().ok_or("query must be an object")?;
    let (kind, body) = obj.iter().next().ok_or("empty query")?;

    match kind.as_str() {
        "match_all" => Ok(true),
        "term" | "match" | "match_phrase" | "field" => {
            let (field, value) = single_field(body)?;
            Ok(field_matches(source, field, value))
        }
        "terms" => {
            let (field, values) = single_field(body)?;
            let values = values.as_array().ok_or("terms expects an array")?;
            Ok(values.iter().any(|v| field_matches(source, field, v)))
        }
        "ids" => {
            let values = body
                .get("values")
                .and_then(Value::as_array)
                .ok_or("ids expects values")?;
            Ok(values.iter().any(|v| v.as_str() == Some(id)))
        }
        "query_string" => {
            let q = body
                .get("query")
                .and_then(Value::as_str)
                .ok_or("query_string expects query")?;
            Ok(query_string_matches(q, source))
        }
        "bool" => {
            let must = clauses(body.get("must"))
                .into_iter()
                .chain(clauses(body.get("filter")))
                .collect::<Vec<_>>();
            let should = clauses(body.get("should"));
            let must_not = clauses(body.get("must_not"));

            for q in &must {
                if !query_matches(q, id, source)? {
                    return Ok(false);
                }
            }
            for q in &must_not {
                if query_matches(q, id, source)? {
                    return Ok(false);
                }
            }
            if !should.is_empty() && must.is_empty() {
                for q in &should {
                    if query_matches(q, id, source)? {
                        return Ok(true);
                    }
                }
                return Ok(false);
            }
            Ok(true)
        }
        other => Err(format!("no [query] registered for [{}]", other)),
    }
}

/// Whitespace-separated terms, OR-ed; each is `field:value` or a bare value
fn query_string_matches(q: &str, source: &Map<String, Value>) -> bool {
    q.split_whitespace().any(|term| {
        if term == "*" || term == "*:*" {
            return true;
        }
        match term.split_once(':') {
            Some((field, value)) => field_matches(source, field, &Value::String(value.into())),
            None => source
                .keys()
                .any(|field| field_matches(source, field, &Value::String(term.into()))),
        }
    })
}

impl FakeState {
    fn handle(&mut self, req: Req) -> Response {
        let segments = req.segments.clone();
        let segs: Vec<&str> = segments.iter().map(String::as_str).collect();

        match (req.method.as_str(), segs.as_slice()) {
            ("GET", []) => reply(200, json!({"version": {"number": "6.8.23"}, "tagline": "You Know, for Search"})),
            ("POST", ["_bulk"]) => self.bulk(&req),
            ("POST", ["_refresh"]) => self.refresh("_all"),
            ("GET", ["_cluster", "health"]) => reply(
                200,
                json!({
                    "cluster_name": "fake",
                    "status": "green",
                    "timed_out": false,
                    "number_of_nodes": 1,
                    "number_of_data_nodes": 1,
                    "active_primary_shards": self.indices.len(),
                    "active_shards": self.indices.len()
                }),
            ),
            ("GET", ["_nodes"]) => reply(
                200,
                json!({"nodes": {"fake-node": {"name": "fake", "http": {"publish_address": self.addr}}}}),
            ),
            ("POST", ["_mget"]) => self.mget(None, None, &req),
            ("PUT", [index]) => self.create_index(index, &req),
            ("DELETE", [index]) => match self.indices.remove(*index) {
                Some(_) => reply(200, json!({"acknowledged": true})),
                None => index_not_found(index),
            },
            ("HEAD", [index]) => {
                if self.indices.contains_key(*index) {
                    StatusCode::OK.into_response()
                } else {
                    StatusCode::NOT_FOUND.into_response()
                }
            }
            (_, [scope, action]) if action.starts_with('_') => {
                self.scoped_action(scope, None, action, &req)
            }
            (_, [scope, doc_type, action]) if action.starts_with('_') => {
                self.scoped_action(scope, Some(*doc_type), action, &req)
            }
            ("POST", [index, doc_type]) => self.index_doc(index, doc_type, None, &req),
            ("PUT" | "POST", [index, doc_type, id]) => self.index_doc(index, doc_type, Some(*id), &req),
            ("GET", [index, _doc_type, id]) => self.get_doc(index, id),
            ("DELETE", [index, _doc_type, id]) => self.delete_doc(index, id),
            _ => reply(400, es_error("illegal_argument_exception", "unsupported endpoint")),
        }
    }

    fn resolve(&self, scope: &str) -> Result<Vec<String>, Response> {
        if scope == "_all" {
            return Ok(self.indices.keys().cloned().collect());
        }
        let names: Vec<String> = scope.split(',').map(String::from).collect();
        for name in &names {
            if !self.indices.contains_key(name) {
                return Err(index_not_found(name));
            }
        }
        Ok(names)
    }

    fn scoped_action(&mut self, scope: &str, doc_type: Option<&str>, action: &str, req: &Req) -> Response {
        match (req.method.as_str(), action) {
            ("POST", "_refresh") => self.refresh(scope),
            ("GET" | "POST", "_search") => self.search(scope, doc_type, req),
            ("GET" | "POST", "_count") => self.count(scope, doc_type, req),
            ("POST", "_delete_by_query") => self.delete_by_query(scope, doc_type, req),
            ("GET" | "POST", "_mget") => self.mget(Some(scope), doc_type, req),
            ("PUT", "_mapping") => {
                let mapping = match req.json() {
                    Ok(Some(m)) => m,
                    Ok(None) => return reply(400, es_error("parse_exception", "mapping body required")),
                    Err(resp) => return resp,
                };
                match self.indices.get_mut(scope) {
                    Some(index) => {
                        index.mapping = Some(mapping);
                        reply(200, json!({"acknowledged": true}))
                    }
                    None => index_not_found(scope),
                }
            }
            ("GET", "_mapping") => {
                let names = match self.resolve(scope) {
                    Ok(n) => n,
                    Err(resp) => return resp,
                };
                let mut out = Map::new();
                for name in names {
                    let mapping = self.indices[&name].mapping.clone().unwrap_or(json!({}));
                    out.insert(name, json!({ "mappings": mapping }));
                }
                reply(200, Value::Object(out))
            }
            _ => reply(400, es_error("illegal_argument_exception", "unsupported action")),
        }
    }

    fn refresh(&mut self, scope: &str) -> Response {
        let names = match self.resolve(scope) {
            Ok(n) => n,
            Err(resp) => return resp,
        };
        for name in &names {
            if let Some(index) = self.indices.get_mut(name) {
                for doc in index.docs.values_mut() {
                    doc.visible = true;
                }
            }
        }
        reply(200, json!({"_shards": {"total": names.len(), "successful": names.len(), "failed": 0}}))
    }

    fn create_index(&mut self, index: &str, req: &Req) -> Response {
        if self.indices.contains_key(index) {
            return reply(
                400,
                es_error("resource_already_exists_exception", &format!("index [{}] already exists", index)),
            );
        }
        let mapping = match req.json() {
            Ok(body) => body.and_then(|b| b.get("mappings").cloned()),
            Err(resp) => return resp,
        };
        self.indices.insert(
            index.to_string(),
            IndexState {
                docs: BTreeMap::new(),
                mapping,
            },
        );
        reply(200, json!({"acknowledged": true, "index": index}))
    }

    /// Store a document, returning (id, version, created)
    fn store(&mut self, index: &str, doc_type: &str, id: Option<&str>, source: Map<String, Value>, visible: bool) -> (String, u64, bool) {
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                self.next_id += 1;
                format!("auto-{}", self.next_id)
            }
        };
        let index = self.indices.entry(index.to_string()).or_default();
        let version = index.docs.get(&id).map(|d| d.version + 1).unwrap_or(1);
        index.docs.insert(
            id.clone(),
            StoredDoc {
                doc_type: doc_type.to_string(),
                source,
                version,
                visible,
            },
        );
        (id, version, version == 1)
    }

    fn index_doc(&mut self, index: &str, doc_type: &str, id: Option<&str>, req: &Req) -> Response {
        let source = match req.json() {
            Ok(Some(Value::Object(source))) => source,
            Ok(_) => return reply(400, es_error("mapper_parsing_exception", "failed to parse, document is empty or not an object")),
            Err(resp) => return resp,
        };
        let (id, version, created) = self.store(index, doc_type, id, source, req.refresh());
        reply(
            if created { 201 } else { 200 },
            json!({
                "_index": index,
                "_type": doc_type,
                "_id": id,
                "_version": version,
                "result": if created { "created" } else { "updated" }
            }),
        )
    }

    fn get_doc(&self, index: &str, id: &str) -> Response {
        let Some(state) = self.indices.get(index) else {
            return index_not_found(index);
        };
        match state.docs.get(id) {
            Some(doc) => reply(
                200,
                json!({
                    "_index": index,
                    "_type": doc.doc_type,
                    "_id": id,
                    "_version": doc.version,
                    "found": true,
                    "_source": doc.source
                }),
            ),
            None => reply(404, json!({"_index": index, "_id": id, "found": false})),
        }
    }

    fn delete_doc(&mut self, index: &str, id: &str) -> Response {
        let Some(state) = self.indices.get_mut(index) else {
            return index_not_found(index);
        };
        match state.docs.remove(id) {
            Some(doc) => reply(
                200,
                json!({"_index": index, "_id": id, "_version": doc.version + 1, "found": true, "result": "deleted"}),
            ),
            None => reply(
                404,
                json!({"_index": index, "_id": id, "found": false, "result": "not_found"}),
            ),
        }
    }

    /// Searchable docs matching the request's query, in (index, id) order
    fn matching(&self, scope: &str, doc_type: Option<&str>, req: &Req) -> Result<Vec<(String, String, StoredDoc)>, Response> {
        let names = self.resolve(scope)?;
        let body = req.json()?;
        if let Some(Value::Object(obj)) = &body {
            const KNOWN: [&str; 8] = ["query", "size", "from", "_source", "sort", "aggs", "stored_fields", "track_total_hits"];
            if let Some(key) = obj.keys().find(|k| !KNOWN.contains(&k.as_str())) {
                return Err(reply(400, es_error("parsing_exception", &format!("Unknown key for a START_OBJECT in [{}].", key))));
            }
        }
        let query = match (req.param("q"), body.as_ref().and_then(|b| b.get("query"))) {
            (Some(q), _) => json!({"query_string": {"query": q}}),
            (None, Some(query)) => query.clone(),
            (None, None) => json!({"match_all": {}}),
        };

        let mut out = Vec::new();
        for name in names {
            for (id, doc) in &self.indices[&name].docs {
                if !doc.visible || doc_type.is_some_and(|t| t != doc.doc_type) {
                    continue;
                }
                let hit = query_matches(&query, id, &doc.source)
                    .map_err(|reason| reply(400, es_error("parsing_exception", &reason)))?;
                if hit {
                    out.push((name.clone(), id.clone(), doc.clone()));
                }
            }
        }
        Ok(out)
    }

    fn search(&self, scope: &str, doc_type: Option<&str>, req: &Req) -> Response {
        let matches = match self.matching(scope, doc_type, req) {
            Ok(m) => m,
            Err(resp) => return resp,
        };
        let body = req.json().ok().flatten().unwrap_or(json!({}));
        let number = |key: &str, default: usize| {
            req.param(key)
                .and_then(|v| v.parse().ok())
                .or_else(|| body.get(key).and_then(Value::as_u64).map(|v| v as usize))
                .unwrap_or(default)
        };
        let size = number("size", 10);
        let from = number("from", 0);
        let with_source = req.param("_source") != Some("false") && body.get("_source") != Some(&json!(false));

        let total = matches.len();
        let hits: Vec<Value> = matches
            .into_iter()
            .skip(from)
            .take(size)
            .map(|(index, id, doc)| {
                let mut hit = json!({"_index": index, "_type": doc.doc_type, "_id": id, "_score": 1.0});
                if with_source {
                    hit["_source"] = Value::Object(doc.source);
                }
                hit
            })
            .collect();

        reply(
            200,
            json!({
                "took": 1,
                "timed_out": false,
                "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0},
                "hits": {
                    "total": {"value": total, "relation": "eq"},
                    "max_score": if total > 0 { json!(1.0) } else { Value::Null },
                    "hits": hits
                }
            }),
        )
    }

    fn count(&self, scope: &str, doc_type: Option<&str>, req: &Req) -> Response {
        match self.matching(scope, doc_type, req) {
            Ok(m) => reply(200, json!({"count": m.len(), "_shards": {"total": 1, "successful": 1, "failed": 0}})),
            Err(resp) => resp,
        }
    }

    fn delete_by_query(&mut self, scope: &str, doc_type: Option<&str>, req: &Req) -> Response {
        let matches = match self.matching(scope, doc_type, req) {
            Ok(m) => m,
            Err(resp) => return resp,
        };
        for (index, id, _) in &matches {
            if let Some(state) = self.indices.get_mut(index) {
                state.docs.remove(id);
            }
        }
        reply(
            200,
            json!({
                "took": 1,
                "timed_out": false,
                "total": matches.len(),
                "deleted": matches.len(),
                "version_conflicts": 0,
                "failures": []
            }),
        )
    }

    fn mget(&self, scope: Option<&str>, doc_type: Option<&str>, req: &Req) -> Response {
        let body = match req.json() {
            Ok(Some(body)) => body,
            Ok(None) => return reply(400, es_error("action_request_validation_exception", "no documents to get")),
            Err(resp) => return resp,
        };

        let requested: Vec<Value> = if let Some(ids) = body.get("ids").and_then(Value::as_array) {
            ids.iter().map(|id| json!({ "_id": id })).collect()
        } else if let Some(docs) = body.get("docs").and_then(Value::as_array) {
            docs.clone()
        } else {
            return reply(400, es_error("action_request_validation_exception", "no documents to get"));
        };

        let mut docs = Vec::with_capacity(requested.len());
        for item in requested {
            let id = item.get("_id").and_then(Value::as_str).unwrap_or_default();
            let Some(index) = item.get("_index").and_then(Value::as_str).or(scope) else {
                return reply(400, es_error("action_request_validation_exception", "index is missing"));
            };

            let found = self
                .indices
                .get(index)
                .and_then(|s| s.docs.get(id))
                .filter(|d| doc_type.map_or(true, |t| t == d.doc_type));

            let Some(doc) = found else {
                docs.push(json!({"_index": index, "_id": id, "found": false}));
                continue;
            };

            let mut out = json!({
                "_index": index,
                "_type": doc.doc_type,
                "_id": id,
                "_version": doc.version,
                "found": true
            });
            let wanted_fields = item
                .get("stored_fields")
                .or_else(|| item.get("fields"))
                .and_then(Value::as_array);
            match wanted_fields {
                Some(fields) => {
                    let mut selected = Map::new();
                    for field in fields.iter().filter_map(Value::as_str) {
                        if let Some(v) = doc.source.get(field) {
                            selected.insert(field.to_string(), json!([v]));
                        }
                    }
                    if !selected.is_empty() {
                        out["fields"] = Value::Object(selected);
                    }
                }
                None if item.get("_source") != Some(&json!(false)) => {
                    out["_source"] = Value::Object(doc.source.clone());
                }
                None => {}
            }
            docs.push(out);
        }

        reply(200, json!({ "docs": docs }))
    }

    /// NDJSON bulk body: action line, then a source line for everything but delete
    fn bulk(&mut self, req: &Req) -> Response {
        let text = match std::str::from_utf8(&req.body) {
            Ok(t) => t,
            Err(e) => return reply(400, es_error("parse_exception", &e.to_string())),
        };
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let visible = req.refresh();

        let mut items = Vec::new();
        let mut errors = false;
        let mut i = 0;
        while i < lines.len() {
            let action: Value = match serde_json::from_str(lines[i]) {
                Ok(a) => a,
                Err(e) => return reply(400, es_error("parse_exception", &format!("Invalid action: {}", e))),
            };
            let Some((kind, meta)) = action.as_object().and_then(|o| o.iter().next()) else {
                return reply(400, es_error("parse_exception", "empty action"));
            };
            let index = meta.get("_index").and_then(Value::as_str).unwrap_or_default().to_string();
            let doc_type = meta.get("_type").and_then(Value::as_str).unwrap_or("_doc").to_string();
            let id = meta.get("_id").and_then(Value::as_str).map(String::from);

            let source = if kind == "delete" {
                None
            } else {
                i += 1;
                match lines.get(i).map(|l| serde_json::from_str::<Value>(l)) {
                    Some(Ok(v)) => Some(v),
                    _ => return reply(400, es_error("parse_exception", "Missing document body")),
                }
            };
            i += 1;

            let item = match (kind.as_str(), source) {
                ("index", Some(Value::Object(src))) => {
                    let (id, version, created) = self.store(&index, &doc_type, id.as_deref(), src, visible);
                    json!({"_index": index, "_id": id, "_version": version, "status": if created { 201 } else { 200 },
                        "result": if created { "created" } else { "updated" }})
                }
                ("create", Some(Value::Object(src))) => {
                    let exists = id
                        .as_deref()
                        .is_some_and(|id| self.indices.get(&index).is_some_and(|s| s.docs.contains_key(id)));
                    if exists {
                        errors = true;
                        json!({"_index": index, "_id": id.unwrap_or_default(), "status": 409,
                            "error": {"type": "version_conflict_engine_exception", "reason": "document already exists"}})
                    } else {
                        let (id, version, _) = self.store(&index, &doc_type, id.as_deref(), src, visible);
                        json!({"_index": index, "_id": id, "_version": version, "status": 201, "result": "created"})
                    }
                }
                ("update", Some(update)) => {
                    let id = id.unwrap_or_default();
                    let existing = self.indices.get(&index).and_then(|s| s.docs.get(&id)).cloned();
                    match (existing, update.get("doc").and_then(Value::as_object)) {
                        (Some(mut doc), Some(partial)) => {
                            for (k, v) in partial {
                                doc.source.insert(k.clone(), v.clone());
                            }
                            let (id, version, _) = self.store(&index, &doc.doc_type, Some(id.as_str()), doc.source, visible);
                            json!({"_index": index, "_id": id, "_version": version, "status": 200, "result": "updated"})
                        }
                        _ => {
                            errors = true;
                            json!({"_index": index, "_id": id, "status": 404,
                                "error": {"type": "document_missing_exception", "reason": "document missing"}})
                        }
                    }
                }
                ("delete", None) => {
                    let id = id.unwrap_or_default();
                    let removed = self.indices.get_mut(&index).and_then(|s| s.docs.remove(&id));
                    match removed {
                        Some(_) => json!({"_index": index, "_id": id, "status": 200, "result": "deleted"}),
                        None => json!({"_index": index, "_id": id, "status": 404, "result": "not_found"}),
                    }
                }
                _ => {
                    errors = true;
                    json!({"_index": index, "_id": id.unwrap_or_default(), "status": 400,
                        "error": {"type": "mapper_parsing_exception", "reason": "unsupported bulk line"}})
                }
            };
            items.push(json!({ kind.clone(): item }));
        }

        reply(200, json!({"took": 1, "errors": errors, "items": items}))
    }
}
