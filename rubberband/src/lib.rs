//! rubberband: an Elasticsearch client
//!
//! Translates method calls into Elasticsearch REST requests and maps the
//! JSON responses back into typed results. Each operation is one HTTP round
//! trip; there is no retry, pooling policy or streaming.
//!
//! ```no_run
//! use rubberband::{Client, ClientConfig, RequestOptions};
//! use serde_json::json;
//!
//! # async fn demo() -> rubberband::Result<()> {
//! let client = Client::new(
//!     ClientConfig::new("http://127.0.0.1:9200")
//!         .with_index("tweets")
//!         .with_doc_type("tweet"),
//! )?;
//!
//! client
//!     .index(&json!({"user": "kimchy"}), Some("1"), RequestOptions::new().refresh(true))
//!     .await?;
//! let hit = client.get("1", RequestOptions::new()).await?;
//! let hits = client.search("user:kimchy", RequestOptions::new()).await?;
//! let n = client.count(json!({"term": {"user": "kimchy"}}), RequestOptions::new()).await?;
//! # let _ = (hit, hits, n);
//! # Ok(())
//! # }
//! ```
//!
//! # Operations
//!
//! - `index` / `get` / `delete` / `multi_get` - single documents
//! - `search` / `search_ids` / `count` / `delete_by_query` - queries
//! - `bulk` - batched index/create/update/delete
//! - `refresh`, `create_index`, `delete_index`, `index_exists`, mappings
//! - `cluster_health`, `nodes_info`, `all_nodes`

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod query;
pub mod response;
pub mod transport;
pub mod uri;


pub use api::{Bulk, BulkAction, MultiGet};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use options::RequestOptions;
pub use query::Query;
pub use response::{
    BulkResponse, ClusterHealth, DeleteByQueryResponse, Document, Hit, Hits, IndexResponse,
};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use uri::{Endpoint, IndexScope};
