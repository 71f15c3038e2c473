//! Cluster endpoints: health and node discovery

use crate::client::Client;
use crate::error::Result;
use crate::response::ClusterHealth;
use crate::transport::TransportRequest;
use crate::uri::Endpoint;
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use std::sync::OnceLock;

/// Legacy node address form: `inet[/127.0.0.1:9200]` or `inet[host/10.0.0.1:9200]`
fn legacy_address() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"inet\[.*/([\d.:]+)\]").expect("valid regex"))
}

/// HTTP addresses (`host:port`) of every node in a `_nodes` response
///
/// Nodes without HTTP enabled are skipped.
pub fn http_addresses(nodes_info: &Value) -> Vec<String> {
    let Some(nodes) = nodes_info.get("nodes").and_then(Value::as_object) else {
        return Vec::new();
    };

    nodes
        .values()
        .filter_map(|node| {
            if let Some(legacy) = node.get("http_address").and_then(Value::as_str) {
                return legacy_address()
                    .captures(legacy)
                    .map(|caps| caps[1].to_string());
            }
            node.pointer("/http/publish_address")
                .and_then(Value::as_str)
                .map(publish_address)
        })
        .collect()
}

/// `publish_address` is `ip:port` or `hostname/ip:port`
fn publish_address(raw: &str) -> String {
    raw.rsplit('/').next().unwrap_or(raw).to_string()
}

impl Client {
    pub async fn cluster_health(&self) -> Result<ClusterHealth> {
        let request =
            TransportRequest::new(Method::GET, Endpoint::root().action("_cluster/health"));
        self.send(request).await?.expect_status(&[200])?.json()
    }

    /// Raw `_nodes` info
    pub async fn nodes_info(&self) -> Result<Value> {
        let request = TransportRequest::new(Method::GET, Endpoint::root().action("_nodes"));
        self.send(request).await?.expect_status(&[200])?.json()
    }

    /// HTTP addresses of all nodes in the cluster
    pub async fn all_nodes(&self) -> Result<Vec<String>> {
        Ok(http_addresses(&self.nodes_info().await?))
    }
}
