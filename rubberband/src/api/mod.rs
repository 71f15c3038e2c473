//! Client operations, one module per endpoint family

pub mod bulk;
pub mod cluster;
pub mod document;
pub mod indices;
pub mod search;

pub use bulk::{Bulk, BulkAction};
pub use cluster::http_addresses;
pub use document::MultiGet;
