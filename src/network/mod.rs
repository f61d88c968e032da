//! HTTP networking module
//!
//! Provides the search engine client and the trait the search service talks to.

mod backend;
mod client;

pub use backend::{BackendError, SearchBackend};
pub use client::{BulkSummary, ElasticClient};
