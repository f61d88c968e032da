//! Search engine collaborator trait

use crate::results::RawDocument;
use async_trait::async_trait;
use serde_json::Value;

/// Failures talking to the search engine
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; the body is kept for logging only
    #[error("engine returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("undecodable engine response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

/// The engine operations the search service depends on
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search request body against an index and return the raw response
    async fn search(&self, index: &str, body: &Value) -> Result<Value, BackendError>;

    /// Fetch a document by id; `None` when it does not exist
    async fn get_document(&self, index: &str, id: &str)
        -> Result<Option<RawDocument>, BackendError>;

    /// Whether the engine is reachable
    async fn ping(&self) -> Result<bool, BackendError>;
}
