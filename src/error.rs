//! Error types for search operations

use crate::collections::Collection;
use crate::query::Operation;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the search operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed, missing or contradictory caller input
    #[error("{0}")]
    Validation(String),

    /// The referenced document does not exist
    #[error("{collection} document '{id}' not found")]
    NotFound { collection: Collection, id: String },

    /// The engine call failed or returned something undecodable
    #[error("{operation} on {collection} failed: {message}")]
    Upstream {
        operation: Operation,
        collection: Collection,
        message: String,
    },

    /// An expected aggregation or field is missing from a successful response
    #[error("{operation} on {collection} returned an incomplete response: {message}")]
    UpstreamShape {
        operation: Operation,
        collection: Collection,
        message: String,
    },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Upstream { .. } => "upstream",
            Self::UpstreamShape { .. } => "upstream_shape",
        }
    }
}
