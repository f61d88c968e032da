//! rpg-search: search, filtering, autocomplete and dashboards over RPG
//! collections stored in Elasticsearch
//!
//! Every operation is built against a static per-collection schema, executed
//! in a single engine round trip and normalized into a [`ResultEnvelope`].

pub mod collections;
pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod query;
pub mod results;
pub mod search;
pub mod web;

pub use collections::Collection;
pub use config::Settings;
pub use error::{Error, Result};
pub use results::ResultEnvelope;
pub use search::SearchService;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
