//! Search orchestration module
//!
//! Builds engine requests, executes them against the search backend and
//! formats the responses, recording timing along the way.

mod models;
mod service;

pub use models::*;
pub use service::SearchService;
