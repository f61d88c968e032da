//! HTTP request handlers

use super::state::AppState;
use crate::collections::Collection;
use crate::error::{Error, Result};
use crate::results::ResultEnvelope;
use crate::search::{AdvancedSearchRequest, HealthStatus};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Upstream { .. } | Error::UpstreamShape { .. } => StatusCode::BAD_GATEWAY,
        };
        let body = json!({ "error": self.to_string(), "kind": self.kind() });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

/// Query parameters for text operations
#[derive(Debug, Deserialize)]
pub struct TextParams {
    pub q: Option<String>,
}

/// Query parameters for top rankings
#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub sort_by: Option<String>,
}

type EnvelopeResult = Result<Json<ResultEnvelope>>;

/// API index
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.instance_name(),
        "version": crate::VERSION,
        "collections": state.search.registry().names(),
        "endpoints": [
            "GET /health",
            "GET /stats",
            "GET /:collection/search?q=",
            "GET|POST /:collection/filter",
            "GET /:collection/autocomplete?q=",
            "GET /:collection/similar/:id",
            "POST /:collection/advanced",
            "GET /:collection/dashboard",
            "GET /:collection/top?sort_by=",
            "GET /:collection/facet/:value"
        ]
    }))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.search.health().await;
    let (status, label) = match engine {
        HealthStatus::Healthy => (StatusCode::OK, "ok"),
        HealthStatus::Unreachable => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };
    (
        status,
        Json(json!({
            "status": label,
            "engine": engine,
            "version": crate::VERSION
        })),
    )
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.metrics().snapshot())
}

pub async fn search(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<TextParams>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    let term = params.q.unwrap_or_default();
    Ok(Json(state.search.search_text(collection, &term).await?))
}

/// Filters from the query string
pub async fn filter(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    let params = params.into_iter().map(|(k, v)| (k, Value::String(v)));
    Ok(Json(state.search.filter(collection, params).await?))
}

/// Filters from a JSON body
pub async fn filter_json(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    let Json(params) = body?;
    Ok(Json(state.search.filter(collection, params).await?))
}

pub async fn autocomplete(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<TextParams>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    let prefix = params.q.unwrap_or_default();
    Ok(Json(state.search.autocomplete(collection, &prefix).await?))
}

pub async fn similar(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    Ok(Json(state.search.similar(collection, &id).await?))
}

pub async fn advanced(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: std::result::Result<Json<AdvancedSearchRequest>, JsonRejection>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    let Json(request) = body?;
    Ok(Json(state.search.advanced_search(collection, request).await?))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    Ok(Json(state.search.dashboard(collection).await?))
}

pub async fn top(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<TopParams>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    Ok(Json(
        state
            .search
            .top(collection, params.sort_by.as_deref())
            .await?,
    ))
}

pub async fn facet(
    State(state): State<AppState>,
    Path((collection, value)): Path<(String, String)>,
) -> EnvelopeResult {
    let collection: Collection = collection.parse()?;
    Ok(Json(state.search.facet(collection, &value).await?))
}
