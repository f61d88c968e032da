//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Service routes
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Collection operations
        .route("/:collection/search", get(handlers::search))
        .route(
            "/:collection/filter",
            get(handlers::filter).post(handlers::filter_json),
        )
        .route("/:collection/autocomplete", get(handlers::autocomplete))
        .route("/:collection/similar/:id", get(handlers::similar))
        .route("/:collection/advanced", post(handlers::advanced))
        .route("/:collection/dashboard", get(handlers::dashboard))
        .route("/:collection/top", get(handlers::top))
        .route("/:collection/facet/:value", get(handlers::facet))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::network::{BackendError, SearchBackend};
    use crate::results::RawDocument;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Answers every search with the same response
    struct StaticBackend {
        response: Option<Value>,
    }

    #[async_trait]
    impl SearchBackend for StaticBackend {
        async fn search(&self, _index: &str, _body: &Value) -> Result<Value, BackendError> {
            self.response.clone().ok_or(BackendError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        async fn get_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<Option<RawDocument>, BackendError> {
            Ok(None)
        }

        async fn ping(&self) -> Result<bool, BackendError> {
            Ok(self.response.is_some())
        }
    }

    fn router(response: Option<Value>) -> Router {
        let state = AppState::new(Settings::default(), Arc::new(StaticBackend { response }));
        create_router(state)
    }

    fn item_hits() -> Value {
        json!({
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{
                    "_id": "1",
                    "_score": 4.0,
                    "_source": { "nome": "Espada Longa", "tipo": "Arma", "raridade": "Raro", "valor": 1500 }
                }]
            }
        })
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_search_with_alias() {
        let (status, body) = call(router(Some(item_hits())), get("/itens/search?q=espada")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["id"], "1");
        assert_eq!(body["items"][0]["nome"], "Espada Longa");
        assert_eq!(body["items"][0]["score"], 4.0);
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = call(router(Some(item_hits())), get("/items/filter")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");

        let (status, _) = call(router(Some(item_hits())), get("/weapons/search?q=x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            router(Some(item_hits())),
            get("/items/top?sort_by=descricao"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_filter_query_string_and_body() {
        let (status, body) = call(
            router(Some(item_hits())),
            get("/items/filter?tipo=Arma&valor_min=1000"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["items"][0].get("score").is_none());

        let request = Request::builder()
            .method("POST")
            .uri("/items/filter")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "raridade": "Raro" }).to_string()))
            .unwrap();
        let (status, _) = call(router(Some(item_hits())), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_advanced_search() {
        let request = Request::builder()
            .method("POST")
            .uri("/items/advanced")
            .header("Content-Type", "application/json")
            .body(Body::from(
                json!({ "texto": "espada", "tipo": "Arma", "size": 5 }).to_string(),
            ))
            .unwrap();
        let (status, body) = call(router(Some(item_hits())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["score"], 4.0);
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = call(
            router(Some(item_hits())),
            post_json("/items/advanced", r#"{"text":"espada","size":-5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");

        let (status, body) = call(
            router(Some(item_hits())),
            post_json("/items/filter", r#"["tipo","Arma"]"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");

        let (status, body) = call(
            router(Some(item_hits())),
            post_json("/items/advanced", "{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_similar_missing_is_not_found() {
        let (status, body) = call(router(Some(item_hits())), get("/personagens/similar/x1")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let (status, body) = call(router(None), get("/missions/top")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "upstream");
        assert!(!body["error"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let app = router(Some(item_hits()));
        let (status, body) = call(app.clone(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["engine"], "healthy");

        let (status, body) = call(router(None), get("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["engine"], "unreachable");

        call(app.clone(), get("/items/search?q=espada")).await;
        let (status, body) = call(app, get("/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_requests"], 1);
        assert_eq!(body["operations"]["items/search_text"]["requests"], 1);
    }

    #[tokio::test]
    async fn test_index_lists_collections() {
        let (status, body) = call(router(None), get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collections"], json!(["items", "characters", "missions"]));
    }
}
