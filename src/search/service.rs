//! Search execution over the engine collaborator

use super::models::{AdvancedSearchRequest, HealthStatus};
use crate::collections::{Collection, CollectionRegistry};
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::network::{BackendError, SearchBackend};
use crate::query::{FilterCriteria, Operation, QueryBuilder, QueryRequest};
use crate::results::{ResultEnvelope, ResultFormatter};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs every operation: build, one engine round trip, format
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
    registry: Arc<CollectionRegistry>,
    metrics: Arc<Metrics>,
}

impl SearchService {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        registry: Arc<CollectionRegistry>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            backend,
            registry,
            metrics,
        }
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn builder(&self, collection: Collection) -> QueryBuilder<'_> {
        QueryBuilder::new(
            self.registry.schema(collection),
            self.registry.index(collection),
        )
    }

    fn formatter(&self, collection: Collection) -> ResultFormatter {
        ResultFormatter::new(self.registry.schema(collection))
    }

    /// Weighted fuzzy full-text search
    pub async fn search_text(&self, collection: Collection, term: &str) -> Result<ResultEnvelope> {
        self.track(collection, Operation::SearchText, async {
            let request = self.builder(collection).search_text(term)?;
            self.run(&request).await
        })
        .await
    }

    /// Structured filter listing from raw `key -> value` parameters
    pub async fn filter<I, K>(&self, collection: Collection, params: I) -> Result<ResultEnvelope>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        self.track(collection, Operation::Filter, async {
            let criteria = FilterCriteria::parse(self.registry.schema(collection), params)?;
            debug!("Filtering {} on {} conditions", collection, criteria.len());
            let request = self.builder(collection).filter(&criteria)?;
            self.run(&request).await
        })
        .await
    }

    /// Display-name suggestions for a prefix
    pub async fn autocomplete(
        &self,
        collection: Collection,
        prefix: &str,
    ) -> Result<ResultEnvelope> {
        self.track(collection, Operation::Autocomplete, async {
            let request = self.builder(collection).autocomplete(prefix)?;
            self.run(&request).await
        })
        .await
    }

    /// Documents similar to an existing one; the seed must exist
    pub async fn similar(&self, collection: Collection, id: &str) -> Result<ResultEnvelope> {
        self.track(collection, Operation::Similar, async {
            let id = id.trim();
            let request = self.builder(collection).similar(id)?;
            let index = self.registry.index(collection);

            let document = self
                .backend
                .get_document(index, id)
                .await
                .map_err(|e| self.upstream(collection, Operation::Similar, e))?
                .ok_or_else(|| Error::NotFound {
                    collection,
                    id: id.to_string(),
                })?;
            let seed = self.formatter(collection).format_seed(&document)?;

            let mut envelope = self.run(&request).await?;
            envelope.seed = Some(seed);
            Ok(envelope)
        })
        .await
    }

    /// Free text plus filters
    pub async fn advanced_search(
        &self,
        collection: Collection,
        request: AdvancedSearchRequest,
    ) -> Result<ResultEnvelope> {
        self.track(collection, Operation::AdvancedSearch, async {
            let criteria =
                FilterCriteria::parse(self.registry.schema(collection), request.filters)?;
            let query = self.builder(collection).advanced_search(
                request.text.as_deref(),
                &criteria,
                request.size,
            )?;
            self.run(&query).await
        })
        .await
    }

    /// Collection-wide aggregations
    pub async fn dashboard(&self, collection: Collection) -> Result<ResultEnvelope> {
        self.track(collection, Operation::Dashboard, async {
            let request = self.builder(collection).dashboard();
            self.run(&request).await
        })
        .await
    }

    /// Highest ranked documents by a whitelisted field
    pub async fn top(
        &self,
        collection: Collection,
        sort_by: Option<&str>,
    ) -> Result<ResultEnvelope> {
        self.track(collection, Operation::Top, async {
            let request = self.builder(collection).top(sort_by)?;
            self.run(&request).await
        })
        .await
    }

    /// Listing of one facet value with averages
    pub async fn facet(&self, collection: Collection, value: &str) -> Result<ResultEnvelope> {
        self.track(collection, Operation::Facet, async {
            let request = self.builder(collection).facet(value)?;
            self.run(&request).await
        })
        .await
    }

    pub async fn health(&self) -> HealthStatus {
        match self.backend.ping().await {
            Ok(true) => HealthStatus::Healthy,
            Ok(false) => HealthStatus::Unreachable,
            Err(e) => {
                warn!("Engine ping failed: {}", e);
                HealthStatus::Unreachable
            }
        }
    }

    async fn track<F>(
        &self,
        collection: Collection,
        operation: Operation,
        operation_future: F,
    ) -> Result<ResultEnvelope>
    where
        F: Future<Output = Result<ResultEnvelope>>,
    {
        self.metrics.record_request(collection, operation);
        let result = operation_future.await;

        match &result {
            Ok(_) => self.metrics.record_success(collection, operation),
            Err(e) => {
                debug!("{} on {} rejected: {}", operation, collection, e);
                self.metrics.record_error(collection, operation);
            }
        }

        result
    }

    /// One engine round trip for a built request
    async fn run(&self, request: &QueryRequest) -> Result<ResultEnvelope> {
        let collection = request.collection;
        let operation = request.operation;
        let index = self.registry.index(collection);
        let body = request.to_body();

        debug!("Executing {} on index {}: {}", operation, index, body);
        let start = Instant::now();

        let raw = self
            .backend
            .search(index, &body)
            .await
            .map_err(|e| self.upstream(collection, operation, e))?;

        let elapsed = start.elapsed();
        self.metrics
            .record_response_time(collection, operation, elapsed.as_millis() as u64);

        let envelope = self.formatter(collection).format(request, &raw)?;
        debug!(
            "{} on {} returned {} of {} hits in {:?}",
            operation,
            collection,
            envelope.items.len(),
            envelope.total,
            elapsed
        );

        Ok(envelope)
    }

    fn upstream(&self, collection: Collection, operation: Operation, error: BackendError) -> Error {
        match &error {
            BackendError::Status { status, body } => {
                warn!(
                    "{} on {} failed with HTTP {}: {}",
                    operation, collection, status, body
                );
            }
            other => warn!("{} on {} failed: {}", operation, collection, other),
        }

        Error::Upstream {
            operation,
            collection,
            message: error.to_string(),
        }
    }
}
