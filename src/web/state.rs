//! Application state shared across handlers

use crate::collections::CollectionRegistry;
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::SearchBackend;
use crate::search::SearchService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search service over the configured backend
    pub search: Arc<SearchService>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, backend: Arc<dyn SearchBackend>) -> Self {
        let registry = Arc::new(CollectionRegistry::with_settings(&settings.collections));
        let search = Arc::new(SearchService::new(
            backend,
            registry,
            Arc::new(Metrics::new()),
        ));

        Self {
            settings: Arc::new(settings),
            search,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
