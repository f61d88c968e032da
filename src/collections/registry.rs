//! Registry binding collections to their configured index names

use super::traits::{Collection, CollectionSchema};
use crate::config::CollectionsSettings;
use std::collections::HashMap;

/// Registry of the searchable collections
pub struct CollectionRegistry {
    /// Index name by collection
    indices: HashMap<Collection, String>,
}

impl CollectionRegistry {
    /// Create a registry using each schema's default index name
    pub fn new() -> Self {
        Self::with_settings(&CollectionsSettings::default())
    }

    /// Create a registry from configured index names
    pub fn with_settings(settings: &CollectionsSettings) -> Self {
        let indices = Collection::ALL
            .iter()
            .map(|c| (*c, settings.index_for(*c).to_string()))
            .collect();

        Self { indices }
    }

    /// Get the schema of a collection
    pub fn schema(&self, collection: Collection) -> &'static CollectionSchema {
        collection.schema()
    }

    /// Get the index backing a collection
    pub fn index(&self, collection: Collection) -> &str {
        self.indices
            .get(&collection)
            .map(|s| s.as_str())
            .unwrap_or(collection.schema().default_index)
    }

    /// Get all collection names
    pub fn names(&self) -> Vec<&'static str> {
        Collection::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Get number of registered collections
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl Default for CollectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
