//! Request models for search operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of an advanced search: optional free text, optional size and any
/// number of filter keys at the top level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvancedSearchRequest {
    #[serde(default, alias = "texto")]
    pub text: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

impl AdvancedSearchRequest {
    pub fn new(text: Option<&str>) -> Self {
        Self {
            text: text.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.filters.insert(key.into(), value);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Engine reachability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unreachable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_advanced_request_from_json() {
        let request: AdvancedSearchRequest = serde_json::from_value(json!({
            "texto": "dragão",
            "size": 5,
            "tipo": "Arma",
            "valor_min": 100
        }))
        .unwrap();

        assert_eq!(request.text.as_deref(), Some("dragão"));
        assert_eq!(request.size, Some(5));
        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.filters["valor_min"], 100);
    }

    #[test]
    fn test_advanced_request_filters_only() {
        let request: AdvancedSearchRequest =
            serde_json::from_value(json!({ "classe": "Mago" })).unwrap();

        assert!(request.text.is_none());
        assert!(request.size.is_none());
        assert_eq!(request.filters["classe"], "Mago");
    }
}
