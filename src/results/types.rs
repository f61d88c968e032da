//! Normalized result types returned to callers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A single normalized hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Engine document id
    pub id: String,
    /// Relevance score, only for relevance-ranked operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Projected source fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Highlighted fragments by field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<HashMap<String, Vec<String>>>,
}

impl HitRecord {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            score: None,
            fields,
            highlights: None,
        }
    }

    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.score = score;
        self
    }

    /// Get a projected field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// One bucket of a terms aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermBucket {
    pub key: Value,
    pub count: u64,
}

/// One bucket of a histogram aggregation; `key` is the bucket's lower edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub key: f64,
    pub count: u64,
}

/// One named bucket of a range aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    pub count: u64,
}

/// Normalized summary of one aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregationSummary {
    Terms {
        buckets: Vec<TermBucket>,
    },
    /// `min`/`max`/`avg` are absent when no document has the field
    Stats {
        min: Option<f64>,
        max: Option<f64>,
        avg: Option<f64>,
        sum: f64,
    },
    Metric {
        value: Option<f64>,
    },
    Histogram {
        buckets: Vec<HistogramBucket>,
    },
    Range {
        buckets: Vec<RangeBucket>,
    },
    TopHits {
        hits: Vec<HitRecord>,
    },
    Count {
        count: u64,
    },
}

/// The normalized response of every operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Number of matching documents reported by the engine
    pub total: u64,
    /// Hits in engine order
    pub items: Vec<HitRecord>,
    /// Aggregation summaries by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<BTreeMap<String, AggregationSummary>>,
    /// Seed document of a similarity search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<HitRecord>,
}

impl ResultEnvelope {
    pub fn new(total: u64, items: Vec<HitRecord>) -> Self {
        Self {
            total,
            items,
            aggregations: None,
            seed: None,
        }
    }

    /// Get an aggregation summary by name
    pub fn aggregation(&self, name: &str) -> Option<&AggregationSummary> {
        self.aggregations.as_ref().and_then(|a| a.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_record_serialization() {
        let mut fields = Map::new();
        fields.insert("nome".to_string(), json!("Espada"));
        let hit = HitRecord::new("7", fields);

        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json, json!({ "id": "7", "nome": "Espada" }));

        let scored = serde_json::to_value(hit.with_score(Some(1.5))).unwrap();
        assert_eq!(scored["score"], 1.5);
    }

    #[test]
    fn test_summary_is_tagged() {
        let summary = AggregationSummary::Count { count: 3 };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({ "type": "count", "count": 3 })
        );
    }
}
