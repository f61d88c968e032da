//! Wire shapes of engine responses
//!
//! Only the parts the formatter reads are modelled; anything else in the
//! response is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Response of `POST /{index}/_search`
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    pub hits: RawHits,
    #[serde(default)]
    pub aggregations: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHits {
    pub total: RawTotal,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// Hit count, either `{ "value": n, "relation": ... }` or a bare number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTotal {
    Object { value: u64 },
    Count(u64),
}

impl RawTotal {
    pub fn value(&self) -> u64 {
        match self {
            Self::Object { value } | Self::Count(value) => *value,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
    #[serde(default)]
    pub highlight: Option<HashMap<String, Vec<String>>>,
}

/// Response of `GET /{index}/_doc/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBucket {
    pub key: Value,
    pub doc_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBuckets {
    pub buckets: Vec<RawBucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRangeBucket {
    pub key: String,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    pub doc_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRangeBuckets {
    pub buckets: Vec<RawRangeBucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    #[serde(default)]
    pub sum: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMetric {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTopHits {
    pub hits: RawHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDocCount {
    pub doc_count: u64,
}
