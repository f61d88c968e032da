//! Aggregation requests sent alongside (or instead of) hits

use serde_json::{json, Map, Value};

/// A named aggregation request
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationSpec {
    /// Name under which the engine reports this aggregation
    pub name: &'static str,
    /// What to compute
    pub kind: AggregationKind,
}

impl AggregationSpec {
    pub const fn new(name: &'static str, kind: AggregationKind) -> Self {
        Self { name, kind }
    }

    /// Render as an engine aggregation body
    pub fn to_json(&self) -> Value {
        self.kind.to_json()
    }
}

/// Supported aggregation kinds
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationKind {
    /// Per-value document counts on a keyword field
    Terms { field: &'static str, size: u32 },
    /// min/max/avg/sum over a numeric field
    Stats { field: &'static str },
    /// Average of a numeric field
    Avg { field: &'static str },
    /// Fixed-width buckets over a numeric field, empty buckets omitted
    Histogram { field: &'static str, interval: f64 },
    /// Named, half-open `[from, to)` buckets over a numeric field
    Range {
        field: &'static str,
        ranges: &'static [NamedRange],
    },
    /// Best hits across the whole set, ordered by a metric
    TopHits {
        size: u32,
        sort_field: &'static str,
        source: &'static [&'static str],
    },
    /// Number of documents with an exact keyword value
    FilterCount {
        field: &'static str,
        value: &'static str,
    },
}

impl AggregationKind {
    fn to_json(&self) -> Value {
        match self {
            Self::Terms { field, size } => json!({ "terms": { "field": field, "size": size } }),
            Self::Stats { field } => json!({ "stats": { "field": field } }),
            Self::Avg { field } => json!({ "avg": { "field": field } }),
            Self::Histogram { field, interval } => json!({
                "histogram": { "field": field, "interval": interval, "min_doc_count": 1 }
            }),
            Self::Range { field, ranges } => json!({
                "range": {
                    "field": field,
                    "ranges": ranges.iter().map(NamedRange::to_json).collect::<Vec<_>>(),
                }
            }),
            Self::TopHits {
                size,
                sort_field,
                source,
            } => json!({
                "top_hits": {
                    "size": size,
                    "sort": [{ *sort_field: "desc" }],
                    "_source": source,
                }
            }),
            Self::FilterCount { field, value } => {
                json!({ "filter": { "term": { *field: value } } })
            }
        }
    }
}

/// One labelled bucket of a range aggregation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedRange {
    pub key: &'static str,
    pub from: Option<f64>,
    pub to: Option<f64>,
}

impl NamedRange {
    pub const fn new(key: &'static str, from: Option<f64>, to: Option<f64>) -> Self {
        Self { key, from, to }
    }

    fn to_json(&self) -> Value {
        let mut range = Map::new();
        range.insert("key".to_string(), json!(self.key));
        if let Some(from) = self.from {
            range.insert("from".to_string(), json!(from));
        }
        if let Some(to) = self.to {
            range.insert("to".to_string(), json!(to));
        }
        Value::Object(range)
    }
}

/// Render a set of aggregations as the engine's `aggs` object
pub fn aggs_body(specs: &[AggregationSpec]) -> Value {
    let aggs: Map<String, Value> = specs
        .iter()
        .map(|spec| (spec.name.to_string(), spec.to_json()))
        .collect();
    Value::Object(aggs)
}

#[cfg(test)]
mod tests {
    use super::*;

    static RANGES: &[NamedRange] = &[
        NamedRange::new("cheap", None, Some(100.0)),
        NamedRange::new("pricey", Some(100.0), None),
    ];

    #[test]
    fn test_range_buckets_only_carry_present_bounds() {
        let spec = AggregationSpec::new(
            "ranges_valor",
            AggregationKind::Range {
                field: "valor",
                ranges: RANGES,
            },
        );
        let body = spec.to_json();
        let ranges = body["range"]["ranges"].as_array().unwrap();

        assert_eq!(ranges.len(), 2);
        assert!(ranges[0].get("from").is_none());
        assert_eq!(ranges[0]["to"], json!(100.0));
        assert!(ranges[1].get("to").is_none());
        assert_eq!(ranges[1]["key"], "pricey");
    }

    #[test]
    fn test_aggs_body_uses_spec_names() {
        let specs = [
            AggregationSpec::new("por_tipo", AggregationKind::Terms { field: "tipo", size: 10 }),
            AggregationSpec::new(
                "ativos",
                AggregationKind::FilterCount {
                    field: "status",
                    value: "Ativo",
                },
            ),
        ];
        let body = aggs_body(&specs);

        assert_eq!(body["por_tipo"]["terms"]["size"], 10);
        assert_eq!(body["ativos"]["filter"]["term"]["status"], "Ativo");
    }

    #[test]
    fn test_histogram_skips_empty_buckets() {
        let spec = AggregationSpec::new(
            "distribuicao_valor",
            AggregationKind::Histogram {
                field: "valor",
                interval: 10000.0,
            },
        );
        assert_eq!(spec.to_json()["histogram"]["min_doc_count"], 1);
    }
}
