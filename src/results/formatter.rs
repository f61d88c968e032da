//! Projection of raw engine responses into [`ResultEnvelope`]s
//!
//! Formatting is a pure function of the request identity and the raw
//! response: only fields named by the collection schema are copied, optional
//! fields get the zero value of their type, and every aggregation the request
//! asked for must be present in the response.

use super::raw::*;
use super::types::*;
use crate::collections::{CollectionSchema, FieldKind};
use crate::error::{Error, Result};
use crate::query::{AggregationKind, AggregationSpec, Operation, Projection, QueryRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Histograms over high-cardinality fields are truncated to this many buckets
pub const HISTOGRAM_BUCKET_LIMIT: usize = 20;

/// Formats engine responses for one collection
pub struct ResultFormatter {
    schema: &'static CollectionSchema,
}

impl ResultFormatter {
    pub fn new(schema: &'static CollectionSchema) -> Self {
        Self { schema }
    }

    /// Normalize the raw response to `request`
    pub fn format(&self, request: &QueryRequest, raw: &Value) -> Result<ResultEnvelope> {
        let operation = request.operation;
        let response = RawSearchResponse::deserialize(raw).map_err(|e| Error::Upstream {
            operation,
            collection: self.schema.collection,
            message: format!("undecodable search response: {}", e),
        })?;

        let mut items = Vec::with_capacity(response.hits.hits.len());
        for hit in &response.hits.hits {
            let fields = self.project(operation, &hit.id, &hit.source, request.projection)?;
            let mut record = HitRecord::new(hit.id.clone(), fields)
                .with_score(hit.score.filter(|_| request.ranked));
            if !request.highlight.is_empty() {
                record.highlights = hit.highlight.clone();
            }
            items.push(record);
        }

        // Suggestions report how many distinct names they carry
        let total = if operation == Operation::Autocomplete {
            items = self.dedup_by_display_name(items);
            items.len() as u64
        } else {
            response.hits.total.value()
        };

        let mut envelope = ResultEnvelope::new(total, items);

        if !request.aggregations.is_empty() {
            let raw_aggs = response
                .aggregations
                .as_ref()
                .ok_or_else(|| self.shape_error(operation, "response has no aggregations"))?;
            envelope.aggregations =
                Some(self.format_aggregations(operation, request.aggregations, raw_aggs)?);
        }

        Ok(envelope)
    }

    /// Summary record of a similarity seed document
    pub fn format_seed(&self, document: &RawDocument) -> Result<HitRecord> {
        let fields = self.project(
            Operation::Similar,
            &document.id,
            &document.source,
            Projection::Summary,
        )?;
        Ok(HitRecord::new(document.id.clone(), fields))
    }

    fn project(
        &self,
        operation: Operation,
        id: &str,
        source: &Map<String, Value>,
        projection: Projection,
    ) -> Result<Map<String, Value>> {
        let names: Vec<&'static str> = match projection {
            Projection::Full => self.schema.projection.iter().map(|p| p.name).collect(),
            Projection::Summary => self.schema.summary_fields.to_vec(),
        };

        let mut fields = Map::new();
        for name in names {
            let required = self
                .schema
                .projected_field(name)
                .map(|p| p.required)
                .unwrap_or(true);

            let value = match source.get(name) {
                Some(value) if !value.is_null() => value.clone(),
                _ if required => {
                    return Err(self.shape_error(
                        operation,
                        format!("document '{}' has no '{}' field", id, name),
                    ))
                }
                _ => self
                    .schema
                    .field_kind(name)
                    .unwrap_or(FieldKind::Text)
                    .zero_value(),
            };
            fields.insert(name.to_string(), value);
        }

        Ok(fields)
    }

    /// Keep the first hit for each display name, preserving engine order
    fn dedup_by_display_name(&self, items: Vec<HitRecord>) -> Vec<HitRecord> {
        let display = self.schema.display_field;
        let mut seen = HashSet::new();

        items
            .into_iter()
            .filter(|item| {
                let name = match item.get(display) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                seen.insert(name)
            })
            .collect()
    }

    fn format_aggregations(
        &self,
        operation: Operation,
        specs: &[AggregationSpec],
        raw: &Map<String, Value>,
    ) -> Result<BTreeMap<String, AggregationSummary>> {
        let mut summaries = BTreeMap::new();

        for spec in specs {
            let body = raw.get(spec.name).ok_or_else(|| {
                self.shape_error(
                    operation,
                    format!("aggregation '{}' is missing", spec.name),
                )
            })?;
            let summary = self.format_aggregation(operation, spec, body)?;
            summaries.insert(spec.name.to_string(), summary);
        }

        Ok(summaries)
    }

    fn format_aggregation(
        &self,
        operation: Operation,
        spec: &AggregationSpec,
        body: &Value,
    ) -> Result<AggregationSummary> {
        let summary = match spec.kind {
            AggregationKind::Terms { .. } => {
                let raw: RawBuckets = self.decode(operation, spec, body)?;
                AggregationSummary::Terms {
                    buckets: raw
                        .buckets
                        .into_iter()
                        .map(|b| TermBucket {
                            key: b.key,
                            count: b.doc_count,
                        })
                        .collect(),
                }
            }
            AggregationKind::Stats { .. } => {
                let raw: RawStats = self.decode(operation, spec, body)?;
                AggregationSummary::Stats {
                    min: raw.min,
                    max: raw.max,
                    avg: raw.avg.map(round2),
                    sum: raw.sum,
                }
            }
            AggregationKind::Avg { .. } => {
                let raw: RawMetric = self.decode(operation, spec, body)?;
                AggregationSummary::Metric {
                    value: raw.value.map(round2),
                }
            }
            AggregationKind::Histogram { .. } => {
                let raw: RawBuckets = self.decode(operation, spec, body)?;
                let mut buckets = Vec::new();
                for bucket in raw.buckets.into_iter().take(HISTOGRAM_BUCKET_LIMIT) {
                    let key = bucket.key.as_f64().ok_or_else(|| {
                        self.shape_error(
                            operation,
                            format!("histogram '{}' has a non-numeric bucket key", spec.name),
                        )
                    })?;
                    buckets.push(HistogramBucket {
                        key,
                        count: bucket.doc_count,
                    });
                }
                AggregationSummary::Histogram { buckets }
            }
            AggregationKind::Range { .. } => {
                let raw: RawRangeBuckets = self.decode(operation, spec, body)?;
                AggregationSummary::Range {
                    buckets: raw
                        .buckets
                        .into_iter()
                        .map(|b| RangeBucket {
                            key: b.key,
                            from: b.from,
                            to: b.to,
                            count: b.doc_count,
                        })
                        .collect(),
                }
            }
            AggregationKind::TopHits { .. } => {
                let raw: RawTopHits = self.decode(operation, spec, body)?;
                let hits = raw
                    .hits
                    .hits
                    .iter()
                    .map(|hit| {
                        self.project(operation, &hit.id, &hit.source, Projection::Summary)
                            .map(|fields| HitRecord::new(hit.id.clone(), fields))
                    })
                    .collect::<Result<Vec<_>>>()?;
                AggregationSummary::TopHits { hits }
            }
            AggregationKind::FilterCount { .. } => {
                let raw: RawDocCount = self.decode(operation, spec, body)?;
                AggregationSummary::Count {
                    count: raw.doc_count,
                }
            }
        };

        Ok(summary)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        operation: Operation,
        spec: &AggregationSpec,
        body: &Value,
    ) -> Result<T> {
        T::deserialize(body).map_err(|e| {
            self.shape_error(
                operation,
                format!("aggregation '{}' is malformed: {}", spec.name, e),
            )
        })
    }

    fn shape_error(&self, operation: Operation, message: impl Into<String>) -> Error {
        Error::UpstreamShape {
            operation,
            collection: self.schema.collection,
            message: message.into(),
        }
    }
}

/// Round to two decimal places for display stability
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
