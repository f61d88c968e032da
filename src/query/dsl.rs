//! Typed query clauses and the request document sent to the engine

use super::aggregations::{aggs_body, AggregationSpec};
use super::Operation;
use crate::collections::Collection;
use serde_json::{json, Map, Value};

/// Hard cap on the number of hits any request may ask for
pub const MAX_RESULT_SIZE: u32 = 100;

/// A field with a relevance boost, rendered as `field^boost`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostedField {
    pub name: &'static str,
    pub boost: u32,
}

impl BoostedField {
    pub const fn new(name: &'static str, boost: u32) -> Self {
        Self { name, boost }
    }

    fn render(&self) -> String {
        if self.boost > 1 {
            format!("{}^{}", self.name, self.boost)
        } else {
            self.name.to_string()
        }
    }
}

/// One structured condition within a query
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Fuzzy OR-match of a term across weighted text fields
    MultiMatch {
        query: String,
        fields: Vec<BoostedField>,
    },
    /// Exact match on an untokenized field
    Term { field: &'static str, value: String },
    /// Inclusive numeric range; a missing bound means unbounded on that side
    Range {
        field: &'static str,
        gte: Option<i64>,
        lte: Option<i64>,
    },
    /// Ordered prefix match with a bounded number of expansions
    PhrasePrefix {
        field: &'static str,
        query: String,
        max_expansions: u32,
    },
    /// Case-insensitive wildcard on a keyword field
    Wildcard { field: &'static str, pattern: String },
    /// Documents sharing significant terms with a seed document
    MoreLikeThis {
        fields: Vec<&'static str>,
        index: String,
        id: String,
        min_term_freq: u32,
        min_doc_freq: u32,
        max_query_terms: u32,
    },
    /// Boolean composition; `filter` clauses never contribute to scoring
    Bool {
        must: Vec<Clause>,
        filter: Vec<Clause>,
        should: Vec<Clause>,
    },
    MatchAll,
}

impl Clause {
    /// Filter-only composition
    pub fn filter(clauses: Vec<Clause>) -> Self {
        Self::Bool {
            must: vec![],
            filter: clauses,
            should: vec![],
        }
    }

    /// Render as engine query DSL
    pub fn to_json(&self) -> Value {
        match self {
            Self::MultiMatch { query, fields } => json!({
                "multi_match": {
                    "query": query,
                    "fields": fields.iter().map(BoostedField::render).collect::<Vec<_>>(),
                    "fuzziness": "AUTO",
                    "operator": "or",
                }
            }),
            Self::Term { field, value } => json!({ "term": { *field: value } }),
            Self::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), json!(gte));
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), json!(lte));
                }
                json!({ "range": { *field: bounds } })
            }
            Self::PhrasePrefix {
                field,
                query,
                max_expansions,
            } => json!({
                "match_phrase_prefix": {
                    *field: { "query": query, "max_expansions": max_expansions }
                }
            }),
            Self::Wildcard { field, pattern } => json!({
                "wildcard": {
                    *field: { "value": pattern, "case_insensitive": true }
                }
            }),
            Self::MoreLikeThis {
                fields,
                index,
                id,
                min_term_freq,
                min_doc_freq,
                max_query_terms,
            } => json!({
                "more_like_this": {
                    "fields": fields,
                    "like": [{ "_index": index, "_id": id }],
                    "min_term_freq": min_term_freq,
                    "min_doc_freq": min_doc_freq,
                    "max_query_terms": max_query_terms,
                }
            }),
            Self::Bool {
                must,
                filter,
                should,
            } => {
                let mut body = Map::new();
                for (key, clauses) in [("must", must), ("filter", filter), ("should", should)] {
                    if !clauses.is_empty() {
                        body.insert(
                            key.to_string(),
                            Value::Array(clauses.iter().map(Clause::to_json).collect()),
                        );
                    }
                }
                json!({ "bool": body })
            }
            Self::MatchAll => json!({ "match_all": {} }),
        }
    }
}

/// Descending sort on a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
}

impl SortSpec {
    pub const fn desc(field: &'static str) -> Self {
        Self { field }
    }
}

/// Which projected field set the formatter copies from each hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Every field of the collection's output projection
    Full,
    /// The lightweight summary fields only
    Summary,
}

/// A complete request document plus the identity the formatter needs
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub operation: Operation,
    pub collection: Collection,
    pub query: Clause,
    pub sort: Vec<SortSpec>,
    /// Fields to highlight (empty means no highlighting)
    pub highlight: Vec<&'static str>,
    pub aggregations: &'static [AggregationSpec],
    /// Restricts the returned `_source` fields
    pub source: Option<&'static [&'static str]>,
    pub size: u32,
    /// Whether hit order reflects relevance, so scores are meaningful
    pub ranked: bool,
    pub projection: Projection,
}

impl QueryRequest {
    /// Start a request; the size is capped at [`MAX_RESULT_SIZE`]
    pub fn new(operation: Operation, collection: Collection, query: Clause, size: u32) -> Self {
        Self {
            operation,
            collection,
            query,
            sort: vec![],
            highlight: vec![],
            aggregations: &[],
            source: None,
            size: size.min(MAX_RESULT_SIZE),
            ranked: false,
            projection: Projection::Full,
        }
    }

    pub fn sorted_by(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn highlighting(mut self, fields: &[&'static str]) -> Self {
        self.highlight = fields.to_vec();
        self
    }

    pub fn with_aggregations(mut self, specs: &'static [AggregationSpec]) -> Self {
        self.aggregations = specs;
        self
    }

    pub fn with_source(mut self, fields: &'static [&'static str]) -> Self {
        self.source = Some(fields);
        self
    }

    pub fn ranked(mut self, ranked: bool) -> Self {
        self.ranked = ranked;
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Render the request body for `POST /{index}/_search`
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());
        body.insert("size".to_string(), json!(self.size));

        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|s| json!({ s.field: "desc" }))
                .collect();
            body.insert("sort".to_string(), Value::Array(sort));
        }

        if !self.highlight.is_empty() {
            let fields: Map<String, Value> = self
                .highlight
                .iter()
                .map(|f| (f.to_string(), json!({})))
                .collect();
            body.insert("highlight".to_string(), json!({ "fields": fields }));
        }

        if !self.aggregations.is_empty() {
            body.insert("aggs".to_string(), aggs_body(self.aggregations));
        }

        if let Some(source) = self.source {
            body.insert("_source".to_string(), json!(source));
        }

        Value::Object(body)
    }
}
