//! Filter normalization
//!
//! Turns loosely typed caller parameters (query-string pairs or a JSON object)
//! into a validated [`FilterCriteria`] for one collection. Every key must be one
//! the collection's schema declares; empty values are treated as absent, and a
//! `*_min`/`*_max` pair folds into a single inclusive range.

use super::dsl::Clause;
use crate::collections::{CollectionSchema, FilterField};
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// One validated filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    Exact {
        field: &'static str,
        value: String,
    },
    Range {
        field: &'static str,
        gte: Option<i64>,
        lte: Option<i64>,
    },
}

impl FilterCondition {
    pub fn to_clause(&self) -> Clause {
        match self {
            Self::Exact { field, value } => Clause::Term {
                field: *field,
                value: value.clone(),
            },
            Self::Range { field, gte, lte } => Clause::Range {
                field: *field,
                gte: *gte,
                lte: *lte,
            },
        }
    }
}

/// Validated filters, in the order the collection schema declares them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    conditions: Vec<FilterCondition>,
}

impl FilterCriteria {
    /// Validate raw `(key, value)` pairs against a collection schema
    pub fn parse<I, K>(schema: &CollectionSchema, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut exact: HashMap<&'static str, String> = HashMap::new();
        let mut lower: HashMap<&'static str, i64> = HashMap::new();
        let mut upper: HashMap<&'static str, i64> = HashMap::new();

        for (key, value) in params {
            let key = key.as_ref();
            let filter = schema.filter_for_key(key).ok_or_else(|| {
                Error::validation(format!(
                    "unrecognized filter '{}' for {}; expected one of: {}",
                    key,
                    schema.collection,
                    schema.filter_keys().join(", ")
                ))
            })?;

            match *filter {
                FilterField::Exact { field, .. } => {
                    if let Some(value) = exact_value(key, value)? {
                        exact.insert(field, value);
                    }
                }
                FilterField::Range {
                    min_key, field, ..
                } => {
                    if let Some(bound) = bound_value(key, value)? {
                        if key == min_key {
                            lower.insert(field, bound);
                        } else {
                            upper.insert(field, bound);
                        }
                    }
                }
            }
        }

        let mut conditions = Vec::new();
        for filter in schema.filters {
            match *filter {
                FilterField::Exact { field, .. } => {
                    if let Some(value) = exact.remove(&field) {
                        conditions.push(FilterCondition::Exact { field, value });
                    }
                }
                FilterField::Range {
                    min_key,
                    max_key,
                    field,
                } => {
                    let gte = lower.remove(&field);
                    let lte = upper.remove(&field);
                    if let (Some(min), Some(max)) = (gte, lte) {
                        if min > max {
                            return Err(Error::validation(format!(
                                "'{}' ({}) is greater than '{}' ({})",
                                min_key, min, max_key, max
                            )));
                        }
                    }
                    if gte.is_some() || lte.is_some() {
                        conditions.push(FilterCondition::Range { field, gte, lte });
                    }
                }
            }
        }

        Ok(Self { conditions })
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// One clause per condition
    pub fn to_clauses(&self) -> Vec<Clause> {
        self.conditions.iter().map(FilterCondition::to_clause).collect()
    }
}

fn exact_value(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(Error::validation(format!(
            "filter '{}' must be a single value",
            key
        ))),
    }
}

fn bound_value(key: &str, value: Value) -> Result<Option<i64>> {
    let not_integer = || Error::validation(format!("filter '{}' must be an integer", key));

    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<i64>().map(Some).map_err(|_| not_integer())
            }
        }
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(not_integer),
        _ => Err(not_integer()),
    }
}
