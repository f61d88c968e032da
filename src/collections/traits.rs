//! Collection schema descriptor types

use crate::error::Error;
use crate::query::{AggregationSpec, BoostedField};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// One of the searchable document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Items,
    Characters,
    Missions,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Items, Self::Characters, Self::Missions];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Characters => "characters",
            Self::Missions => "missions",
        }
    }

    /// The static schema descriptor for this collection
    pub fn schema(&self) -> &'static CollectionSchema {
        match self {
            Self::Items => &super::items::SCHEMA,
            Self::Characters => &super::characters::SCHEMA,
            Self::Missions => &super::missions::SCHEMA,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "items" | "itens" => Ok(Self::Items),
            "characters" | "personagens" => Ok(Self::Characters),
            "missions" | "missoes" => Ok(Self::Missions),
            _ => Err(Error::validation(format!(
                "unknown collection '{}'; expected items, characters or missions",
                s
            ))),
        }
    }
}

/// Mapping type of an indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analyzed full text
    Text,
    /// Untokenized exact value
    Keyword,
    Integer,
    Float,
    Date,
}

impl FieldKind {
    /// Value reported for an optional field missing from a document
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Integer => json!(0),
            Self::Float => json!(0.0),
            Self::Text | Self::Keyword | Self::Date => json!(""),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// A typed field of the indexed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl SchemaField {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A filter key recognized by a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// `key` matches `field` exactly
    Exact {
        key: &'static str,
        field: &'static str,
    },
    /// `min_key`/`max_key` bound `field` inclusively
    Range {
        min_key: &'static str,
        max_key: &'static str,
        field: &'static str,
    },
}

impl FilterField {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Exact { field, .. } | Self::Range { field, .. } => field,
        }
    }

    fn accepts(&self, key: &str) -> bool {
        match self {
            Self::Exact { key: k, .. } => *k == key,
            Self::Range {
                min_key, max_key, ..
            } => *min_key == key || *max_key == key,
        }
    }
}

/// A field copied from a hit's source into the output record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedField {
    pub name: &'static str,
    /// Required fields must be present in every document
    pub required: bool,
}

impl ProjectedField {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Exact-value listing with summary metrics
#[derive(Debug, Clone, Copy)]
pub struct FacetSpec {
    pub field: &'static str,
    pub aggregations: &'static [AggregationSpec],
}

/// Everything the query builder and formatter need to know about a collection
#[derive(Debug)]
pub struct CollectionSchema {
    pub collection: Collection,
    /// Index name used when settings don't override it
    pub default_index: &'static str,
    pub fields: &'static [SchemaField],
    /// Primary name/title field
    pub display_field: &'static str,
    /// Untokenized variant of the display field
    pub display_keyword: &'static str,
    /// Weighted fields for full-text matching
    pub text_fields: &'static [BoostedField],
    pub highlight_fields: &'static [&'static str],
    pub similarity_fields: &'static [&'static str],
    pub filters: &'static [FilterField],
    /// Descending sort key for filter and facet listings
    pub default_sort: &'static str,
    /// Fields a top ranking may be ordered by
    pub rank_fields: &'static [&'static str],
    pub projection: &'static [ProjectedField],
    /// Lightweight fields for suggestions and summaries
    pub summary_fields: &'static [&'static str],
    pub facet: FacetSpec,
    pub dashboard: &'static [AggregationSpec],
}

impl CollectionSchema {
    /// Look up a field's mapping type
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        let base = name.split('.').next().unwrap_or(name);
        self.fields
            .iter()
            .find(|f| f.name == base)
            .map(|f| if base != name { FieldKind::Keyword } else { f.kind })
    }

    /// The filter declaration that accepts `key`
    pub fn filter_for_key(&self, key: &str) -> Option<&'static FilterField> {
        self.filters.iter().find(|f| f.accepts(key))
    }

    /// Every recognized filter key, in declaration order
    pub fn filter_keys(&self) -> Vec<&'static str> {
        self.filters
            .iter()
            .flat_map(|f| match *f {
                FilterField::Exact { key, .. } => vec![key],
                FilterField::Range {
                    min_key, max_key, ..
                } => vec![min_key, max_key],
            })
            .collect()
    }

    pub fn projected_field(&self, name: &str) -> Option<&'static ProjectedField> {
        self.projection.iter().find(|p| p.name == name)
    }
}
