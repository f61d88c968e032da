//! Query construction
//!
//! Turns `(operation, collection, parameters)` into a [`QueryRequest`] for the
//! search engine. Nothing in this module performs I/O; caller input is
//! validated here so that bad requests never reach the engine.

mod aggregations;
mod builder;
mod dsl;
mod filters;

pub use aggregations::{aggs_body, AggregationKind, AggregationSpec, NamedRange};
pub use builder::QueryBuilder;
pub use dsl::{BoostedField, Clause, Projection, QueryRequest, SortSpec, MAX_RESULT_SIZE};
pub use filters::{FilterCondition, FilterCriteria};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations exposed over every collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SearchText,
    Filter,
    Autocomplete,
    Similar,
    AdvancedSearch,
    Dashboard,
    Top,
    Facet,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchText => "search_text",
            Self::Filter => "filter",
            Self::Autocomplete => "autocomplete",
            Self::Similar => "similar",
            Self::AdvancedSearch => "advanced_search",
            Self::Dashboard => "dashboard",
            Self::Top => "top",
            Self::Facet => "facet",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
