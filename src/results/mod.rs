//! Result types and formatting of engine responses
//!
//! This module defines the normalized envelope returned by every operation
//! and the formatter that produces it from raw engine JSON.

mod formatter;
mod raw;
mod types;

pub use formatter::{ResultFormatter, HISTOGRAM_BUCKET_LIMIT};
pub use raw::RawDocument;
pub use types::*;
