//! Collection schemas
//!
//! Each searchable collection is described by a static [`CollectionSchema`]:
//! its typed fields, weighted text fields, recognized filters, default sort,
//! output projection and dashboard aggregations. The query builder and result
//! formatter are generic over these descriptors.

mod characters;
mod items;
mod missions;
mod registry;
mod traits;

pub use registry::CollectionRegistry;
pub use traits::*;
