//! Civicfeed core vocabulary
//!
//! Domain types for geotagged, schema-typed news items plus the narrow
//! collaborator interfaces the filter layer talks to:
//!
//! - [`NewsItemQuery`]: a queryable sequence of items that can be narrowed.
//! - [`Catalog`]: resolves slugs and ids into lookups, locations and blocks.
//! - [`FieldRegistry`]: the schema fields addressable from a filter URL.
//!
//! The `memory` module carries in-memory implementations of both
//! collaborators; real deployments put a database behind the same traits.

pub mod catalog;
pub mod memory;
pub mod model;
pub mod query;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use catalog::{BlockKey, Catalog, FieldRegistry};
pub use memory::{MemoryCatalog, MemoryQuery};
pub use model::{
    AttributeValue, Block, FieldKind, Location, LocationType, Lookup, NewsItem, Point, Schema,
    SchemaField,
};
pub use query::{DateField, NewsItemQuery, SearchArea};
