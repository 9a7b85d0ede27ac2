//! Resolver collaborators: schema-field registry plus lookup/location/block
//! resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Block, Location, Lookup, SchemaField};

/// Composite key identifying a block from its URL parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BlockKey {
    pub city: String,
    pub street_slug: String,
    pub from_num: u32,
    pub to_num: u32,
    /// Lowercase pre-direction, possibly empty.
    pub dir: String,
}

/// Resolves slugs and ids into domain entities. "Not found" is `None`.
pub trait Catalog: Send + Sync {
    fn schema_field(&self, id: i64) -> Option<SchemaField>;

    fn lookup(&self, field: &SchemaField, slug: &str) -> Option<Lookup>;

    /// All lookups of a field, in no particular order.
    fn lookups(&self, field: &SchemaField) -> Vec<Lookup>;

    fn location(&self, type_slug: &str, slug: &str) -> Option<Location>;

    /// All locations of a type, public or not, in no particular order.
    fn locations_of_type(&self, type_slug: &str) -> Vec<Location>;

    fn location_by_id(&self, id: i64) -> Option<Location>;

    fn block(&self, key: &BlockKey) -> Option<Block>;

    fn block_by_id(&self, id: i64) -> Option<Block>;
}

// ============================================================================
// Field registry
// ============================================================================

/// Schema fields addressable by slug from `by-<slug>` filter arguments.
///
/// Parsing a filter string consumes entries (`pop`), so a registry is handed
/// to the parser by value and the residual comes back with the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, SchemaField>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: SchemaField) -> Option<SchemaField> {
        self.fields.insert(field.slug.clone(), field)
    }

    pub fn get(&self, slug: &str) -> Option<&SchemaField> {
        self.fields.get(slug)
    }

    /// Remove and return the field registered under `slug`.
    pub fn pop(&mut self, slug: &str) -> Option<SchemaField> {
        self.fields.remove(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.fields.contains_key(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<SchemaField> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = SchemaField>>(iter: I) -> Self {
        let mut registry = Self::new();
        for field in iter {
            registry.insert(field);
        }
        registry
    }
}
