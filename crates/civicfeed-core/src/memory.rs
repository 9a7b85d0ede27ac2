//! In-memory catalog and query.
//!
//! Both are deliberately naive (linear scans); they define the reference
//! semantics for the collaborator traits and back the test suites.

use chrono::NaiveDate;

use crate::catalog::{BlockKey, Catalog, FieldRegistry};
use crate::model::{AttributeValue, Block, Location, Lookup, NewsItem, Schema, SchemaField};
use crate::query::{DateField, NewsItemQuery, SearchArea};

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    fields: Vec<SchemaField>,
    lookups: Vec<Lookup>,
    locations: Vec<Location>,
    blocks: Vec<Block>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookups.push(lookup);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// A fresh registry of the schema's fields, for one parse.
    pub fn registry_for(&self, schema: &Schema) -> FieldRegistry {
        self.fields
            .iter()
            .filter(|f| f.schema_id == schema.id)
            .cloned()
            .collect()
    }
}

impl Catalog for MemoryCatalog {
    fn schema_field(&self, id: i64) -> Option<SchemaField> {
        self.fields.iter().find(|f| f.id == id).cloned()
    }

    fn lookup(&self, field: &SchemaField, slug: &str) -> Option<Lookup> {
        self.lookups
            .iter()
            .find(|l| l.schema_field_id == field.id && l.slug == slug)
            .cloned()
    }

    fn lookups(&self, field: &SchemaField) -> Vec<Lookup> {
        self.lookups
            .iter()
            .filter(|l| l.schema_field_id == field.id)
            .cloned()
            .collect()
    }

    fn location(&self, type_slug: &str, slug: &str) -> Option<Location> {
        self.locations
            .iter()
            .find(|l| l.location_type.slug == type_slug && l.slug == slug)
            .cloned()
    }

    fn locations_of_type(&self, type_slug: &str) -> Vec<Location> {
        self.locations
            .iter()
            .filter(|l| l.location_type.slug == type_slug)
            .cloned()
            .collect()
    }

    fn location_by_id(&self, id: i64) -> Option<Location> {
        self.locations.iter().find(|l| l.id == id).cloned()
    }

    fn block(&self, key: &BlockKey) -> Option<Block> {
        self.blocks
            .iter()
            .find(|b| {
                b.city == key.city
                    && b.street_slug == key.street_slug
                    && b.from_num == key.from_num
                    && b.to_num == key.to_num
                    && b.dir_url_bit() == key.dir
            })
            .cloned()
    }

    fn block_by_id(&self, id: i64) -> Option<Block> {
        self.blocks.iter().find(|b| b.id == id).cloned()
    }
}

// ============================================================================
// Query
// ============================================================================

/// A materialized item list narrowed in place. `steps` records each applied
/// narrowing, in order, for explain-style output.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    items: Vec<NewsItem>,
    steps: Vec<String>,
}

impl MemoryQuery {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self {
            items,
            steps: Vec::new(),
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    fn narrow(mut self, step: String, keep: impl Fn(&NewsItem) -> bool) -> Self {
        let before = self.items.len();
        self.items.retain(|item| keep(item));
        tracing::trace!(step = %step, before, after = self.items.len(), "narrowed query");
        self.steps.push(step);
        self
    }
}

fn attribute_matches(stored: Option<&AttributeValue>, wanted: &AttributeValue) -> bool {
    match (stored, wanted) {
        (None | Some(AttributeValue::Null), AttributeValue::Null) => true,
        (Some(stored), wanted) => stored == wanted,
        (None, _) => false,
    }
}

impl NewsItemQuery for MemoryQuery {
    fn by_schema(self, schema: &Schema) -> Self {
        let id = schema.id;
        self.narrow(format!("schema={}", schema.slug), move |item| {
            item.schema_id == id
        })
    }

    fn by_attribute(self, field: &SchemaField, value: &AttributeValue) -> Self {
        let slug = field.slug.clone();
        let step = format!("attribute:{slug}={value}");
        self.narrow(step, |item| attribute_matches(item.attribute(&slug), value))
    }

    fn by_lookup(self, field: &SchemaField, lookup: &Lookup) -> Self {
        let slug = field.slug.clone();
        let wanted = AttributeValue::Int(lookup.id);
        self.narrow(format!("lookup:{slug}={}", lookup.slug), |item| {
            item.attribute(&slug) == Some(&wanted)
        })
    }

    fn text_search(self, field: &SchemaField, text: &str) -> Self {
        let slug = field.slug.clone();
        let terms: Vec<String> = text
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self.narrow(format!("text:{slug}~{text}"), |item| {
            match item.attribute(&slug) {
                Some(AttributeValue::Text(body)) => {
                    let body = body.to_lowercase();
                    terms.iter().all(|term| body.contains(term.as_str()))
                }
                _ => false,
            }
        })
    }

    fn by_date_range(self, field: DateField, start: NaiveDate, end_exclusive: NaiveDate) -> Self {
        let step = format!("{}:[{start},{end_exclusive})", field.column());
        self.narrow(step, |item| {
            let date = match field {
                DateField::ItemDate => item.item_date,
                DateField::PubDate => item.pub_date,
            };
            start <= date && date < end_exclusive
        })
    }

    fn overlapping(self, area: &SearchArea) -> Self {
        let area = *area;
        let step = format!(
            "overlaps:({},{})r{}",
            area.center.x, area.center.y, area.radius
        );
        self.narrow(step, move |item| {
            item.point.is_some_and(|point| area.overlaps(point))
        })
    }

    fn by_location(self, location: &Location) -> Self {
        let id = location.id;
        self.narrow(format!("location={}", location.slug), move |item| {
            item.location_ids.contains(&id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_registry_holds_only_schema_fields() {
        let catalog = fixtures::catalog();
        let registry = catalog.registry_for(&fixtures::schema());
        assert!(registry.contains("crime-type"));
        assert!(registry.contains("arrested"));
        assert!(!registry.contains("permit-kind"));
    }

    #[test]
    fn test_narrowing_records_steps_in_order() {
        let schema = fixtures::schema();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let query = MemoryQuery::new(fixtures::items())
            .by_schema(&schema)
            .by_date_range(DateField::ItemDate, start, end);
        assert_eq!(query.steps().len(), 2);
        assert!(query.steps()[0].starts_with("schema="));
        assert!(query
            .items()
            .iter()
            .all(|item| item.schema_id == schema.id && item.item_date.format("%Y-%m").to_string() == "2020-01"));
    }

    #[test]
    fn test_null_attribute_matches_unset() {
        let field = fixtures::field("arrested");
        let query = MemoryQuery::new(fixtures::items()).by_attribute(&field, &AttributeValue::Null);
        assert!(!query.is_empty());
        assert!(query
            .items()
            .iter()
            .all(|item| matches!(item.attribute("arrested"), None | Some(AttributeValue::Null))));
    }

    #[test]
    fn test_text_search_requires_every_term() {
        let field = fixtures::field("description");
        let both = MemoryQuery::new(fixtures::items()).text_search(&field, "window, broken");
        let one = MemoryQuery::new(fixtures::items()).text_search(&field, "window");
        assert!(both.len() <= one.len());
        assert!(!both.is_empty());
    }
}
