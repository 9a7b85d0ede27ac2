use civicfeed_core::{NewsItemQuery, Schema};

use super::FilterDisplay;

/// Pins the item type. Always concrete, always applied first.
///
/// Its URL fragment is empty: the schema is part of the base URL, so its
/// breadcrumb points at the base URL itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFilter {
    schema: Schema,
    pub(crate) display: FilterDisplay,
}

impl SchemaFilter {
    pub fn new(schema: Schema) -> Self {
        let display = FilterDisplay {
            name: Some("schema".to_string()),
            url: Some(String::new()),
            value: Some(schema.plural_name.clone()),
            ..FilterDisplay::default()
        };
        Self { schema, display }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&self, query: Q) -> Q {
        query.by_schema(&self.schema)
    }
}
