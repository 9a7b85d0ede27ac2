//! Ordered, keyed collections of filters.
//!
//! A [`FilterChain`] keeps filters in insertion order, which is the order
//! breadcrumbs are built in. Applying the chain walks the filters by sort
//! priority instead, so cheap predicates narrow the query first.

use std::sync::Arc;

use civicfeed_core::{
    AttributeValue, DateField, FieldKind, Lookup, NewsItemQuery, Schema, SchemaField,
};

use crate::args::{FilterArg, FilterKey};
use crate::context::FilterContext;
use crate::entries::FilterEntries;
use crate::error::{FilterError, Result};
use crate::filter::{
    month_bounds, parse_date, AttributeFilter, BlockFilter, BoolFilter, DateFilter, Filter,
    LocationFilter, LookupFilter, MoreInput, SchemaFilter, TextSearchFilter,
};
use crate::radius::PlaceId;

/// Chain key shared by all geographic filters.
pub const LOCATION_KEY: &str = "location";
/// Chain key shared by item-date and pub-date filters.
pub const DATE_KEY: &str = "date";
pub const SCHEMA_KEY: &str = "schema";

#[derive(Debug, Clone)]
pub struct FilterChain {
    pub(crate) entries: FilterEntries,
    pub(crate) context: Arc<FilterContext>,
    pub(crate) base_url: Option<String>,
    pub(crate) lookup_descriptions: Vec<Lookup>,
}

fn unexpected(key: &str, arg: &FilterArg) -> FilterError {
    FilterError::new(format!("unexpected argument {arg:?} for {key}"))
}

impl FilterChain {
    /// An empty chain, starting with a schema filter when the context has a
    /// schema.
    pub fn new(context: Arc<FilterContext>) -> Self {
        let mut entries = FilterEntries::new();
        if let Some(schema) = context.schema() {
            entries.replace(SCHEMA_KEY, SchemaFilter::new(schema.clone()).into());
        }
        Self {
            entries,
            context,
            base_url: None,
            lookup_descriptions: Vec::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn context(&self) -> &FilterContext {
        &self.context
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.context.schema()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Lookups resolved while parsing a request, in URL order.
    pub fn lookup_descriptions(&self) -> &[Lookup] {
        &self.lookup_descriptions
    }

    // ------------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------------

    pub fn get(&self, key: &str) -> Option<&Filter> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// Filters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Filter)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Store a prebuilt filter. Fails with `DuplicateKey` if `key` is taken.
    pub fn insert(&mut self, key: impl Into<String>, filter: impl Into<Filter>) -> Result<()> {
        let key = key.into();
        let filter = filter.into();
        tracing::debug!(key = %key, kind = ?filter.kind(), "insert filter");
        self.entries.insert(key, filter)
    }

    pub fn remove(&mut self, key: &str) -> Option<Filter> {
        self.entries.remove(key)
    }

    /// Build a filter from `key` and `values` and store it.
    ///
    /// With a [`SchemaField`] key the filter is keyed by the field slug and
    /// its type follows the field: lookup, bool, searchable text, or a plain
    /// attribute. No values (or one empty string) gives the chooser.
    ///
    /// With a string key the first value decides:
    /// - `Location`, `LocationType` (+ slug) or `Block` (+ radius) build a
    ///   geographic filter stored under `location`
    /// - `Lookup` builds a lookup filter on the lookup's field
    /// - `Date` (+ end date, or `"month"` for the whole month) builds a date
    ///   filter; the key `pubdate` filters on publication date and is stored
    ///   under `date`
    /// - `Filter` is stored as is
    pub fn add(&mut self, key: impl Into<FilterKey>, values: Vec<FilterArg>) -> Result<()> {
        let (key, filter) = self.build(key.into(), values)?;
        self.insert(key, filter)
    }

    /// Like [`add`](Self::add), but an existing filter under the same key is
    /// dropped first.
    pub fn replace(&mut self, key: impl Into<FilterKey>, values: Vec<FilterArg>) -> Result<()> {
        let (key, filter) = self.build(key.into(), values)?;
        tracing::debug!(key = %key, kind = ?filter.kind(), "replace filter");
        self.entries.replace(key, filter);
        Ok(())
    }

    /// Install the block or location named by a place id under `location`,
    /// replacing any geographic filter already there.
    pub fn add_by_place_id(&mut self, pid: &str) -> Result<()> {
        let filter: Filter = match PlaceId::parse(pid)? {
            PlaceId::Block { id, radius } => {
                let block = self
                    .context
                    .catalog()
                    .block_by_id(id)
                    .ok_or_else(|| FilterError::new(format!("No such block {id}")))?;
                BlockFilter::with_radius(&self.context, block, radius).into()
            }
            PlaceId::Location { id } => {
                let location = self
                    .context
                    .catalog()
                    .location_by_id(id)
                    .ok_or_else(|| FilterError::new(format!("No such location {id}")))?;
                LocationFilter::from_location(location).into()
            }
        };
        self.entries.replace(LOCATION_KEY, filter);
        Ok(())
    }

    fn build(&self, key: FilterKey, values: Vec<FilterArg>) -> Result<(String, Filter)> {
        let key = match key {
            FilterKey::Field(field) => return self.build_for_field(field, values),
            FilterKey::Name(name) => name,
        };
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Err(FilterError::new(format!("no values passed for arg {key}")));
        };
        let ctx = self.context.as_ref();

        match first {
            FilterArg::Location(location) => Ok((
                LOCATION_KEY.to_string(),
                LocationFilter::from_location(location).into(),
            )),
            FilterArg::LocationType(location_type) => {
                let slug = match values.next() {
                    None => None,
                    Some(FilterArg::Text(slug)) => Some(slug),
                    Some(other) => return Err(unexpected(&key, &other)),
                };
                Ok((
                    LOCATION_KEY.to_string(),
                    LocationFilter::from_type(&location_type, slug).into(),
                ))
            }
            FilterArg::Block(block) => {
                let filter = match values.next() {
                    None => BlockFilter::from_block(ctx, block, &[])?,
                    Some(FilterArg::Radius(radius)) => BlockFilter::with_radius(ctx, block, radius),
                    Some(FilterArg::Text(fragment)) => BlockFilter::from_block(ctx, block, &[fragment])?,
                    Some(other) => return Err(unexpected(&key, &other)),
                };
                Ok((LOCATION_KEY.to_string(), filter.into()))
            }
            FilterArg::Lookup(lookup) => {
                let field = ctx
                    .catalog()
                    .schema_field(lookup.schema_field_id)
                    .ok_or_else(|| {
                        FilterError::new(format!("No SchemaField for lookup '{}'", lookup.slug))
                    })?;
                Ok((key, LookupFilter::from_lookup(field, lookup).into()))
            }
            FilterArg::Date(start) => {
                let (start, end) = match values.next() {
                    None => (start, start),
                    Some(FilterArg::Date(end)) => (start, end),
                    Some(FilterArg::Text(text)) if text == "month" => month_bounds(start),
                    Some(FilterArg::Text(text)) => {
                        let end = parse_date(&text)
                            .ok_or_else(|| FilterError::new("Missing or invalid date range"))?;
                        (start, end)
                    }
                    Some(other) => return Err(unexpected(&key, &other)),
                };
                let (key, field) = if key == "pubdate" {
                    (DATE_KEY.to_string(), DateField::PubDate)
                } else {
                    (key, DateField::ItemDate)
                };
                let filter = DateFilter::new(field, start, end, self.schema())?;
                Ok((key, filter.into()))
            }
            FilterArg::Filter(filter) => Ok((key, *filter)),
            other => Err(unexpected(&key, &other)),
        }
    }

    fn build_for_field(&self, field: SchemaField, values: Vec<FilterArg>) -> Result<(String, Filter)> {
        let key = field.slug.clone();
        let blank = match values.as_slice() {
            [] => true,
            [FilterArg::Text(text)] => text.is_empty(),
            _ => false,
        };
        if blank {
            return Ok((key, AttributeFilter::chooser(field).into()));
        }

        let filter: Filter = if field.is_lookup() {
            match values.into_iter().next() {
                Some(FilterArg::Lookup(lookup)) => LookupFilter::from_lookup(field, lookup).into(),
                Some(FilterArg::Text(slug)) => {
                    LookupFilter::from_slug(&self.context, field, &slug)?.into()
                }
                Some(other) => return Err(unexpected(&key, &other)),
                None => return Err(FilterError::new(format!("no values passed for arg {key}"))),
            }
        } else if field.is_type(FieldKind::Bool) {
            let tokens = values
                .iter()
                .map(|arg| bool_token(arg).ok_or_else(|| unexpected(&key, arg)))
                .collect::<Result<Vec<_>>>()?;
            BoolFilter::new(field, &tokens)?.into()
        } else if field.is_searchable {
            let terms = values
                .iter()
                .map(|arg| match arg {
                    FilterArg::Text(text) => Ok(text.clone()),
                    FilterArg::Value(value) => Ok(value.to_string()),
                    other => Err(unexpected(&key, other)),
                })
                .collect::<Result<Vec<_>>>()?;
            TextSearchFilter::new(field, &terms)?.into()
        } else {
            let mut values = values.into_iter();
            let value = match (values.next(), values.next()) {
                (Some(FilterArg::Value(value)), None) => value,
                (Some(FilterArg::Text(text)), None) => AttributeValue::Text(text),
                (Some(FilterArg::Date(date)), None) => AttributeValue::Date(date),
                (Some(_), Some(extra)) => return Err(unexpected(&key, &extra)),
                (Some(other), None) => return Err(unexpected(&key, &other)),
                (None, _) => return Err(FilterError::new(format!("no values passed for arg {key}"))),
            };
            AttributeFilter::new(field, value).into()
        };
        Ok((key, filter))
    }

    // ------------------------------------------------------------------------
    // Whole-chain operations
    // ------------------------------------------------------------------------

    /// What the first filter that still needs input wants, in chain order.
    pub fn validate(&self) -> Result<Option<MoreInput>> {
        for (_, filter) in self.entries.iter() {
            if let Some(more) = filter.validate(&self.context)? {
                return Ok(Some(more));
            }
        }
        Ok(None)
    }

    /// Narrow `query` by every filter in priority order. Values resolved while
    /// applying (location names, block descriptions) are kept on this chain.
    pub fn apply<Q: NewsItemQuery>(&mut self, query: Q) -> Result<Q> {
        let ctx = &self.context;
        let mut query = query;
        for position in self.entries.priority_order() {
            if let Some((key, filter)) = self.entries.entry_mut(position) {
                tracing::debug!(key, priority = filter.sort_priority(), "apply filter");
                query = filter.apply(query, ctx)?;
            }
        }
        Ok(query)
    }

    /// An independent copy; changes to either chain do not affect the other.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// A copy with filters re-ordered by sort priority.
    pub fn normalized_clone(&self) -> Self {
        Self {
            entries: self.entries.sorted_by_priority(),
            ..self.clone()
        }
    }
}

fn bool_token(arg: &FilterArg) -> Option<String> {
    match arg {
        FilterArg::Text(text) => Some(text.clone()),
        FilterArg::Value(AttributeValue::Bool(true)) => Some("yes".to_string()),
        FilterArg::Value(AttributeValue::Bool(false)) => Some("no".to_string()),
        FilterArg::Value(AttributeValue::Null) => Some("na".to_string()),
        _ => None,
    }
}
