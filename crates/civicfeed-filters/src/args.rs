//! Typed arguments for [`FilterChain::add`](crate::FilterChain::add).

use chrono::NaiveDate;
use civicfeed_core::{AttributeValue, Block, Location, LocationType, Lookup, SchemaField};

use crate::filter::Filter;
use crate::radius::BlockRadius;

/// Key a filter is added under: a plain chain key (`date`, `location`, ...) or
/// a schema field, which keys the filter by the field's slug.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKey {
    Name(String),
    Field(SchemaField),
}

impl From<&str> for FilterKey {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for FilterKey {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<SchemaField> for FilterKey {
    fn from(value: SchemaField) -> Self {
        Self::Field(value)
    }
}

impl From<&SchemaField> for FilterKey {
    fn from(value: &SchemaField) -> Self {
        Self::Field(value.clone())
    }
}

/// One argument value. Which variants make sense depends on the key and on
/// the first argument; see [`FilterChain::add`](crate::FilterChain::add).
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    Text(String),
    Date(NaiveDate),
    Value(AttributeValue),
    Lookup(Lookup),
    Location(Location),
    LocationType(LocationType),
    Block(Block),
    Radius(BlockRadius),
    Filter(Box<Filter>),
}

impl From<&str> for FilterArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for FilterArg {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<AttributeValue> for FilterArg {
    fn from(value: AttributeValue) -> Self {
        Self::Value(value)
    }
}

impl From<Lookup> for FilterArg {
    fn from(value: Lookup) -> Self {
        Self::Lookup(value)
    }
}

impl From<Location> for FilterArg {
    fn from(value: Location) -> Self {
        Self::Location(value)
    }
}

impl From<LocationType> for FilterArg {
    fn from(value: LocationType) -> Self {
        Self::LocationType(value)
    }
}

impl From<Block> for FilterArg {
    fn from(value: Block) -> Self {
        Self::Block(value)
    }
}

impl From<BlockRadius> for FilterArg {
    fn from(value: BlockRadius) -> Self {
        Self::Radius(value)
    }
}

impl From<Filter> for FilterArg {
    fn from(value: Filter) -> Self {
        Self::Filter(Box::new(value))
    }
}
