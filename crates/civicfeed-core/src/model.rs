//! Schema-typed news items and the geographic entities they refer to.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Schemas
// ============================================================================

/// The type definition governing which attribute fields an item may carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub plural_name: String,
    /// Human name of the item date ("date reported", "inspection date", ...).
    pub date_name: String,
}

/// Storage kind of a schema field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Enumerated values, see [`Lookup`].
    Lookup,
    Bool,
    Int,
    Varchar,
    Text,
    Date,
    Time,
    DateTime,
}

/// A typed, named attribute slot on a schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaField {
    pub id: i64,
    pub schema_id: i64,
    pub name: String,
    /// Unique, URL-safe identifier used in `by-<slug>` filter arguments.
    pub slug: String,
    pub pretty_name: String,
    pub pretty_name_plural: String,
    pub kind: FieldKind,
    /// Whether free-text search over this field is supported.
    pub is_searchable: bool,
}

impl SchemaField {
    pub fn is_lookup(&self) -> bool {
        self.kind == FieldKind::Lookup
    }

    pub fn is_type(&self, kind: FieldKind) -> bool {
        self.kind == kind
    }
}

/// An enumerated value belonging to a lookup-kind schema field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lookup {
    pub id: i64,
    pub schema_field_id: i64,
    pub slug: String,
    pub name: String,
}

// ============================================================================
// Places
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationType {
    pub slug: String,
    pub name: String,
    pub plural_name: String,
}

/// A named area (neighborhood, zip code, ward, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub location_type: LocationType,
    pub is_public: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One side of a street between two address numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub id: i64,
    /// City slug; empty for single-city deployments.
    pub city: String,
    pub street_slug: String,
    pub pretty_name: String,
    pub from_num: u32,
    pub to_num: u32,
    /// Street pre-direction (`N`, `S`, `E`, `W`) or empty.
    pub predir: String,
    pub centroid: Point,
}

impl Block {
    /// Address range as it appears in URLs, e.g. `100-199`.
    pub fn number(&self) -> String {
        format!("{}-{}", self.from_num, self.to_num)
    }

    /// Lowercased pre-direction suffix for URLs (`n`, `s`, ...), possibly empty.
    pub fn dir_url_bit(&self) -> String {
        self.predir.to_lowercase()
    }
}

// ============================================================================
// Items
// ============================================================================

/// A literal attribute value stored on an item or used as a filter operand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl AttributeValue {
    /// Literal form used inside filter URLs.
    pub fn url_literal(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Time(t) => t.format("%H:%M:%S").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_literal())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Option<bool>> for AttributeValue {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Null, Self::Bool)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveTime> for AttributeValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl From<NaiveDateTime> for AttributeValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// A geotagged, schema-typed record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub id: i64,
    pub schema_id: i64,
    pub title: String,
    pub item_date: NaiveDate,
    pub pub_date: NaiveDate,
    pub point: Option<Point>,
    /// Ids of the named locations this item falls within.
    pub location_ids: Vec<i64>,
    /// Attribute values keyed by schema field slug. Lookup fields hold the
    /// lookup id as [`AttributeValue::Int`].
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl NewsItem {
    pub fn attribute(&self, slug: &str) -> Option<&AttributeValue> {
        self.attributes.get(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_literals_use_iso_forms() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();
        let time = NaiveTime::from_hms_opt(7, 5, 9).unwrap();
        assert_eq!(AttributeValue::Date(date).url_literal(), "2020-01-05");
        assert_eq!(AttributeValue::Time(time).url_literal(), "07:05:09");
        assert_eq!(
            AttributeValue::DateTime(date.and_time(time)).url_literal(),
            "2020-01-05T07:05:09"
        );
        assert_eq!(AttributeValue::Int(42).url_literal(), "42");
        assert_eq!(AttributeValue::from("hello").url_literal(), "hello");
    }

    #[test]
    fn test_block_url_bits() {
        let block = Block {
            id: 1,
            city: String::new(),
            street_slug: "main-st".to_string(),
            pretty_name: "100-199 N Main St.".to_string(),
            from_num: 100,
            to_num: 199,
            predir: "N".to_string(),
            centroid: Point::new(0.0, 0.0),
        };
        assert_eq!(block.number(), "100-199");
        assert_eq!(block.dir_url_bit(), "n");
    }

    #[test]
    fn test_attribute_values_serialize_tagged() {
        let json = serde_json::to_string(&AttributeValue::Int(3)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":3}"#);
    }
}
