//! The query collaborator: anything that can be narrowed by filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{AttributeValue, Location, Lookup, Point, Schema, SchemaField};

/// Which item date a date-range predicate targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    ItemDate,
    PubDate,
}

impl DateField {
    pub const fn column(self) -> &'static str {
        match self {
            Self::ItemDate => "item_date",
            Self::PubDate => "pub_date",
        }
    }
}

/// A buffered search region around a point, matched by bounding-box overlap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchArea {
    pub center: Point,
    /// Buffer distance in map units (degrees).
    pub radius: f64,
}

impl SearchArea {
    pub const fn around(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// `(min_x, min_y, max_x, max_y)` of the buffer.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    pub fn overlaps(&self, point: Point) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bbox();
        (min_x..=max_x).contains(&point.x) && (min_y..=max_y).contains(&point.y)
    }
}

/// Narrowing operations a news item query must support.
///
/// Every method consumes the query and returns a narrower one; filters never
/// fabricate queries of their own.
pub trait NewsItemQuery: Sized {
    /// Items of exactly this schema.
    fn by_schema(self, schema: &Schema) -> Self;

    /// Items whose attribute equals `value` (`Null` matches unset values).
    fn by_attribute(self, field: &SchemaField, value: &AttributeValue) -> Self;

    /// Items tagged with this lookup value.
    fn by_lookup(self, field: &SchemaField, lookup: &Lookup) -> Self;

    /// Free-text search scoped to one field.
    fn text_search(self, field: &SchemaField, text: &str) -> Self;

    /// Items with `start <= date < end_exclusive` on the given date field.
    fn by_date_range(self, field: DateField, start: NaiveDate, end_exclusive: NaiveDate) -> Self;

    /// Items whose geometry overlaps the search area.
    fn overlapping(self, area: &SearchArea) -> Self;

    /// Items related to this location.
    fn by_location(self, location: &Location) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_area_overlap_is_inclusive() {
        let area = SearchArea::around(Point::new(1.0, 1.0), 0.5);
        assert!(area.overlaps(Point::new(1.5, 0.5)));
        assert!(area.overlaps(Point::new(1.0, 1.0)));
        assert!(!area.overlaps(Point::new(1.6, 1.0)));
    }
}
