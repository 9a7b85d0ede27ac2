use chrono::{Datelike, Days, NaiveDate};
use civicfeed_core::{DateField, NewsItemQuery, Schema};

use super::{FilterDisplay, FilterKind};
use crate::error::{FilterError, Result};
use crate::text::ap_date;

/// Inclusive date range on the item date or the publication date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFilter {
    field: DateField,
    start: NaiveDate,
    end: NaiveDate,
    pub(crate) display: FilterDisplay,
}

fn invalid_range() -> FilterError {
    FilterError::new("Missing or invalid date range")
}

/// Parse `Y-M-D` with unpadded parts allowed (`2020-1-5`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().split('-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    (first, last)
}

impl DateFilter {
    /// `start` and `end` are both inclusive. The label comes from the schema's
    /// date name for item dates.
    pub fn new(
        field: DateField,
        start: NaiveDate,
        end: NaiveDate,
        schema: Option<&Schema>,
    ) -> Result<Self> {
        // The predicate needs end + 1 day; refuse ranges ending at the max date.
        end.checked_add_days(Days::new(1)).ok_or_else(invalid_range)?;

        let argname = match field {
            DateField::ItemDate => "by-date",
            DateField::PubDate => "by-pub-date",
        };
        let label = match field {
            DateField::ItemDate => schema.map_or_else(|| "date".to_string(), |s| s.date_name.clone()),
            DateField::PubDate => "date published".to_string(),
        };
        let value = if start == end {
            ap_date(start)
        } else {
            format!("{} - {}", ap_date(start), ap_date(end))
        };
        let display = FilterDisplay {
            name: Some("date".to_string()),
            argname: Some(argname.to_string()),
            url: Some(format!(
                "{argname}={},{}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            )),
            value: Some(value.clone()),
            short_value: Some(value),
            label: Some(label),
        };
        Ok(Self {
            field,
            start,
            end,
            display,
        })
    }

    /// Build from URL values; exactly two dates are required.
    pub fn from_strings(field: DateField, args: &[String], schema: Option<&Schema>) -> Result<Self> {
        let [start, end] = args else {
            return Err(invalid_range());
        };
        let start = parse_date(start).ok_or_else(invalid_range)?;
        let end = parse_date(end).ok_or_else(invalid_range)?;
        Self::new(field, start, end, schema)
    }

    pub fn field(&self) -> DateField {
        self.field
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub(crate) fn kind(&self) -> FilterKind {
        match self.field {
            DateField::ItemDate => FilterKind::Date,
            DateField::PubDate => FilterKind::PubDate,
        }
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&self, query: Q) -> Result<Q> {
        let end_exclusive = self
            .end
            .checked_add_days(Days::new(1))
            .ok_or_else(invalid_range)?;
        Ok(query.by_date_range(self.field, self.start, end_exclusive))
    }
}
