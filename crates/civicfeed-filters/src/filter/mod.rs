//! Filter variants.
//!
//! A [`Filter`] is one narrowing predicate plus the UI metadata needed to show
//! it (value, label) and to rebuild its URL fragment. The set of variants is
//! closed; behavior is dispatched by `match`:
//!
//! | variant      | key            | priority |
//! |--------------|----------------|----------|
//! | `Schema`     | `schema`       | -9999    |
//! | `Date`       | `date`         | 1        |
//! | `Bool`       | field slug     | 100      |
//! | `Attribute`  | field slug     | 101      |
//! | `Location`   | `location`     | 200      |
//! | `Block`      | `location`     | 200      |
//! | `Lookup`     | field slug     | 900      |
//! | `TextSearch` | field slug     | 1000     |
//!
//! The priorities are a static guess at cheap-before-expensive; they were
//! never measured.

mod attribute;
mod date;
mod location;
mod schema;

pub use attribute::{AttributeFilter, BoolFilter, LookupFilter, TextSearchFilter};
pub use date::{month_bounds, parse_date, DateFilter};
pub use location::{BlockFilter, BlockRange, LocationFilter};
pub use schema::SchemaFilter;

use civicfeed_core::NewsItemQuery;
use serde::Serialize;

use crate::context::FilterContext;
use crate::error::{FilterError, Result};

// ============================================================================
// Shared metadata
// ============================================================================

/// Strings used for URLs, breadcrumbs and choosers. `None` means "do not show".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FilterDisplay {
    pub(crate) name: Option<String>,
    pub(crate) argname: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) short_value: Option<String>,
    pub(crate) label: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Schema,
    Attribute,
    TextSearch,
    Bool,
    Lookup,
    Location,
    Block,
    Date,
    PubDate,
}

impl FilterKind {
    /// Lower applies earlier.
    pub const fn sort_priority(self) -> i32 {
        match self {
            Self::Schema => -9999,
            Self::Date | Self::PubDate => 1,
            Self::Bool => 100,
            Self::Attribute => 101,
            Self::Location | Self::Block => 200,
            Self::Lookup => 900,
            Self::TextSearch => 1000,
        }
    }
}

/// One selectable option offered when a filter needs more input.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Choice {
    pub slug: String,
    pub name: String,
}

impl Choice {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// What a non-concrete filter still needs from the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoreInput {
    pub filter_argname: String,
    pub lookup_type: String,
    pub lookup_type_slug: String,
    pub lookup_list: Vec<Choice>,
}

// ============================================================================
// Filter
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Schema(SchemaFilter),
    Attribute(AttributeFilter),
    TextSearch(TextSearchFilter),
    Bool(BoolFilter),
    Lookup(LookupFilter),
    Location(LocationFilter),
    Block(BlockFilter),
    Date(DateFilter),
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Schema(_) => FilterKind::Schema,
            Self::Attribute(_) => FilterKind::Attribute,
            Self::TextSearch(_) => FilterKind::TextSearch,
            Self::Bool(_) => FilterKind::Bool,
            Self::Lookup(_) => FilterKind::Lookup,
            Self::Location(_) => FilterKind::Location,
            Self::Block(_) => FilterKind::Block,
            Self::Date(f) => f.kind(),
        }
    }

    pub fn sort_priority(&self) -> i32 {
        self.kind().sort_priority()
    }

    pub(crate) fn display(&self) -> &FilterDisplay {
        match self {
            Self::Schema(f) => &f.display,
            Self::Attribute(f) => &f.display,
            Self::TextSearch(f) => &f.display,
            Self::Bool(f) => &f.display,
            Self::Lookup(f) => &f.display,
            Self::Location(f) => &f.display,
            Self::Block(f) => &f.display,
            Self::Date(f) => &f.display,
        }
    }

    /// Identity label, e.g. `date`, `location` or the field name.
    pub fn name(&self) -> Option<&str> {
        self.display().name.as_deref()
    }

    /// URL parameter this filter is parsed from.
    pub fn argname(&self) -> Option<&str> {
        self.display().argname.as_deref()
    }

    /// URL fragment for this filter alone.
    pub fn url(&self) -> Option<&str> {
        self.display().url.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.display().value.as_deref()
    }

    pub fn short_value(&self) -> Option<&str> {
        self.display().short_value.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.display().label.as_deref()
    }

    /// Whether the filter got enough arguments to narrow a query.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Schema(_) | Self::TextSearch(_) | Self::Block(_) | Self::Date(_) => true,
            Self::Attribute(f) => f.is_concrete(),
            Self::Bool(f) => f.is_concrete(),
            Self::Lookup(f) => f.is_concrete(),
            Self::Location(f) => f.is_concrete(),
        }
    }

    /// `None` when the filter is complete, otherwise the choices to offer.
    pub fn validate(&self, ctx: &FilterContext) -> Result<Option<MoreInput>> {
        match self {
            Self::Schema(_) | Self::Attribute(_) | Self::TextSearch(_) => Ok(None),
            Self::Block(_) | Self::Date(_) => Ok(None),
            Self::Bool(f) => Ok(f.validate()),
            Self::Lookup(f) => Ok(f.validate(ctx)),
            Self::Location(f) => f.validate(ctx),
        }
    }

    /// Narrow `query`. May resolve deferred references and update display
    /// fields with what was found.
    pub fn apply<Q: NewsItemQuery>(&mut self, query: Q, ctx: &FilterContext) -> Result<Q> {
        if !self.is_concrete() {
            return Err(FilterError::new(format!(
                "filter {} needs more input before it can be applied",
                self.name().unwrap_or("?")
            )));
        }
        match self {
            Self::Schema(f) => Ok(f.apply(query)),
            Self::Attribute(f) => f.apply(query),
            Self::TextSearch(f) => Ok(f.apply(query)),
            Self::Bool(f) => f.apply(query),
            Self::Lookup(f) => f.apply(query),
            Self::Location(f) => f.apply(query, ctx),
            Self::Block(f) => f.apply(query, ctx),
            Self::Date(f) => f.apply(query),
        }
    }
}

macro_rules! filter_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Filter {
                fn from(filter: $ty) -> Self {
                    Self::$variant(filter)
                }
            }
        )*
    };
}

filter_from! {
    Schema => SchemaFilter,
    Attribute => AttributeFilter,
    TextSearch => TextSearchFilter,
    Bool => BoolFilter,
    Lookup => LookupFilter,
    Location => LocationFilter,
    Block => BlockFilter,
    Date => DateFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities_follow_the_static_order() {
        let order = [
            FilterKind::Schema,
            FilterKind::Date,
            FilterKind::Bool,
            FilterKind::Attribute,
            FilterKind::Location,
            FilterKind::Lookup,
            FilterKind::TextSearch,
        ];
        let priorities: Vec<i32> = order.iter().map(|k| k.sort_priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
        assert_eq!(FilterKind::PubDate.sort_priority(), FilterKind::Date.sort_priority());
        assert_eq!(FilterKind::Block.sort_priority(), FilterKind::Location.sort_priority());
    }

    #[test]
    fn test_more_input_serializes_for_templates() {
        let more = MoreInput {
            filter_argname: "by-arrested".to_string(),
            lookup_type: "whether they led to an arrest".to_string(),
            lookup_type_slug: "arrested".to_string(),
            lookup_list: vec![Choice::new("yes", "Yes")],
        };
        let json = serde_json::to_value(&more).unwrap();
        assert_eq!(json["lookup_list"][0]["slug"], "yes");
        assert_eq!(json["filter_argname"], "by-arrested");
    }
}
