//! Civicfeed filter chains
//!
//! Turns the filter part of a listing URL into an ordered chain of filters,
//! narrows a news item query with it, and renders the chain back into
//! breadcrumbs and URLs:
//!
//! ```text
//!   /crime/filter/by-date=2020-01-01,2020-01-31;locations=neighborhoods,downtown/
//!                        │
//!                        ▼  FilterChain::from_request
//!   ┌────────┬──────────────────────────┬──────────────────────────────┐
//!   │ schema │ date  Jan. 1 - Jan. 31   │ location  neighborhoods/...  │
//!   └────────┴──────────────────────────┴──────────────────────────────┘
//!        │ apply (priority order)                  │ make_breadcrumbs (chain order)
//!        ▼                                         ▼
//!   NewsItemQuery                           [Crime Reports, Jan. 1, 2020 - ..., Downtown]
//! ```
//!
//! ## Key Features
//!
//! - **Closed filter set**: schema, attribute, text search, boolean, lookup,
//!   location, block and date filters
//! - **Deferred resolution**: location slugs resolve when applied; resolved
//!   names flow back into the chain for display
//! - **Choosers**: incomplete filters report the choices to offer via
//!   [`FilterChain::validate`]
//! - **Redirects**: a block without a radius fails with a URL that fixes it

pub mod args;
pub mod breadcrumbs;
pub mod chain;
pub mod config;
pub mod context;
pub mod entries;
pub mod error;
pub mod filter;
pub mod parse;
pub mod radius;
pub mod text;

pub use args::{FilterArg, FilterKey};
pub use breadcrumbs::{Breadcrumb, CrumbEdits};
pub use chain::{FilterChain, DATE_KEY, LOCATION_KEY, SCHEMA_KEY};
pub use config::FilterConfig;
pub use context::{FilterContext, RequestInfo};
pub use entries::FilterEntries;
pub use error::{FilterError, Result};
pub use filter::{
    AttributeFilter, BlockFilter, BlockRange, BoolFilter, Choice, DateFilter, Filter, FilterKind,
    LocationFilter, LookupFilter, MoreInput, SchemaFilter, TextSearchFilter,
};
pub use parse::{parse_clauses, Clause};
pub use radius::{radius_url, BlockRadius, PlaceId, BLOCK_RADIUS_CHOICES};
