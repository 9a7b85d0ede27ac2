//! Filter URL parsing.
//!
//! The filter part of a URL is a `;`-separated list of clauses, each
//! `name=value1,value2`:
//!
//! ```text
//! by-date=2020-01-01,2020-01-31;by-crime-type=theft;streets=main-st,100-199,8-blocks
//! ```

use std::sync::Arc;

use civicfeed_core::{DateField, FieldKind, FieldRegistry};
use percent_encoding::percent_decode_str;

use crate::chain::{FilterChain, DATE_KEY, LOCATION_KEY};
use crate::context::FilterContext;
use crate::error::{FilterError, Result};
use crate::filter::{BlockFilter, BoolFilter, DateFilter, LocationFilter, LookupFilter, TextSearchFilter};

/// One `name=values` clause, names and values trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub name: String,
    pub values: Vec<String>,
}

/// Split a decoded argument string into clauses. Empty values are dropped and
/// clauses with an empty name are skipped; a clause without `=` is an error.
pub fn parse_clauses(argstring: &str) -> Result<Vec<Clause>> {
    let mut clauses = Vec::new();
    for raw in argstring.split(';') {
        let (name, values) = raw.split_once('=').ok_or_else(|| {
            FilterError::new(format!("Invalid filter parameter {raw:?}, no equals sign"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        clauses.push(Clause {
            name: name.to_string(),
            values: values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }
    Ok(clauses)
}

/// Drop the trailing slash, turn `+` into spaces and percent-decode. Bytes
/// that don't decode to UTF-8 are an error.
fn normalize(argstring: &str) -> Result<String> {
    let plain = argstring.trim_end_matches('/').replace('+', " ");
    let decoded = percent_decode_str(&plain)
        .decode_utf8()
        .map_err(|_| FilterError::new("Invalid filter parameter encoding"))?;
    Ok(decoded.into_owned())
}

impl FilterChain {
    /// Build a chain from the filter part of a request URL.
    ///
    /// Each `by-<slug>` clause consumes its field from `registry`; the fields
    /// left over are returned with the chain, so callers can offer them as
    /// further filters. `None`, an empty string and `filter` all mean "no
    /// filters".
    pub fn from_request(
        context: Arc<FilterContext>,
        argstring: Option<&str>,
        mut registry: FieldRegistry,
    ) -> Result<(Self, FieldRegistry)> {
        let mut chain = Self::new(Arc::clone(&context));
        let argstring = normalize(argstring.unwrap_or_default())?;
        if argstring.is_empty() || argstring == "filter" {
            return Ok((chain, registry));
        }

        let schema = context.schema();
        for Clause { name, values } in parse_clauses(&argstring)? {
            tracing::debug!(name = %name, ?values, "filter clause");
            match name.as_str() {
                "by-date" => {
                    let filter = DateFilter::from_strings(DateField::ItemDate, &values, schema)?;
                    chain.insert(DATE_KEY, filter)?;
                }
                "by-pub-date" => {
                    let filter = DateFilter::from_strings(DateField::PubDate, &values, schema)?;
                    chain.insert(DATE_KEY, filter)?;
                }
                _ if name.starts_with("by-") => {
                    let slug = &name["by-".len()..];
                    let field = registry
                        .pop(slug)
                        .ok_or_else(|| FilterError::new("Invalid SchemaField slug"))?;
                    let key = field.slug.clone();
                    if field.is_lookup() {
                        let filter = match values.first() {
                            Some(slug) => LookupFilter::from_slug(&context, field, slug)?,
                            None => LookupFilter::chooser(field),
                        };
                        if let Some(lookup) = filter.lookup() {
                            chain.lookup_descriptions.push(lookup.clone());
                        }
                        chain.insert(key, filter)?;
                    } else if field.is_type(FieldKind::Bool) {
                        chain.insert(key, BoolFilter::new(field, &values)?)?;
                    } else {
                        chain.insert(key, TextSearchFilter::new(field, &values)?)?;
                    }
                }
                _ if name.starts_with("streets") => {
                    chain.insert(LOCATION_KEY, BlockFilter::from_args(&context, &values)?)?;
                }
                _ if name.starts_with("locations") => {
                    chain.insert(LOCATION_KEY, LocationFilter::from_args(&values)?)?;
                }
                _ => return Err(FilterError::new(format!("Invalid filter type '{name}'"))),
            }
        }
        Ok((chain, registry))
    }
}
