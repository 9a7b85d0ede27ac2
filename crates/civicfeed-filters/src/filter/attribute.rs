//! Filters on schema-defined attribute fields.

use civicfeed_core::{AttributeValue, Lookup, NewsItemQuery, SchemaField};

use super::{Choice, FilterDisplay, MoreInput};
use crate::context::FilterContext;
use crate::error::{FilterError, Result};
use crate::text::capfirst;

/// Metadata every attribute filter starts from: `by-<slug>=` with an empty
/// value and the field's pretty name as label.
fn field_display(field: &SchemaField) -> FilterDisplay {
    FilterDisplay {
        name: Some(field.name.clone()),
        argname: Some(format!("by-{}", field.slug)),
        url: Some(format!("by-{}=", field.slug)),
        value: Some(String::new()),
        short_value: Some(String::new()),
        label: Some(field.pretty_name.clone()),
    }
}

fn not_concrete(field: &SchemaField) -> FilterError {
    FilterError::new(format!("no value given for {}", field.slug))
}

// ============================================================================
// Generic attribute
// ============================================================================

/// Exact match on a literal attribute value (ints, varchars, dates, times).
///
/// Without a value this is the placeholder shown while the user picks one.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeFilter {
    field: SchemaField,
    value: Option<AttributeValue>,
    pub(crate) display: FilterDisplay,
}

impl AttributeFilter {
    pub fn chooser(field: SchemaField) -> Self {
        let display = field_display(&field);
        Self {
            field,
            value: None,
            display,
        }
    }

    pub fn new(field: SchemaField, value: AttributeValue) -> Self {
        let mut display = field_display(&field);
        if let Some(url) = display.url.as_mut() {
            url.push_str(&value.url_literal());
        }
        Self {
            field,
            value: Some(value),
            display,
        }
    }

    pub fn field(&self) -> &SchemaField {
        &self.field
    }

    pub fn attribute_value(&self) -> Option<&AttributeValue> {
        self.value.as_ref()
    }

    pub(crate) fn is_concrete(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&self, query: Q) -> Result<Q> {
        let value = self.value.as_ref().ok_or_else(|| not_concrete(&self.field))?;
        Ok(query.by_attribute(&self.field, value))
    }
}

// ============================================================================
// Text search
// ============================================================================

/// Free-text search on one field's values.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearchFilter {
    field: SchemaField,
    query: String,
    pub(crate) display: FilterDisplay,
}

impl TextSearchFilter {
    pub fn new(field: SchemaField, terms: &[String]) -> Result<Self> {
        if terms.is_empty() {
            return Err(FilterError::new("Text search lookup requires search params"));
        }
        let query = terms.join(", ");
        let mut display = field_display(&field);
        display.value = Some(query.clone());
        display.short_value = Some(query.clone());
        display.url = Some(format!("by-{}={query}", field.slug));
        Ok(Self {
            field,
            query,
            display,
        })
    }

    pub fn field(&self) -> &SchemaField {
        &self.field
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&self, query: Q) -> Q {
        query.text_search(&self.field, &self.query)
    }
}

// ============================================================================
// Boolean
// ============================================================================

fn parse_bool_token(token: &str) -> Option<Option<bool>> {
    match token {
        "yes" => Some(Some(true)),
        "no" => Some(Some(false)),
        "na" => Some(None),
        _ => None,
    }
}

fn bool_label(choice: Option<bool>) -> &'static str {
    match choice {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "N/A",
    }
}

/// Boolean attribute: `yes`, `no` or `na` (unset).
#[derive(Debug, Clone, PartialEq)]
pub struct BoolFilter {
    field: SchemaField,
    /// `None` until a token is given; `Some(None)` means "not applicable".
    choice: Option<Option<bool>>,
    pub(crate) display: FilterDisplay,
}

impl BoolFilter {
    pub fn new(field: SchemaField, tokens: &[String]) -> Result<Self> {
        let mut display = field_display(&field);
        let choice = match tokens {
            [] => {
                display.value = Some(format!("By whether they {}", field.pretty_name_plural));
                None
            }
            [token] => {
                let choice = parse_bool_token(token)
                    .ok_or_else(|| FilterError::new(format!("Invalid boolean value '{token}'")))?;
                let short = bool_label(choice);
                let label = capfirst(display.label.as_deref().unwrap_or_default());
                display.url = Some(format!("by-{}={token}", field.slug));
                display.value = Some(format!("{label}: {short}"));
                display.short_value = Some(short.to_string());
                Some(choice)
            }
            _ => {
                return Err(FilterError::new(format!(
                    "Invalid boolean arg '{}'",
                    tokens.join(",")
                )))
            }
        };
        Ok(Self {
            field,
            choice,
            display,
        })
    }

    pub fn field(&self) -> &SchemaField {
        &self.field
    }

    /// The predicate value: `Some(Some(true))` for `yes`, `Some(None)` for `na`.
    pub fn choice(&self) -> Option<Option<bool>> {
        self.choice
    }

    pub(crate) fn is_concrete(&self) -> bool {
        self.choice.is_some()
    }

    pub(crate) fn validate(&self) -> Option<MoreInput> {
        if self.is_concrete() {
            return None;
        }
        let value = self.display.value.as_deref().unwrap_or_default();
        Some(MoreInput {
            filter_argname: self.display.argname.clone().unwrap_or_default(),
            lookup_type: value.strip_prefix("By ").unwrap_or(value).to_string(),
            lookup_type_slug: self.field.slug.clone(),
            lookup_list: vec![
                Choice::new("yes", "Yes"),
                Choice::new("no", "No"),
                Choice::new("na", "N/A"),
            ],
        })
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&self, query: Q) -> Result<Q> {
        let choice = self.choice.ok_or_else(|| not_concrete(&self.field))?;
        Ok(query.by_attribute(&self.field, &AttributeValue::from(choice)))
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Membership in one enumerated [`Lookup`] value of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupFilter {
    field: SchemaField,
    lookup: Option<Lookup>,
    pub(crate) display: FilterDisplay,
}

impl LookupFilter {
    pub fn chooser(field: SchemaField) -> Self {
        let display = field_display(&field);
        Self {
            field,
            lookup: None,
            display,
        }
    }

    /// Resolve `slug` among the field's lookups.
    pub fn from_slug(ctx: &FilterContext, field: SchemaField, slug: &str) -> Result<Self> {
        let lookup = ctx
            .catalog()
            .lookup(&field, slug)
            .ok_or_else(|| FilterError::new(format!("No such lookup '{slug}'")))?;
        Ok(Self::from_lookup(field, lookup))
    }

    pub fn from_lookup(field: SchemaField, lookup: Lookup) -> Self {
        let mut display = field_display(&field);
        display.value = Some(lookup.name.clone());
        display.short_value = Some(lookup.name.clone());
        display.url = Some(format!("by-{}={}", field.slug, lookup.slug));
        Self {
            field,
            lookup: Some(lookup),
            display,
        }
    }

    pub fn field(&self) -> &SchemaField {
        &self.field
    }

    pub fn lookup(&self) -> Option<&Lookup> {
        self.lookup.as_ref()
    }

    pub(crate) fn is_concrete(&self) -> bool {
        self.lookup.is_some()
    }

    pub(crate) fn validate(&self, ctx: &FilterContext) -> Option<MoreInput> {
        if self.is_concrete() {
            return None;
        }
        let mut lookups = ctx.catalog().lookups(&self.field);
        lookups.sort_by(|a, b| a.name.cmp(&b.name));
        Some(MoreInput {
            filter_argname: self.display.argname.clone().unwrap_or_default(),
            lookup_type: self.field.pretty_name.clone(),
            lookup_type_slug: self.field.slug.clone(),
            lookup_list: lookups
                .into_iter()
                .map(|l| Choice::new(l.slug, l.name))
                .collect(),
        })
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&self, query: Q) -> Result<Q> {
        let lookup = self.lookup.as_ref().ok_or_else(|| not_concrete(&self.field))?;
        Ok(query.by_lookup(&self.field, lookup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civicfeed_core::fixtures;
    use std::sync::Arc;

    fn ctx() -> FilterContext {
        FilterContext::new(Arc::new(fixtures::catalog()))
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_attribute_urls_use_typed_literals() {
        let date = chrono::NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
        let filter = AttributeFilter::new(fixtures::field("beat"), AttributeValue::Date(date));
        assert_eq!(filter.display.url.as_deref(), Some("by-beat=2021-03-04"));

        let filter = AttributeFilter::new(fixtures::field("beat"), AttributeValue::Int(7));
        assert_eq!(filter.display.url.as_deref(), Some("by-beat=7"));
        assert_eq!(filter.display.label.as_deref(), Some("beat"));
    }

    #[test]
    fn test_chooser_is_not_concrete_and_has_no_guidance() {
        let filter = AttributeFilter::chooser(fixtures::field("beat"));
        assert!(!filter.is_concrete());
        assert_eq!(filter.display.url.as_deref(), Some("by-beat="));
    }

    #[test]
    fn test_text_search_joins_terms() {
        let filter =
            TextSearchFilter::new(fixtures::field("description"), &strings(&["broken", "window"]))
                .unwrap();
        assert_eq!(filter.query(), "broken, window");
        assert_eq!(filter.display.url.as_deref(), Some("by-description=broken, window"));

        let err = TextSearchFilter::new(fixtures::field("description"), &[]).unwrap_err();
        assert_eq!(err.message(), "Text search lookup requires search params");
    }

    #[test]
    fn test_bool_tokens_map_to_predicate_values() {
        let field = fixtures::field("arrested");
        let yes = BoolFilter::new(field.clone(), &strings(&["yes"])).unwrap();
        let no = BoolFilter::new(field.clone(), &strings(&["no"])).unwrap();
        let na = BoolFilter::new(field.clone(), &strings(&["na"])).unwrap();
        assert_eq!(yes.choice(), Some(Some(true)));
        assert_eq!(no.choice(), Some(Some(false)));
        assert_eq!(na.choice(), Some(None));
        assert_eq!(yes.display.value.as_deref(), Some("Arrested: Yes"));
        assert_eq!(na.display.short_value.as_deref(), Some("N/A"));

        let err = BoolFilter::new(field.clone(), &strings(&["xyz"])).unwrap_err();
        assert_eq!(err.message(), "Invalid boolean value 'xyz'");
        assert!(BoolFilter::new(field, &strings(&["yes", "no"])).is_err());
    }

    #[test]
    fn test_bool_without_token_offers_three_choices() {
        let filter = BoolFilter::new(fixtures::field("arrested"), &[]).unwrap();
        let more = filter.validate().unwrap();
        assert_eq!(more.lookup_type, "whether they led to an arrest");
        assert_eq!(more.lookup_type_slug, "arrested");
        assert_eq!(more.filter_argname, "by-arrested");
        let slugs: Vec<&str> = more.lookup_list.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["yes", "no", "na"]);
    }

    #[test]
    fn test_lookup_resolves_slug_or_fails() {
        let ctx = ctx();
        let filter = LookupFilter::from_slug(&ctx, fixtures::field("crime-type"), "theft").unwrap();
        assert_eq!(filter.lookup().map(|l| l.id), Some(101));
        assert_eq!(filter.display.value.as_deref(), Some("Theft"));
        assert_eq!(filter.display.url.as_deref(), Some("by-crime-type=theft"));

        let err = LookupFilter::from_slug(&ctx, fixtures::field("crime-type"), "piracy").unwrap_err();
        assert_eq!(err.message(), "No such lookup 'piracy'");
    }

    #[test]
    fn test_lookup_chooser_lists_sorted_lookups() {
        let filter = LookupFilter::chooser(fixtures::field("crime-type"));
        let more = filter.validate(&ctx()).unwrap();
        let names: Vec<&str> = more.lookup_list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Arson", "Burglary", "Theft"]);
        assert_eq!(more.lookup_type, "crime type");
    }
}
