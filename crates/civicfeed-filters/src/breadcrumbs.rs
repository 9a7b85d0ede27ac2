//! Breadcrumbs and cumulative filter URLs.

use serde::Serialize;

use crate::args::{FilterArg, FilterKey};
use crate::chain::FilterChain;
use crate::error::Result;
use crate::text::title_case;

/// One navigation step: a label and the URL with every filter up to it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
}

/// Edits applied to a working copy of the chain before crumbs are built.
#[derive(Debug, Clone, Default)]
pub struct CrumbEdits<'a> {
    /// Replaced (or added) in order, after removals.
    pub additions: Vec<(FilterKey, Vec<FilterArg>)>,
    /// Keys dropped first; unknown keys are ignored.
    pub removals: Vec<&'a str>,
    /// Last key to produce a crumb.
    pub stop_at: Option<&'a str>,
    /// Overrides the chain's base URL.
    pub base_url: Option<&'a str>,
}

impl<'a> CrumbEdits<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, key: impl Into<FilterKey>, values: Vec<FilterArg>) -> Self {
        self.additions.push((key.into(), values));
        self
    }

    pub fn remove(mut self, key: &'a str) -> Self {
        self.removals.push(key);
        self
    }

    pub fn stop_at(mut self, key: &'a str) -> Self {
        self.stop_at = Some(key);
        self
    }

    pub fn base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

impl FilterChain {
    /// Labels and cumulative URLs for the chain's filters, in chain order.
    ///
    /// Works on a copy, so `self` is never modified. Each filter's label is
    /// its first non-empty short value or value, else its label, title-cased.
    /// Filters with an empty label or without a URL fragment produce no
    /// crumb; filters with no label are skipped entirely.
    pub fn make_breadcrumbs(&self, edits: CrumbEdits<'_>) -> Result<Vec<Breadcrumb>> {
        let base_url = edits
            .base_url
            .map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_default();

        let mut working = self.copy();
        for key in &edits.removals {
            if working.remove(key).is_none() {
                tracing::warn!(key = %key, "can't remove nonexistent filter");
            }
        }
        for (key, values) in edits.additions {
            working.replace(key, values)?;
        }

        let mut fragments: Vec<&str> = Vec::new();
        let mut crumbs = Vec::new();
        for (key, filter) in working.iter() {
            let label = [filter.short_value(), filter.value()]
                .into_iter()
                .flatten()
                .find(|s| !s.is_empty())
                .or(filter.label());
            // A filter with no label at all is skipped, stop_at included.
            let Some(label) = label else {
                continue;
            };
            if let Some(url) = filter.url().filter(|_| !label.is_empty()) {
                if !url.is_empty() {
                    fragments.push(url);
                }
                let url = if fragments.is_empty() {
                    base_url.clone()
                } else {
                    format!("{base_url}{}/", fragments.join(";"))
                };
                crumbs.push(Breadcrumb {
                    label: title_case(label),
                    url,
                });
            }
            if edits.stop_at == Some(key) {
                break;
            }
        }
        Ok(crumbs)
    }

    /// Just the URLs of [`make_breadcrumbs`](Self::make_breadcrumbs).
    pub fn make_urls(&self, edits: CrumbEdits<'_>) -> Result<Vec<String>> {
        Ok(self
            .make_breadcrumbs(edits)?
            .into_iter()
            .map(|crumb| crumb.url)
            .collect())
    }

    /// One URL carrying every filter, or the base URL when nothing produced a
    /// crumb.
    pub fn make_url(&self, edits: CrumbEdits<'_>) -> Result<String> {
        let base_url = edits
            .base_url
            .map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_default();
        Ok(self
            .make_breadcrumbs(edits)?
            .pop()
            .map_or(base_url, |crumb| crumb.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FilterContext, RequestInfo};
    use crate::filter::AttributeFilter;
    use crate::radius::BlockRadius;
    use chrono::NaiveDate;
    use civicfeed_core::{fixtures, AttributeValue};
    use std::sync::Arc;

    fn chain() -> FilterChain {
        let ctx = FilterContext::new(Arc::new(fixtures::catalog()))
            .with_schema(fixtures::schema())
            .with_request(RequestInfo::new("/crime/filter/"));
        FilterChain::new(Arc::new(ctx)).with_base_url("/crime/filter/")
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_schema_crumb_points_at_base_url() {
        let crumbs = chain().make_breadcrumbs(CrumbEdits::new()).unwrap();
        assert_eq!(
            crumbs,
            vec![Breadcrumb {
                label: "Crime Reports".to_string(),
                url: "/crime/filter/".to_string(),
            }]
        );
    }

    #[test]
    fn test_crumbs_accumulate_fragments() {
        let mut chain = chain();
        chain.add("date", vec![d(2020, 1, 15).into()]).unwrap();
        chain.add(fixtures::field("arrested"), vec![AttributeValue::Bool(false).into()]).unwrap();
        let crumbs = chain.make_breadcrumbs(CrumbEdits::new()).unwrap();
        let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Crime Reports", "Jan. 15, 2020", "No"]);
        assert_eq!(crumbs[1].url, "/crime/filter/by-date=2020-01-15,2020-01-15/");
        assert_eq!(
            crumbs[2].url,
            "/crime/filter/by-date=2020-01-15,2020-01-15;by-arrested=no/"
        );
    }

    #[test]
    fn test_removals_and_additions_leave_chain_untouched() {
        let mut chain = chain();
        chain.add("date", vec![d(2020, 1, 15).into()]).unwrap();
        let edits = CrumbEdits::new()
            .remove("date")
            .remove("nonexistent")
            .add("location", vec![fixtures::blocks().remove(0).into(), BlockRadius::new(3).unwrap().into()]);
        let urls = chain.make_urls(edits).unwrap();
        assert_eq!(
            urls,
            vec![
                "/crime/filter/".to_string(),
                "/crime/filter/streets=main-st,100-199,3-blocks/".to_string(),
            ]
        );
        assert!(chain.contains_key("date"));
        assert!(!chain.contains_key("location"));
    }

    #[test]
    fn test_stop_at_ends_the_walk() {
        let mut chain = chain();
        chain.add("date", vec![d(2020, 1, 15).into()]).unwrap();
        chain.add(fixtures::field("description"), vec!["window".into()]).unwrap();
        let url = chain.make_url(CrumbEdits::new().stop_at("date")).unwrap();
        assert_eq!(url, "/crime/filter/by-date=2020-01-15,2020-01-15/");
    }

    #[test]
    fn test_stop_at_skips_unlabelled_filters() {
        let mut chain = chain();
        let mut beat = AttributeFilter::new(fixtures::field("beat"), AttributeValue::Int(3));
        beat.display.label = None;
        beat.display.value = None;
        beat.display.short_value = None;
        chain.insert("beat", beat).unwrap();
        chain.add("date", vec![d(2020, 1, 15).into()]).unwrap();

        let urls = chain.make_urls(CrumbEdits::new().stop_at("beat")).unwrap();
        assert_eq!(
            urls,
            vec![
                "/crime/filter/".to_string(),
                "/crime/filter/by-date=2020-01-15,2020-01-15/".to_string(),
            ]
        );
    }

    #[test]
    fn test_make_url_falls_back_to_base_url() {
        let ctx = FilterContext::new(Arc::new(fixtures::catalog()));
        let chain = FilterChain::new(Arc::new(ctx));
        let url = chain.make_url(CrumbEdits::new().base_url("/all/")).unwrap();
        assert_eq!(url, "/all/");
    }
}
