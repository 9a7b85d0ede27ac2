//! Integration tests for the complete civicfeed filter pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Filter URL → FilterChain → MemoryQuery
//! - FilterChain → breadcrumbs and URLs
//! - Configuration → block URLs and redirects
//!
//! Run with: cargo test --test integration_tests

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use civicfeed_core::{fixtures, FieldRegistry, MemoryQuery};
use civicfeed_filters::{
    BlockRadius, CrumbEdits, Filter, FilterChain, FilterConfig, FilterContext, RequestInfo,
};

fn context(path: &str, config: FilterConfig) -> Arc<FilterContext> {
    Arc::new(
        FilterContext::new(Arc::new(fixtures::catalog()))
            .with_config(config)
            .with_schema(fixtures::schema())
            .with_request(RequestInfo::new(path)),
    )
}

fn registry() -> FieldRegistry {
    fixtures::catalog().registry_for(&fixtures::schema())
}

fn parse(argstring: &str) -> Result<(FilterChain, FieldRegistry)> {
    let path = format!("/crime/filter/{argstring}");
    let ctx = context(&path, FilterConfig::default());
    let (chain, rest) = FilterChain::from_request(ctx, Some(argstring), registry())?;
    Ok((chain.with_base_url("/crime/filter/"), rest))
}

// ============================================================================
// URL → chain → query
// ============================================================================

#[test]
fn test_url_to_query_results() -> Result<()> {
    let (mut chain, rest) =
        parse("by-date=2020-1-1,2020-1-31;by-arrested=yes;by-description=window/")?;
    assert_eq!(rest.slugs().collect::<Vec<_>>(), vec!["beat", "crime-type"]);

    let result = chain.apply(MemoryQuery::new(fixtures::items()))?;
    assert_eq!(result.ids(), vec![1]);

    // schema, date, bool, text search
    assert_eq!(result.steps().len(), 4);
    assert_eq!(result.steps()[0], "schema=crime");
    assert!(result.steps()[3].starts_with("text:description"));
    Ok(())
}

#[test]
fn test_block_url_narrows_by_area() -> Result<()> {
    let (mut chain, _) = parse("streets=main-st,100-199,1-block")?;
    let result = chain.apply(MemoryQuery::new(fixtures::items()))?;
    // Items 1, 2 and 5 sit next to the block; 3 and 4 are far away.
    assert_eq!(result.ids(), vec![1, 2, 5]);

    let location = chain
        .get("location")
        .ok_or_else(|| anyhow!("missing location filter"))?;
    assert_eq!(location.value(), Some("1 block around 100-199 Main St."));
    Ok(())
}

#[test]
fn test_multi_city_block_resolution() -> Result<()> {
    let ctx = context("/crime/filter/", FilterConfig::default().multi_city());
    let (mut chain, _) = FilterChain::from_request(
        ctx,
        Some("streets=springfield,elm-st,200-299n,8-blocks"),
        registry(),
    )?;
    let result = chain.apply(MemoryQuery::new(fixtures::items()))?;
    assert_eq!(result.ids(), vec![4]);
    assert_eq!(
        chain.get("location").and_then(Filter::url),
        Some("streets=springfield,elm-st,200-299n,8-blocks")
    );
    Ok(())
}

#[test]
fn test_unknown_block_fails_at_apply() -> Result<()> {
    let (mut chain, _) = parse("streets=main-st,900-999,1-block")?;
    let err = chain
        .apply(MemoryQuery::new(fixtures::items()))
        .err()
        .ok_or_else(|| anyhow!("expected an unknown block error"))?;
    assert!(err.message().starts_with("No such block"));
    Ok(())
}

#[test]
fn test_missing_radius_redirect_uses_cookie() -> Result<()> {
    let path = "/crime/filter/streets=main-st,100-199;by-arrested=no/";
    let ctx = Arc::new(
        FilterContext::new(Arc::new(fixtures::catalog()))
            .with_schema(fixtures::schema())
            .with_request(RequestInfo::new(path).with_cookie_radius(BlockRadius::new(3)?)),
    );
    let err = FilterChain::from_request(ctx, Some("streets=main-st,100-199;by-arrested=no"), registry())
        .err()
        .ok_or_else(|| anyhow!("expected a redirect"))?;
    assert_eq!(
        err.redirect_url(),
        Some("/crime/filter/streets=main-st,100-199,3-blocks;by-arrested=no/")
    );
    Ok(())
}

#[test]
fn test_added_block_redirect_parses_back() -> Result<()> {
    let cases = [
        ("/crime/filter/", "/crime/filter/streets=main-st,100-199,8-blocks/"),
        (
            "/crime/filter/by-date=2020-01-01,2020-01-31/",
            "/crime/filter/by-date=2020-01-01,2020-01-31;streets=main-st,100-199,8-blocks/",
        ),
    ];
    for (path, expected) in cases {
        let mut chain = FilterChain::new(context(path, FilterConfig::default()));
        let err = chain
            .add("location", vec![fixtures::blocks().remove(0).into()])
            .err()
            .ok_or_else(|| anyhow!("expected a redirect from {path}"))?;
        let redirect = err
            .redirect_url()
            .ok_or_else(|| anyhow!("no redirect url from {path}"))?;
        assert_eq!(redirect, expected);

        let argstring = redirect
            .strip_prefix("/crime/filter/")
            .ok_or_else(|| anyhow!("redirect left the filter page: {redirect}"))?;
        let ctx = context(redirect, FilterConfig::default());
        let (mut followed, _) = FilterChain::from_request(ctx, Some(argstring), registry())?;
        assert_eq!(
            followed.get("location").and_then(Filter::url),
            Some("streets=main-st,100-199,8-blocks")
        );
        followed.apply(MemoryQuery::new(fixtures::items()))?;
    }
    Ok(())
}

// ============================================================================
// Choosers
// ============================================================================

#[test]
fn test_location_chooser_round_trip() -> Result<()> {
    let (chain, _) = parse("locations=neighborhoods")?;
    let more = chain
        .validate()?
        .ok_or_else(|| anyhow!("expected a chooser"))?;
    assert_eq!(more.lookup_type_slug, "neighborhoods");

    // Picking the first offered location makes the chain complete.
    let pick = &more.lookup_list[0];
    let (mut picked, _) = parse(&format!("locations=neighborhoods,{}", pick.slug))?;
    assert_eq!(picked.validate()?, None);
    let result = picked.apply(MemoryQuery::new(fixtures::items()))?;
    assert_eq!(result.ids(), vec![3, 4, 5]);
    Ok(())
}

#[test]
fn test_lookup_chooser_serializes() -> Result<()> {
    let (chain, _) = parse("by-crime-type=")?;
    let more = chain
        .validate()?
        .ok_or_else(|| anyhow!("expected a chooser"))?;
    let json = serde_json::to_value(&more)?;
    assert_eq!(json["lookup_list"][0]["slug"], "arson");
    assert_eq!(json["lookup_type"], "crime type");
    Ok(())
}

// ============================================================================
// Breadcrumbs
// ============================================================================

#[test]
fn test_breadcrumbs_from_parsed_chain() -> Result<()> {
    let (mut chain, _) = parse("by-crime-type=theft;locations=neighborhoods,riverside")?;
    chain.apply(MemoryQuery::new(fixtures::items()))?;

    let crumbs = chain.make_breadcrumbs(CrumbEdits::new())?;
    let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Crime Reports", "Theft", "Riverside"]);
    assert_eq!(
        crumbs[2].url,
        "/crime/filter/by-crime-type=theft;locations=neighborhoods,riverside/"
    );

    let month = NaiveDate::from_ymd_opt(2020, 1, 9).ok_or_else(|| anyhow!("bad date"))?;
    let url = chain.make_url(
        CrumbEdits::new()
            .remove("crime-type")
            .add("date", vec![month.into(), "month".into()]),
    )?;
    assert_eq!(
        url,
        "/crime/filter/locations=neighborhoods,riverside;by-date=2020-01-01,2020-01-31/"
    );
    assert!(chain.contains_key("crime-type"));
    Ok(())
}

#[test]
fn test_place_id_replaces_parsed_location() -> Result<()> {
    let (mut chain, _) = parse("locations=neighborhoods,downtown")?;
    chain.add_by_place_id("b:50.8")?;
    let urls = chain.make_urls(CrumbEdits::new())?;
    assert_eq!(
        urls.last().map(String::as_str),
        Some("/crime/filter/streets=main-st,100-199,8-blocks/")
    );
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_json_drives_block_urls() -> Result<()> {
    let config: FilterConfig =
        serde_json::from_str(r#"{"multiple_cities": true, "default_block_radius": 1}"#)?;
    let ctx = context("/crime/filter/streets=springfield,elm-st,200-299n/", config);
    let err = FilterChain::from_request(ctx, Some("streets=springfield,elm-st,200-299n"), registry())
        .err()
        .ok_or_else(|| anyhow!("expected a redirect"))?;
    assert_eq!(
        err.redirect_url(),
        Some("/crime/filter/streets=springfield,elm-st,200-299n,1-block/")
    );
    Ok(())
}
