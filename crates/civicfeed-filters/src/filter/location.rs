//! Geographic filters: named locations and street blocks.

use civicfeed_core::{Block, BlockKey, Location, LocationType, NewsItemQuery, SearchArea};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::{Choice, FilterDisplay, MoreInput};
use crate::context::FilterContext;
use crate::error::{FilterError, Result};
use crate::radius::{radius_url, BlockRadius};
use crate::text::title_case;

// ============================================================================
// Location
// ============================================================================

/// Items related to one named location. A slug given without a resolved
/// [`Location`] is looked up when the filter is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFilter {
    location_type_slug: String,
    location_slug: Option<String>,
    location: Option<Location>,
    pub(crate) display: FilterDisplay,
}

fn location_display() -> FilterDisplay {
    FilterDisplay {
        name: Some("location".to_string()),
        argname: Some("locations".to_string()),
        ..FilterDisplay::default()
    }
}

impl LocationFilter {
    /// An already resolved location.
    pub fn from_location(location: Location) -> Self {
        let mut filter = Self {
            location_type_slug: location.location_type.slug.clone(),
            location_slug: Some(location.slug.clone()),
            location: None,
            display: location_display(),
        };
        filter.bind(location);
        filter
    }

    pub fn from_type(location_type: &LocationType, location_slug: Option<String>) -> Self {
        Self::unresolved(location_type.slug.clone(), location_slug)
    }

    /// URL values: `<type slug>[,<location slug>]`.
    pub fn from_args(args: &[String]) -> Result<Self> {
        match args {
            [] => Err(FilterError::new("not enough args")),
            [type_slug] => Ok(Self::unresolved(type_slug.clone(), None)),
            [type_slug, slug, ..] => Ok(Self::unresolved(type_slug.clone(), Some(slug.clone()))),
        }
    }

    fn unresolved(location_type_slug: String, location_slug: Option<String>) -> Self {
        let mut display = location_display();
        match &location_slug {
            Some(slug) => {
                display.url = Some(format!("locations={location_type_slug},{slug}"));
                display.value = Some(slug.clone());
            }
            None => {
                display.url = Some(format!("locations={location_type_slug}"));
                display.value = Some(format!("Choose {}", title_case(&location_type_slug)));
            }
        }
        Self {
            location_type_slug,
            location_slug,
            location: None,
            display,
        }
    }

    fn bind(&mut self, location: Location) {
        self.location_type_slug = location.location_type.slug.clone();
        self.location_slug = Some(location.slug.clone());
        self.display.label = Some(location.location_type.name.clone());
        self.display.value = Some(location.name.clone());
        self.display.short_value = Some(location.name.clone());
        self.display.url = Some(format!(
            "locations={},{}",
            location.location_type.slug, location.slug
        ));
        self.location = Some(location);
    }

    pub fn location_type_slug(&self) -> &str {
        &self.location_type_slug
    }

    pub fn location_slug(&self) -> Option<&str> {
        self.location_slug.as_deref()
    }

    /// The resolved location, once known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub(crate) fn is_concrete(&self) -> bool {
        self.location_slug.is_some()
    }

    /// Public locations of the type, in display order. Having none to offer
    /// is an error.
    pub(crate) fn validate(&self, ctx: &FilterContext) -> Result<Option<MoreInput>> {
        if self.is_concrete() {
            return Ok(None);
        }
        let mut locations: Vec<Location> = ctx
            .catalog()
            .locations_of_type(&self.location_type_slug)
            .into_iter()
            .filter(|l| l.is_public)
            .collect();
        locations.sort_by_key(|l| l.display_order);
        let Some(first) = locations.first() else {
            return Err(FilterError::new("empty lookup list"));
        };
        Ok(Some(MoreInput {
            filter_argname: self.display.argname.clone().unwrap_or_default(),
            lookup_type: first.location_type.name.clone(),
            lookup_type_slug: self.location_type_slug.clone(),
            lookup_list: locations
                .iter()
                .map(|l| Choice::new(l.slug.clone(), l.name.clone()))
                .collect(),
        }))
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&mut self, query: Q, ctx: &FilterContext) -> Result<Q> {
        let location = match &self.location {
            Some(location) => location.clone(),
            None => {
                let slug = self
                    .location_slug
                    .as_deref()
                    .ok_or_else(|| FilterError::new("no location given"))?;
                ctx.catalog()
                    .location(&self.location_type_slug, slug)
                    .ok_or_else(|| {
                        FilterError::new(format!(
                            "No such location '{}/{slug}'",
                            self.location_type_slug
                        ))
                    })?
            }
        };
        let query = query.by_location(&location);
        self.bind(location);
        Ok(query)
    }
}

// ============================================================================
// Block
// ============================================================================

/// Address numbers and direction parsed from a block URL bit like `100-199n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    pub from_num: u32,
    pub to_num: u32,
    pub dir: String,
}

impl BlockRange {
    pub fn parse(range: &str) -> Result<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^(\d{1,6})-(\d{1,6})([nsew]?)$").expect("block range pattern is valid")
        });
        let invalid = || FilterError::new(format!("Invalid block URL: '{range}'"));
        let caps = pattern.captures(range).ok_or_else(invalid)?;
        let from_num = caps[1].parse().map_err(|_| invalid())?;
        let to_num = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self {
            from_num,
            to_num,
            dir: caps[3].to_string(),
        })
    }
}

impl From<&Block> for BlockRange {
    fn from(block: &Block) -> Self {
        Self {
            from_num: block.from_num,
            to_num: block.to_num,
            dir: block.dir_url_bit(),
        }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}{}", self.from_num, self.to_num, self.dir)
    }
}

/// Items within a radius of one street block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFilter {
    city_slug: String,
    street_slug: String,
    range: BlockRange,
    radius: BlockRadius,
    block: Option<Block>,
    pub(crate) display: FilterDisplay,
}

/// Radius from the next URL value, else the page's radius. With neither, the
/// error redirects to the same page with a concrete radius filled in;
/// `streets` builds the clause when the page has none.
fn take_radius(ctx: &FilterContext, arg: Option<&String>, streets: &str) -> Result<BlockRadius> {
    if let Some(fragment) = arg {
        return BlockRadius::from_url_fragment(fragment);
    }
    if let Some(radius) = ctx.block_radius() {
        return Ok(radius);
    }
    let suggested = ctx.preferred_radius();
    match radius_url(&ctx.request().path, suggested, Some(streets)) {
        Some(url) => {
            tracing::debug!(redirect = %url, "block filter without radius");
            Err(FilterError::with_redirect("missing radius", url))
        }
        None => Err(FilterError::new("missing radius")),
    }
}

/// Streets clause values up to the radius: `[<city>,]<street>,<range>`.
fn streets_values(ctx: &FilterContext, city_slug: &str, street_slug: &str, range: &BlockRange) -> String {
    if ctx.config().multiple_cities {
        format!("{city_slug},{street_slug},{range}")
    } else {
        format!("{street_slug},{range}")
    }
}

impl BlockFilter {
    /// URL values: `[<city>,]<street>,<range>[,<radius>]`; the city is only
    /// expected when the deployment has multiple cities.
    pub fn from_args(ctx: &FilterContext, args: &[String]) -> Result<Self> {
        let mut args = args.iter();
        let not_enough = || FilterError::new("not enough args");
        let city_slug = if ctx.config().multiple_cities {
            args.next().ok_or_else(not_enough)?.clone()
        } else {
            String::new()
        };
        let street_slug = args.next().ok_or_else(not_enough)?.clone();
        let range = BlockRange::parse(args.next().ok_or_else(not_enough)?)?;
        let streets = streets_values(ctx, &city_slug, &street_slug, &range);
        let radius = take_radius(ctx, args.next(), &streets)?;

        let mut filter = Self {
            city_slug,
            street_slug,
            range,
            radius,
            block: None,
            display: FilterDisplay {
                name: Some("location".to_string()),
                argname: Some("streets".to_string()),
                label: Some("Area".to_string()),
                ..FilterDisplay::default()
            },
        };
        filter.display.url = Some(filter.url_fragment(ctx));
        Ok(filter)
    }

    /// An already resolved block; `args` may carry a radius fragment.
    pub fn from_block(ctx: &FilterContext, block: Block, args: &[String]) -> Result<Self> {
        let streets = streets_values(ctx, &block.city, &block.street_slug, &BlockRange::from(&block));
        let radius = take_radius(ctx, args.first(), &streets)?;
        Ok(Self::resolved(ctx, block, radius))
    }

    pub fn with_radius(ctx: &FilterContext, block: Block, radius: BlockRadius) -> Self {
        Self::resolved(ctx, block, radius)
    }

    fn resolved(ctx: &FilterContext, block: Block, radius: BlockRadius) -> Self {
        let mut filter = Self {
            city_slug: block.city.clone(),
            street_slug: block.street_slug.clone(),
            range: BlockRange::from(&block),
            radius,
            block: None,
            display: FilterDisplay {
                name: Some("location".to_string()),
                argname: Some("streets".to_string()),
                ..FilterDisplay::default()
            },
        };
        filter.bind(ctx, block);
        filter
    }

    fn url_fragment(&self, ctx: &FilterContext) -> String {
        format!(
            "streets={},{}",
            streets_values(ctx, &self.city_slug, &self.street_slug, &self.range),
            self.radius.url_fragment()
        )
    }

    fn bind(&mut self, ctx: &FilterContext, block: Block) {
        self.city_slug = block.city.clone();
        self.street_slug = block.street_slug.clone();
        let value = format!("{} around {}", self.radius.describe(), block.pretty_name);
        self.display.label = Some("Area".to_string());
        self.display.value = Some(value.clone());
        self.display.short_value = Some(value);
        self.display.url = Some(self.url_fragment(ctx));
        self.block = Some(block);
    }

    pub fn city_slug(&self) -> &str {
        &self.city_slug
    }

    pub fn street_slug(&self) -> &str {
        &self.street_slug
    }

    pub fn range(&self) -> &BlockRange {
        &self.range
    }

    pub fn radius(&self) -> BlockRadius {
        self.radius
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    fn key(&self) -> BlockKey {
        BlockKey {
            city: self.city_slug.clone(),
            street_slug: self.street_slug.clone(),
            from_num: self.range.from_num,
            to_num: self.range.to_num,
            dir: self.range.dir.clone(),
        }
    }

    pub(crate) fn apply<Q: NewsItemQuery>(&mut self, query: Q, ctx: &FilterContext) -> Result<Q> {
        let block = match &self.block {
            Some(block) => block.clone(),
            None => ctx.catalog().block(&self.key()).ok_or_else(|| {
                FilterError::new(format!("No such block '{},{}'", self.street_slug, self.range))
            })?,
        };
        let distance = f64::from(self.radius.blocks()) * ctx.config().block_length;
        let area = SearchArea::around(block.centroid, distance);
        let query = query.overlapping(&area);
        self.bind(ctx, block);
        Ok(query)
    }
}
