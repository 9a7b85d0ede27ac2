//! Block radii, their URL fragments, and place ids.
//!
//! A radius is a small number of blocks (`1`, `3` or `8`) written in URLs as
//! `1-block` / `8-blocks`. A place id names either a block with a radius
//! (`b:<block id>.<radius>`) or a location (`l:<location id>`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, Result};

pub const BLOCK_RADIUS_CHOICES: [u8; 3] = [1, 3, 8];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct BlockRadius(u8);

impl BlockRadius {
    pub const DEFAULT: Self = Self(8);

    pub fn new(blocks: u8) -> Result<Self> {
        if BLOCK_RADIUS_CHOICES.contains(&blocks) {
            Ok(Self(blocks))
        } else {
            Err(FilterError::new(format!("bad radius '{blocks}'")))
        }
    }

    pub const fn blocks(self) -> u8 {
        self.0
    }

    /// `1-block`, `3-blocks`, `8-blocks`.
    pub fn url_fragment(self) -> String {
        format!("{}-block{}", self.0, self.plural_suffix())
    }

    /// Parse a URL fragment; only the number before the first `-` matters.
    pub fn from_url_fragment(fragment: &str) -> Result<Self> {
        let bad = || FilterError::new(format!("bad radius '{fragment}'"));
        let number: u8 = fragment
            .split('-')
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| bad())?;
        Self::new(number).map_err(|_| bad())
    }

    /// `1 block`, `8 blocks`.
    pub fn describe(self) -> String {
        format!("{} block{}", self.0, self.plural_suffix())
    }

    const fn plural_suffix(self) -> &'static str {
        if self.0 == 1 {
            ""
        } else {
            "s"
        }
    }
}

impl Default for BlockRadius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for BlockRadius {
    type Error = FilterError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BlockRadius> for u8 {
    fn from(value: BlockRadius) -> Self {
        value.0
    }
}

impl FromStr for BlockRadius {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_url_fragment(s.trim())
    }
}

impl fmt::Display for BlockRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rewrite a filter page path so its `streets=` clause carries `radius`.
///
/// An existing radius fragment in that clause is replaced. A path without a
/// `streets=` clause gets a new one built from `streets` (the clause values
/// before the radius, e.g. `main-st,100-199`); without those there is no URL
/// to offer and `None` is returned.
pub fn radius_url(path: &str, radius: BlockRadius, streets: Option<&str>) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    let (prefix, segment) = match trimmed.rfind('/') {
        Some(idx) => trimmed.split_at(idx + 1),
        None => ("", trimmed),
    };
    let fragment = radius.url_fragment();

    // A last segment without `=` is the page itself, not a filter argstring.
    let (prefix, mut clauses) = if segment.contains('=') {
        let clauses: Vec<String> = segment
            .split(';')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        (prefix.to_string(), clauses)
    } else {
        (format!("{trimmed}/"), Vec::new())
    };

    match clauses.iter_mut().find(|c| c.starts_with("streets=")) {
        Some(clause) => {
            let mut values: Vec<&str> = clause.split(',').collect();
            let has_radius = values.len() > 1
                && values.last().is_some_and(|last| {
                    BlockRadius::from_url_fragment(last).is_ok() && last.contains("-block")
                });
            if has_radius {
                values.pop();
            }
            *clause = format!("{},{fragment}", values.join(","));
        }
        None => clauses.push(format!("streets={},{fragment}", streets?)),
    }
    Some(format!("{prefix}{}/", clauses.join(";")))
}

// ============================================================================
// Place ids
// ============================================================================

/// A compact reference to a block (with radius) or a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceId {
    Block { id: i64, radius: BlockRadius },
    Location { id: i64 },
}

impl PlaceId {
    pub fn parse(pid: &str) -> Result<Self> {
        let invalid = || FilterError::new(format!("invalid place id '{pid}'"));
        let (kind, rest) = pid.trim().split_once(':').ok_or_else(invalid)?;
        match kind {
            "b" => {
                let (id, radius) = rest.split_once('.').ok_or_else(invalid)?;
                let id = id.parse().map_err(|_| invalid())?;
                let radius = radius
                    .parse::<u8>()
                    .map_err(|_| invalid())
                    .and_then(|r| BlockRadius::new(r).map_err(|_| invalid()))?;
                Ok(Self::Block { id, radius })
            }
            "l" => {
                let id = rest.parse().map_err(|_| invalid())?;
                Ok(Self::Location { id })
            }
            _ => Err(invalid()),
        }
    }
}

impl FromStr for PlaceId {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block { id, radius } => write!(f, "b:{id}.{radius}"),
            Self::Location { id } => write!(f, "l:{id}"),
        }
    }
}
