//! Request-scoped state shared by a chain and its filters.

use std::fmt;
use std::sync::Arc;

use civicfeed_core::{Catalog, Schema};

use crate::config::FilterConfig;
use crate::radius::BlockRadius;

/// The parts of the incoming request filters care about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// Path of the filter page, used to build redirect URLs.
    pub path: String,
    /// Radius remembered in the visitor's cookie, if any.
    pub cookie_radius: Option<BlockRadius>,
}

impl RequestInfo {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cookie_radius: None,
        }
    }

    pub fn with_cookie_radius(mut self, radius: BlockRadius) -> Self {
        self.cookie_radius = Some(radius);
        self
    }
}

/// Read-only context for building and applying filters.
#[derive(Clone)]
pub struct FilterContext {
    catalog: Arc<dyn Catalog>,
    config: FilterConfig,
    request: RequestInfo,
    schema: Option<Schema>,
    block_radius: Option<BlockRadius>,
}

impl FilterContext {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            config: FilterConfig::default(),
            request: RequestInfo::default(),
            schema: None,
            block_radius: None,
        }
    }

    pub fn with_config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = request;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Radius already chosen for this page, used when a block URL omits one.
    pub fn with_block_radius(mut self, radius: BlockRadius) -> Self {
        self.block_radius = Some(radius);
        self
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn block_radius(&self) -> Option<BlockRadius> {
        self.block_radius
    }

    /// Radius to suggest when none was given: the cookie's, else the default.
    pub fn preferred_radius(&self) -> BlockRadius {
        self.request
            .cookie_radius
            .unwrap_or(self.config.default_block_radius)
    }
}

impl fmt::Debug for FilterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("config", &self.config)
            .field("request", &self.request)
            .field("schema", &self.schema.as_ref().map(|s| &s.slug))
            .field("block_radius", &self.block_radius)
            .finish_non_exhaustive()
    }
}
