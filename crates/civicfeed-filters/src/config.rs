//! Deployment configuration for filter parsing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::radius::BlockRadius;

// ============================================================================
// Configuration
// ============================================================================

/// Filter configuration loaded from environment or a config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Street URLs carry a leading city slug (`streets=<city>,<street>,...`).
    pub multiple_cities: bool,
    /// Radius suggested when a block filter arrives without one.
    pub default_block_radius: BlockRadius,
    /// Length of one block in map units, used to size search buffers.
    pub block_length: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            multiple_cities: false,
            default_block_radius: BlockRadius::DEFAULT,
            block_length: 0.0018,
        }
    }
}

impl FilterConfig {
    /// Defaults overridden by `CIVICFEED_MULTIPLE_CITIES`,
    /// `CIVICFEED_DEFAULT_BLOCK_RADIUS` and `CIVICFEED_BLOCK_LENGTH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            multiple_cities: env_or("CIVICFEED_MULTIPLE_CITIES", defaults.multiple_cities),
            default_block_radius: env_or(
                "CIVICFEED_DEFAULT_BLOCK_RADIUS",
                defaults.default_block_radius,
            ),
            block_length: env_or("CIVICFEED_BLOCK_LENGTH", defaults.block_length),
        }
    }

    pub fn multi_city(mut self) -> Self {
        self.multiple_cities = true;
        self
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    let Ok(raw) = std::env::var(name) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparseable config value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: FilterConfig = serde_json::from_str(r#"{"multiple_cities": true}"#).unwrap();
        assert!(config.multiple_cities);
        assert_eq!(config.default_block_radius, BlockRadius::DEFAULT);
        assert!((config.block_length - 0.0018).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_radius_is_rejected_in_json() {
        let parsed = serde_json::from_str::<FilterConfig>(r#"{"default_block_radius": 4}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_env_or_keeps_default_for_unset_vars() {
        assert_eq!(env_or("CIVICFEED_TEST_UNSET_VARIABLE", 7u8), 7);
    }
}
