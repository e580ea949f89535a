//! Client Configuration
//!
//! Build-time settings handed to the API client, reducer, and logger.

use serde::{Deserialize, Serialize};

use crate::reducer::ReducerOptions;

/// Same-origin when empty
const DEFAULT_API_BASE: &str = "";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Prefix for every `/api/...` path, e.g. `https://garden.example.com`
    pub api_base: String,
    /// Verbose logging and reporting of rejected actions
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            debug: cfg!(debug_assertions),
        }
    }
}

impl AppConfig {
    /// Read `GARDEN_API_BASE` and `GARDEN_DEBUG` as set when the bundle was built.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("GARDEN_API_BASE"), option_env!("GARDEN_DEBUG"))
    }

    fn from_values(api_base: Option<&str>, debug: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            api_base: api_base
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            debug: debug.map(parse_flag).unwrap_or(defaults.debug),
        }
    }

    pub fn reducer_options(&self) -> ReducerOptions {
        ReducerOptions { debug: self.debug }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
