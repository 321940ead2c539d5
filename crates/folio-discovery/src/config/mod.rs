// crates/folio-discovery/src/config/mod.rs
// Configuration and shared defaults

pub mod env;
pub mod file;
pub mod validate;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use validate::{ConfigIssue, ConfigValidation, Severity};

/// Default quiet period before the filter URL is rewritten
pub const DEFAULT_URL_DEBOUNCE_MS: u64 = 500;
/// Default cap on materialized search results
pub const DEFAULT_MAX_RESULTS: usize = 10;
/// Default number of index load attempts before giving up
pub const DEFAULT_LOAD_ATTEMPTS: u32 = 3;
/// Default fixed delay between index load attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
/// Default keystroke debounce for search-as-you-type
pub const DEFAULT_QUERY_DEBOUNCE_MS: u64 = 300;

/// Top-level config structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FolioConfig {
    pub filter: FilterConfig,
    pub search: SearchConfig,
}

/// Filter engine section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub url_debounce_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            url_debounce_ms: DEFAULT_URL_DEBOUNCE_MS,
        }
    }
}

impl FilterConfig {
    pub fn url_debounce(&self) -> Duration {
        Duration::from_millis(self.url_debounce_ms)
    }
}

/// Search client section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub load_attempts: u32,
    pub retry_delay_ms: u64,
    /// Per-attempt load timeout. Unset means an attempt may wait indefinitely.
    pub attempt_timeout_ms: Option<u64>,
    pub query_debounce_ms: u64,
    /// Debounce passed to the index's own debounced query primitive, when it has one
    pub index_debounce_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            load_attempts: DEFAULT_LOAD_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            attempt_timeout_ms: None,
            query_debounce_ms: DEFAULT_QUERY_DEBOUNCE_MS,
            index_debounce_ms: None,
        }
    }
}

impl SearchConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_ms.map(Duration::from_millis)
    }

    pub fn query_debounce(&self) -> Duration {
        Duration::from_millis(self.query_debounce_ms)
    }

    pub fn index_debounce(&self) -> Option<Duration> {
        self.index_debounce_ms.map(Duration::from_millis)
    }
}
