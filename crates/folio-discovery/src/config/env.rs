// crates/folio-discovery/src/config/env.rs
// Environment overrides - FOLIO_* variables win over file values

use super::FolioConfig;
use std::str::FromStr;
use tracing::{debug, warn};

impl FolioConfig {
    /// Apply FOLIO_* overrides. `lookup` abstracts the environment so tests
    /// can supply values without mutating process state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&lookup, "FOLIO_URL_DEBOUNCE_MS") {
            self.filter.url_debounce_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "FOLIO_MAX_RESULTS") {
            self.search.max_results = v;
        }
        if let Some(v) = parse_env(&lookup, "FOLIO_LOAD_ATTEMPTS") {
            self.search.load_attempts = v;
        }
        if let Some(v) = parse_env(&lookup, "FOLIO_RETRY_DELAY_MS") {
            self.search.retry_delay_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "FOLIO_ATTEMPT_TIMEOUT_MS") {
            self.search.attempt_timeout_ms = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "FOLIO_QUERY_DEBOUNCE_MS") {
            self.search.query_debounce_ms = v;
        }
    }
}

/// Read and parse a single variable, filtering empty values
fn parse_env<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name).filter(|v| !v.trim().is_empty())?;
    match raw.trim().parse() {
        Ok(value) => {
            debug!(var = name, "Config override from environment");
            Some(value)
        }
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
