// crates/folio-types/src/lib.rs
// Shared types for Folio content discovery (native + WASM compatible)
// No native-only dependencies allowed here

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════
// SEARCH RESULTS
// ═══════════════════════════════════════

/// Full payload of a search hit, produced by materializing a result reference
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultPayload {
    pub url: String,
    /// Excerpt with matched terms wrapped in `<mark>` tags
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Filter name -> values the page was indexed under (e.g. "tags" -> ["design"])
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
}

/// A ranked, displayable search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub url: String,
    pub excerpt: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Content length in words
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl SearchResult {
    /// Combine a result reference's identity with its materialized payload
    pub fn from_payload(id: impl Into<String>, score: Option<f32>, payload: ResultPayload) -> Self {
        Self {
            id: id.into(),
            url: payload.url,
            excerpt: payload.excerpt,
            meta: payload.meta,
            word_count: payload.word_count,
            filters: payload.filters,
            score,
        }
    }

    /// Title from page metadata, if the index recorded one
    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").map(String::as_str)
    }
}

/// Aggregate search statistics since process start (or the last reset)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchStats {
    pub searches: u64,
    pub total_results: u64,
    pub failed_searches: u64,
}

impl SearchStats {
    /// Mean number of results per completed search
    pub fn average_results(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.total_results as f64 / self.searches as f64
        }
    }
}

// ═══════════════════════════════════════
// ANALYTICS EVENTS
// ═══════════════════════════════════════

/// Outbound, fire-and-forget discovery events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscoveryEvent {
    TagToggled {
        section: String,
        tag: String,
        active: bool,
    },
    FiltersCleared {
        section: String,
    },
    SearchPerformed {
        query: String,
        result_count: usize,
    },
    SearchFailed {
        query: String,
        reason: String,
    },
}

impl DiscoveryEvent {
    /// Stable event name for analytics collectors
    pub fn name(&self) -> &'static str {
        match self {
            Self::TagToggled { .. } => "tag_toggled",
            Self::FiltersCleared { .. } => "filters_cleared",
            Self::SearchPerformed { .. } => "search_performed",
            Self::SearchFailed { .. } => "search_failed",
        }
    }
}
