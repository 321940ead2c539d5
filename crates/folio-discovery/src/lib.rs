// crates/folio-discovery/src/lib.rs
// Folio - client-side content discovery: tag filtering and full-text search

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod analytics;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod platform;
pub mod search;
pub mod utils;

pub use error::{DiscoveryError, Result};
pub use folio_types::{DiscoveryEvent, ResultPayload, SearchResult, SearchStats};
