// crates/folio-discovery/src/search/mod.rs
// Full-text search client over a lazily loaded, externally built index

mod client;
mod format;
mod highlight;
pub mod index;
pub mod json_index;
mod live;
mod loader;
mod stats;

pub use client::{SearchClient, SearchOptions};
pub use format::{SEARCH_QUERY_PARAM, format_result_count, query_from_url, search_url};
pub use highlight::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, highlight};
pub use index::{IndexHandle, IndexLoader, ResultRef};
pub use json_index::{IndexDocument, JsonIndex, JsonIndexLoader};
pub use live::{LiveSearch, SearchView};
pub use loader::RetryingLoader;
pub use stats::StatsCounter;
