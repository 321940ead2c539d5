// crates/folio-discovery/src/search/index.rs
// Capabilities the search client consumes from an external index

use crate::error::Result;
use async_trait::async_trait;
use folio_types::ResultPayload;
use std::sync::Arc;
use std::time::Duration;

/// Lightweight hit returned by a query; the payload is fetched separately
#[async_trait]
pub trait ResultRef: Send + Sync {
    fn id(&self) -> &str;

    fn score(&self) -> Option<f32> {
        None
    }

    /// Materialize the full payload (excerpt, metadata, word count)
    async fn data(&self) -> Result<ResultPayload>;
}

/// A loaded, queryable index. Never mutated after load.
#[async_trait]
pub trait IndexHandle: Send + Sync {
    /// Ranked hits for `query`, best first
    async fn search(&self, query: &str) -> Result<Vec<Arc<dyn ResultRef>>>;

    /// Whether `debounced_search` is a real primitive rather than the fallback
    fn supports_debounce(&self) -> bool {
        false
    }

    /// Debounce-aware query. `Ok(None)` means a newer call superseded this one.
    async fn debounced_search(
        &self,
        query: &str,
        _debounce: Duration,
    ) -> Result<Option<Vec<Arc<dyn ResultRef>>>> {
        self.search(query).await.map(Some)
    }
}

/// Acquires the index. One call is one attempt; retry policy lives in
/// `RetryingLoader`.
#[async_trait]
pub trait IndexLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn IndexHandle>>;
}
