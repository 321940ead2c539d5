// crates/folio-discovery/src/search/client.rs
// Search client service: load-once index handle, bounded materialization, stats

use super::index::{IndexHandle, IndexLoader, ResultRef};
use super::loader::RetryingLoader;
use super::stats::StatsCounter;
use crate::analytics::Analytics;
use crate::config::SearchConfig;
use crate::error::Result;
use folio_types::{DiscoveryEvent, SearchResult, SearchStats};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Process-wide client slot, filled by the first `install`
static SHARED: OnceLock<Arc<SearchClient>> = OnceLock::new();

/// Per-call overrides of the configured search behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: Option<usize>,
    /// Request the index's debounced query primitive with this interval
    pub debounce: Option<Duration>,
}

impl SearchOptions {
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = Some(interval);
        self
    }
}

pub struct SearchClient {
    loader: RetryingLoader,
    config: SearchConfig,
    /// Swapped wholesale on reset; a failed load leaves the cell empty
    index: RwLock<Arc<OnceCell<Arc<dyn IndexHandle>>>>,
    stats: StatsCounter,
    analytics: Analytics,
}

impl SearchClient {
    pub fn new(loader: Arc<dyn IndexLoader>, config: SearchConfig) -> Self {
        Self {
            loader: RetryingLoader::from_config(loader, &config),
            config,
            index: RwLock::new(Arc::new(OnceCell::new())),
            stats: StatsCounter::new(),
            analytics: Analytics::default(),
        }
    }

    pub fn with_analytics(mut self, analytics: Analytics) -> Self {
        self.analytics = analytics;
        self
    }

    /// Install the process-wide client. The first install wins; later calls
    /// return the existing instance.
    pub fn install(loader: Arc<dyn IndexLoader>, config: SearchConfig) -> Arc<SearchClient> {
        let mut created = false;
        let client = SHARED.get_or_init(|| {
            created = true;
            Arc::new(SearchClient::new(loader, config))
        });
        if !created {
            debug!("Search client already installed, reusing it");
        }
        client.clone()
    }

    pub fn shared() -> Option<Arc<SearchClient>> {
        SHARED.get().cloned()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn index_cell(&self) -> Arc<OnceCell<Arc<dyn IndexHandle>>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.index_cell().initialized()
    }

    /// Load the index now instead of on the first query
    pub async fn preload(&self) -> Result<()> {
        self.ensure_index().await.map(|_| ())
    }

    /// Concurrent first callers share one load; on exhaustion the cell stays
    /// empty so the next call starts over.
    async fn ensure_index(&self) -> Result<Arc<dyn IndexHandle>> {
        let cell = self.index_cell();
        let index = cell
            .get_or_try_init(|| async {
                debug!("Loading search index");
                let index = self.loader.load().await?;
                info!("Search index loaded");
                Ok::<_, crate::error::DiscoveryError>(index)
            })
            .await?;
        Ok(index.clone())
    }

    /// Run `query` and materialize up to `max_results` hits.
    ///
    /// Blank queries return nothing without touching the index. A failing
    /// query primitive degrades to an empty result; only index load
    /// exhaustion is returned as an error.
    pub async fn perform_search(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let index = match self.ensure_index().await {
            Ok(index) => index,
            Err(e) => {
                self.record_failure(query, &e.to_string());
                return Err(e);
            }
        };

        let max_results = options.max_results.unwrap_or(self.config.max_results);
        let debounce = options.debounce.or(self.config.index_debounce());

        let refs = match query_index(index.as_ref(), query, debounce).await {
            Ok(Some(refs)) => refs,
            Ok(None) => {
                debug!(query, "Search superseded by a newer query");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(query, error = %e, "Search query failed");
                self.record_failure(query, &e.to_string());
                return Ok(Vec::new());
            }
        };

        let results = materialize(refs, max_results).await;
        self.stats.record_search(results.len());
        self.analytics.track(DiscoveryEvent::SearchPerformed {
            query: query.to_string(),
            result_count: results.len(),
        });
        debug!(query, results = results.len(), "Search completed");

        Ok(results)
    }

    fn record_failure(&self, query: &str, reason: &str) {
        self.stats.record_failure();
        self.analytics.track(DiscoveryEvent::SearchFailed {
            query: query.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn stats(&self) -> SearchStats {
        self.stats.snapshot()
    }

    /// Drop the cached index and zero the counters
    pub fn reset(&self) {
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(OnceCell::new());
        self.stats.reset();
        debug!("Search client reset");
    }
}

async fn query_index(
    index: &dyn IndexHandle,
    query: &str,
    debounce: Option<Duration>,
) -> Result<Option<Vec<Arc<dyn ResultRef>>>> {
    match debounce {
        Some(interval) if index.supports_debounce() => index.debounced_search(query, interval).await,
        _ => index.search(query).await.map(Some),
    }
}

/// Materialize the first `max_results` refs concurrently. Failed refs are
/// dropped; the rest keep index order.
async fn materialize(refs: Vec<Arc<dyn ResultRef>>, max_results: usize) -> Vec<SearchResult> {
    let refs: Vec<Arc<dyn ResultRef>> = refs.into_iter().take(max_results).collect();

    let outcomes =
        futures::future::join_all(refs.iter().map(|r| async move { (r, r.data().await) })).await;

    let mut dropped = 0usize;
    let results: Vec<SearchResult> = outcomes
        .into_iter()
        .filter_map(|(r, outcome)| match outcome {
            Ok(payload) => Some(SearchResult::from_payload(r.id(), r.score(), payload)),
            Err(e) => {
                warn!(id = r.id(), error = %e, "Dropping result that failed to materialize");
                dropped += 1;
                None
            }
        })
        .collect();

    if dropped > 0 {
        info!(dropped, kept = results.len(), "Returning partial search results");
    }
    results
}
