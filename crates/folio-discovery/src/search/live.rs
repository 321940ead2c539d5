// crates/folio-discovery/src/search/live.rs
// Search-as-you-type: debounced input wired to a search client and a view

use super::client::{SearchClient, SearchOptions};
use crate::debounce::Debouncer;
use folio_types::SearchResult;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Where live results are rendered
pub trait SearchView: Send + Sync {
    fn show_results(&self, query: &str, results: &[SearchResult]);
    /// The index could not be loaded after all attempts
    fn show_unavailable(&self);
    fn clear(&self);
}

/// Debounces keystrokes into searches. Only the trailing query of a burst
/// runs, and only the newest input's results are rendered; after `close`
/// nothing reaches the view.
///
/// A search that has started is never aborted by later input, so an index
/// load it began keeps going and later queries reuse it.
/// Input must be fed from within a Tokio runtime.
pub struct LiveSearch {
    client: Arc<SearchClient>,
    view: Arc<dyn SearchView>,
    options: SearchOptions,
    debouncer: Debouncer,
    /// Bumped on every input; a search renders only if it is still current
    generation: Arc<AtomicU64>,
    cancel: CancellationToken,
}

impl LiveSearch {
    pub fn new(client: Arc<SearchClient>, view: Arc<dyn SearchView>) -> Self {
        let debouncer = Debouncer::new(client.config().query_debounce());
        Self {
            client,
            view,
            options: SearchOptions::default(),
            debouncer,
            generation: Arc::new(AtomicU64::new(0)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Feed the current input value. A blank value clears the view at once.
    pub fn input(&self, query: &str) {
        if self.cancel.is_cancelled() {
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim().to_string();
        if query.is_empty() {
            self.debouncer.cancel();
            self.view.clear();
            return;
        }

        let client = self.client.clone();
        let view = self.view.clone();
        let options = self.options;
        let token = self.cancel.clone();
        let current = self.generation.clone();

        self.debouncer.schedule_async(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = client.perform_search(&query, options) => outcome,
            };
            if token.is_cancelled() || current.load(Ordering::SeqCst) != generation {
                debug!(query = %query, "Dropping stale live search results");
                return;
            }

            match outcome {
                Ok(results) => view.show_results(&query, &results),
                Err(e) if e.is_unavailable() => view.show_unavailable(),
                Err(e) => warn!(query = %query, error = %e, "Live search failed"),
            }
        });
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop reacting to input. Idempotent.
    pub fn close(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.debouncer.cancel();
        debug!("Live search closed");
    }
}

impl Drop for LiveSearch {
    fn drop(&mut self) {
        self.close();
    }
}
