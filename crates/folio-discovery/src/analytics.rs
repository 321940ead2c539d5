// crates/folio-discovery/src/analytics.rs
// Fire-and-forget analytics seam for discovery events

use crate::error::Result;
use folio_types::DiscoveryEvent;
use std::sync::Arc;
use tracing::{debug, info};

/// External collector of discovery events
pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: &DiscoveryEvent) -> Result<()>;
}

/// Default sink: structured log line per event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn emit(&self, event: &DiscoveryEvent) -> Result<()> {
        info!(event = event.name(), detail = ?event, "analytics");
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn emit(&self, _event: &DiscoveryEvent) -> Result<()> {
        Ok(())
    }
}

/// Shared handle around a sink. Sink failures are logged and swallowed so
/// they never reach filtering or search state.
#[derive(Clone)]
pub struct Analytics {
    sink: Arc<dyn AnalyticsSink>,
}

impl Analytics {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    pub fn noop() -> Self {
        Self::new(Arc::new(NoopAnalytics))
    }

    pub fn track(&self, event: DiscoveryEvent) {
        if let Err(e) = self.sink.emit(&event) {
            debug!(event = event.name(), error = %e, "Analytics sink rejected event");
        }
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(Arc::new(TracingAnalytics))
    }
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics").finish_non_exhaustive()
    }
}
