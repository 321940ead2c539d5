// crates/folio-discovery/src/search/loader.rs
// Bounded retry around an index loader: fixed delay, no backoff

use super::index::{IndexHandle, IndexLoader};
use crate::config::SearchConfig;
use crate::error::{DiscoveryError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Decorates a loader with up to `attempts` tries, sleeping `delay` between
/// them. With no `attempt_timeout` a hung attempt waits as long as the
/// underlying fetch does.
pub struct RetryingLoader {
    inner: Arc<dyn IndexLoader>,
    attempts: u32,
    delay: Duration,
    attempt_timeout: Option<Duration>,
}

impl RetryingLoader {
    pub fn new(inner: Arc<dyn IndexLoader>, attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            delay,
            attempt_timeout: None,
        }
    }

    pub fn from_config(inner: Arc<dyn IndexLoader>, config: &SearchConfig) -> Self {
        Self::new(inner, config.load_attempts, config.retry_delay())
            .with_attempt_timeout(config.attempt_timeout())
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    async fn attempt(&self) -> Result<Arc<dyn IndexHandle>> {
        match self.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.inner.load()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(DiscoveryError::IndexLoad(format!(
                    "attempt timed out after {:?}",
                    limit
                ))),
            },
            None => self.inner.load().await,
        }
    }
}

#[async_trait]
impl IndexLoader for RetryingLoader {
    async fn load(&self) -> Result<Arc<dyn IndexHandle>> {
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            match self.attempt().await {
                Ok(handle) => {
                    if attempt > 1 {
                        info!(attempt, "Search index loaded after retry");
                    }
                    return Ok(handle);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.attempts {
                        warn!(
                            attempt,
                            attempts = self.attempts,
                            delay = ?self.delay,
                            error = %e,
                            "Search index load failed, retrying"
                        );
                        tokio::time::sleep(self.delay).await;
                    } else {
                        warn!(attempt, error = %e, "Search index load failed, giving up");
                    }
                }
            }
        }

        Err(DiscoveryError::IndexUnavailable {
            attempts: self.attempts,
            reason: last_error,
        })
    }
}
