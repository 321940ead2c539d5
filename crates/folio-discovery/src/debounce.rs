// crates/folio-discovery/src/debounce.rs
// Trailing-edge debouncer: one Tokio timer task per schedule, newest wins

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Scheduled {
    handle: JoinHandle<()>,
    disarm: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl Scheduled {
    fn is_waiting(&self) -> bool {
        !self.fired.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    /// Stop the task if it is still waiting out its delay. Returns whether it was.
    fn disarm(self) -> bool {
        let waiting = self.is_waiting();
        self.disarm.cancel();
        waiting
    }
}

/// Runs only the most recently scheduled task, once `delay` has passed
/// without a newer call. Must be used from within a Tokio runtime.
///
/// Rescheduling or cancelling only stops a task that is still waiting. Once
/// its delay has elapsed a task runs to completion; callers that must ignore
/// stale completions check a generation of their own.
///
/// Dropping the debouncer cancels whatever is still waiting.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Scheduled>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a synchronous task, replacing any waiting one
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_async(async move { task() });
    }

    /// Schedule a future, replacing any waiting one
    pub fn schedule_async<Fut>(&self, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let disarm = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));

        let token = disarm.clone();
        let flag = fired.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            flag.store(true, Ordering::SeqCst);
            task.await;
        });

        let scheduled = Scheduled {
            handle,
            disarm,
            fired,
        };
        if let Some(previous) = self.lock().replace(scheduled) {
            previous.disarm();
        }
    }

    /// Cancel the waiting task. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        self.lock().take().is_some_and(Scheduled::disarm)
    }

    /// Whether a task is still waiting out its delay
    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(Scheduled::is_waiting)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Scheduled>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
