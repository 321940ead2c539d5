// crates/folio-discovery/src/platform/frames.rs
// Rendering-frame batching: DOM writes are deferred to the next paint

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub type FrameTask = Box<dyn FnOnce() + Send + 'static>;

/// Approximate frame interval at 60Hz
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub trait FrameScheduler: Send + Sync {
    /// Run `task` before the next paint
    fn request_frame(&self, task: FrameTask);
}

/// Spawns each frame on the ambient Tokio runtime, one tick out
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFrames;

impl FrameScheduler for TokioFrames {
    fn request_frame(&self, task: FrameTask) {
        tokio::spawn(async move {
            tokio::time::sleep(FRAME_INTERVAL).await;
            task();
        });
    }
}

/// Runs frame tasks inline
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateFrames;

impl FrameScheduler for ImmediateFrames {
    fn request_frame(&self, task: FrameTask) {
        task();
    }
}

/// Queues frame tasks until the host calls `flush`
#[derive(Default)]
pub struct ManualFrames {
    queue: Mutex<Vec<FrameTask>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Run every queued task in request order; returns how many ran
    pub fn flush(&self) -> usize {
        let tasks = std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner));
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&self, task: FrameTask) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
    }
}
