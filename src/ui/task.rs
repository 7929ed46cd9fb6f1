//! View-scoped fetch tasks
//!
//! A [`ViewTask`] ties a spawned fetch to the page that started it:
//! dropping the task (because the page was dropped, or replaced by a newer
//! load) aborts the underlying future. Each task also carries the epoch of
//! the load that spawned it, so pages can discard results that arrive
//! after a newer load has taken over.

use std::future::Future;

use tokio::task::JoinHandle;

/// A fetch bound to a view's lifetime
#[derive(Debug)]
pub struct ViewTask<T> {
    handle: Option<JoinHandle<T>>,
    epoch: u64,
}

impl<T: Send + 'static> ViewTask<T> {
    /// Spawn `future`, tagging the task with the load epoch that owns it
    pub fn spawn<F>(epoch: u64, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
            epoch,
        }
    }

    /// Epoch of the load that spawned this task
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Wait for the result; `None` when the task was aborted
    pub async fn join(mut self) -> Option<T> {
        match self.handle.take() {
            Some(handle) => handle.await.ok(),
            None => None,
        }
    }
}

impl<T> Drop for ViewTask<T> {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
