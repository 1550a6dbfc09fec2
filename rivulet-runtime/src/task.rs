// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background tasks with cooperative cancellation.

use crate::logging::trace;
use crate::{CancellationToken, Runtime};
use core::future::Future;

/// Handle to a spawned background task, cancelling it on drop.
///
/// The task body receives a [`CancellationToken`] that it must watch (usually
/// by racing its work against `token.cancelled()`). Dropping or cancelling the
/// handle signals the token; the task stops at its next checkpoint.
///
/// # Example
///
/// ```rust
/// use rivulet_runtime::{TaskHandle, TokioRuntime};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let counter = Arc::new(AtomicU32::new(0));
/// let counter_clone = counter.clone();
///
/// let task = TaskHandle::spawn(&TokioRuntime, |cancel| async move {
///     while !cancel.is_cancelled() {
///         counter_clone.fetch_add(1, Ordering::SeqCst);
///         tokio::task::yield_now().await;
///     }
/// });
///
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
#[must_use = "dropping a TaskHandle cancels the task"]
pub struct TaskHandle {
    cancel: CancellationToken,
}

impl TaskHandle {
    /// Spawns the future built by `f` on `runtime`.
    pub fn spawn<R, F, Fut>(runtime: &R, f: F) -> Self
    where
        R: Runtime,
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        runtime.spawn(f(cancel.clone()));
        trace!("task: spawned");
        Self { cancel }
    }

    /// Signals the task to stop without waiting for it.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            trace!("task: cancelled");
        }
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the task's token.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
