// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use core::sync::atomic::{AtomicBool, Ordering};
use event_listener::Event;
use std::sync::Arc;

/// Stop signal shared between a scheduled task and whoever owns its lifetime.
///
/// Timer connections, delay workers and stream bridges race their work
/// against [`cancelled`](Self::cancelled). Clones observe the same flag.
///
/// ```
/// use rivulet_runtime::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let worker = tokio::spawn({
///     let token = token.clone();
///     async move { token.cancelled().await }
/// });
///
/// assert!(token.cancel());
/// worker.await.unwrap();
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    stopped: AtomicBool,
    wakeups: Event,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            wakeups: Event::new(),
        }
    }
}

impl CancellationToken {
    /// A token that is not cancelled yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag and wakes every waiter. Returns `true` only for the
    /// call that actually cancelled.
    pub fn cancel(&self) -> bool {
        if self.shared.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        trace!("cancellation token: cancelled");
        self.shared.wakeups.notify(usize::MAX);
        true
    }

    /// Returns `true` once any clone has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Completes once the token is cancelled, immediately if it already is.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            let listener = self.shared.wakeups.listen();
            // Registered after the check; a cancel in between is seen here.
            if self.is_cancelled() {
                return;
            }
            listener.await;
        }
    }
}
