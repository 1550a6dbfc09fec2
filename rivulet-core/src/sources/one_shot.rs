// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use crate::{Completion, DemandBuffer, Publisher, Subscriber};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type Waiter<T, E> = Box<dyn FnOnce(Result<T, E>) + Send>;

enum OneShotState<T, E> {
    Pending(Vec<Waiter<T, E>>),
    Resolved(Result<T, E>),
}

struct Shared<T, E> {
    state: Mutex<OneShotState<T, E>>,
}

/// A future-like publisher producing exactly one result.
///
/// The work starts when the publisher is created, not when it is subscribed.
/// Its single result is cached: every subscriber, whether it attaches before
/// or after the work finished, receives the identical value followed by
/// `Finished`, or the identical failure. The work never runs twice.
///
/// ```
/// use rivulet_core::{Completion, OneShot, SinkExt};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::{Arc, Mutex};
///
/// let runs = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&runs);
/// let answer = OneShot::<u32, String>::new(move |promise| {
///     counter.fetch_add(1, Ordering::SeqCst);
///     promise.fulfill(Ok(42));
/// });
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// for _ in 0..2 {
///     let values = Arc::clone(&seen);
///     let _ = answer.sink(|_| {}, move |v| values.lock().unwrap().push(v));
/// }
///
/// assert_eq!(*seen.lock().unwrap(), vec![42, 42]);
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
pub struct OneShot<T, E> {
    shared: Arc<Shared<T, E>>,
}

/// The completion side of a [`OneShot`].
///
/// Fulfilling consumes the promise, so a result is recorded at most once. A
/// promise dropped without being fulfilled leaves its subscribers waiting.
pub struct Promise<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> OneShot<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Starts `work` immediately, handing it the promise to fulfill.
    ///
    /// `work` may fulfill the promise synchronously or move it elsewhere (a
    /// thread, a spawned task) and fulfill it later.
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce(Promise<T, E>),
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(OneShotState::Pending(Vec::new())),
        });
        work(Promise {
            shared: Arc::clone(&shared),
        });
        Self { shared }
    }

    /// A one-shot that is already resolved with `result`.
    pub fn resolved(result: Result<T, E>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(OneShotState::Resolved(result)),
            }),
        }
    }

    /// Returns `true` once the result is available.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.shared.state.lock(), OneShotState::Resolved(_))
    }
}

impl<T, E> Clone for OneShot<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> fmt::Debug for OneShot<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = matches!(*self.shared.state.lock(), OneShotState::Resolved(_));
        f.debug_struct("OneShot")
            .field("resolved", &resolved)
            .finish()
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Records the result and delivers it to every waiting subscriber.
    pub fn fulfill(self, result: Result<T, E>) {
        let waiters = {
            let mut state = self.shared.state.lock();
            if matches!(*state, OneShotState::Resolved(_)) {
                return;
            }
            match std::mem::replace(&mut *state, OneShotState::Resolved(result.clone())) {
                OneShotState::Pending(waiters) => waiters,
                OneShotState::Resolved(_) => Vec::new(),
            }
        };
        trace!("one_shot: resolved, notifying {} waiters", waiters.len());
        for waiter in waiters {
            waiter(result.clone());
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise").finish_non_exhaustive()
    }
}

fn deliver<S, T, E>(buffer: &DemandBuffer<S>, result: Result<T, E>)
where
    S: Subscriber<Input = T, Failure = E>,
{
    match result {
        Ok(value) => {
            buffer.push(value);
            buffer.complete(Completion::Finished);
        }
        Err(error) => buffer.complete(Completion::Failure(error)),
    }
}

impl<T, E> Publisher for OneShot<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        let buffer = Arc::new(DemandBuffer::new(subscriber));
        buffer
            .subscriber()
            .receive_subscription(Arc::clone(&buffer) as _);

        let resolved = {
            let mut state = self.shared.state.lock();
            match &mut *state {
                OneShotState::Resolved(result) => Some(result.clone()),
                OneShotState::Pending(waiters) => {
                    let waiting = Arc::clone(&buffer);
                    waiters.push(Box::new(move |result| deliver(&waiting, result)));
                    None
                }
            }
        };
        if let Some(result) = resolved {
            deliver(&buffer, result);
        }
    }
}
