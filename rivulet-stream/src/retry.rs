// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::warn;
use crate::serial::Serial;
use rivulet_core::{Completion, Demand, Publisher, RivuletError, Subscriber, SubscriptionRef};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Extension trait providing the `retry` operator for publishers.
pub trait RetryExt: Publisher + Sized + Send + Sync + 'static {
    /// Resubscribes to the upstream after a failure, at most `retries`
    /// times.
    ///
    /// Values already delivered are not replayed or deduplicated; demand
    /// not yet satisfied carries over to the new subscription. Once the
    /// retries are used up the last failure is forwarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{Completion, Deferred, Fail, IntoPublisher, EraseExt, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let attempts = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&attempts);
    /// let flaky = Deferred::new(move || {
    ///     if counter.fetch_add(1, Ordering::SeqCst) < 2 {
    ///         Fail::<i32, String>::new("not yet".to_string()).erase()
    ///     } else {
    ///         vec![7].publisher_with_failure::<String>().erase()
    ///     }
    /// });
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = flaky
    ///     .retry(3)
    ///     .sink(|c| assert_eq!(c, Completion::Finished), move |v| sink.lock().unwrap().push(v));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![7]);
    /// assert_eq!(attempts.load(Ordering::SeqCst), 3);
    /// ```
    fn retry(self, retries: usize) -> Retry<Self> {
        Retry {
            upstream: Arc::new(self),
            retries,
            exhausted: None,
        }
    }

    /// Like [`retry`](Self::retry), but once the retries are used up the
    /// stream fails with [`RivuletError::RetryExhausted`] instead of the
    /// last upstream failure.
    fn retry_or_exhaust(self, retries: usize) -> Retry<Self>
    where
        Self: Publisher<Failure = RivuletError>,
    {
        Retry {
            upstream: Arc::new(self),
            retries,
            exhausted: Some(|attempts| RivuletError::RetryExhausted { attempts }),
        }
    }
}

impl<P> RetryExt for P where P: Publisher + Send + Sync + 'static {}

/// Publisher returned by [`RetryExt::retry`].
pub struct Retry<P: Publisher> {
    upstream: Arc<P>,
    retries: usize,
    exhausted: Option<fn(usize) -> P::Failure>,
}

impl<P> Publisher for Retry<P>
where
    P: Publisher + Send + Sync + 'static,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        let attempt = RetrySubscriber {
            serial: Serial::start(subscriber),
            upstream: Arc::clone(&self.upstream),
            remaining: Arc::new(AtomicUsize::new(self.retries)),
            retries: self.retries,
            exhausted: self.exhausted,
        };
        self.upstream.subscribe(attempt);
    }
}

struct RetrySubscriber<S: Subscriber, P> {
    serial: Arc<Serial<S>>,
    upstream: Arc<P>,
    remaining: Arc<AtomicUsize>,
    retries: usize,
    exhausted: Option<fn(usize) -> S::Failure>,
}

impl<S, P> Subscriber for RetrySubscriber<S, P>
where
    S: Subscriber,
    P: Publisher<Output = S::Input, Failure = S::Failure> + Send + Sync + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.serial.attach(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.serial.deliver(input)
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        if completion.is_failure() {
            let retry = self
                .remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_ok();
            if retry && self.serial.detach() {
                warn!("retry: upstream failed, resubscribing");
                self.upstream.subscribe(RetrySubscriber {
                    serial: Arc::clone(&self.serial),
                    upstream: Arc::clone(&self.upstream),
                    remaining: Arc::clone(&self.remaining),
                    retries: self.retries,
                    exhausted: self.exhausted,
                });
                return;
            }
            if let Some(exhausted) = self.exhausted {
                warn!("retry: giving up after {} attempts", self.retries + 1);
                self.serial
                    .finish(Completion::Failure(exhausted(self.retries + 1)));
                return;
            }
        }
        self.serial.finish(completion);
    }
}
