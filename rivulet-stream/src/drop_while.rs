// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Extension trait providing the `drop_while` operator for publishers.
pub trait DropWhileExt: Publisher + Sized {
    /// Skips values while `predicate` holds.
    ///
    /// The predicate is evaluated only until it first returns `false`. That
    /// value and everything after it pass through, even values for which
    /// the predicate would hold again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = vec![1, 2, 5, 1, 6]
    ///     .publisher()
    ///     .drop_while(|n| *n < 3)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![5, 1, 6]);
    /// ```
    fn drop_while<F>(self, predicate: F) -> DropWhile<Self, F>
    where
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        DropWhile {
            upstream: self,
            predicate: Arc::new(predicate),
        }
    }
}

impl<P: Publisher> DropWhileExt for P {}

/// Publisher returned by [`DropWhileExt::drop_while`].
pub struct DropWhile<P, F> {
    upstream: P,
    predicate: Arc<F>,
}

impl<P, F> Publisher for DropWhile<P, F>
where
    P: Publisher,
    F: Fn(&P::Output) -> bool + Send + Sync + 'static,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        self.upstream.subscribe(DropWhileSubscriber {
            downstream: subscriber,
            predicate: Arc::clone(&self.predicate),
            passing: AtomicBool::new(false),
        });
    }
}

struct DropWhileSubscriber<S, F> {
    downstream: S,
    predicate: Arc<F>,
    passing: AtomicBool,
}

impl<S, F> Subscriber for DropWhileSubscriber<S, F>
where
    S: Subscriber,
    F: Fn(&S::Input) -> bool + Send + Sync + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        if !self.passing.load(Ordering::Acquire) {
            if (self.predicate)(&input) {
                return Demand::max(1);
            }
            self.passing.store(true, Ordering::Release);
        }
        self.downstream.receive(input)
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
