// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Extension trait providing the `scan` operator for publishers.
pub trait ScanExt: Publisher + Sized {
    /// Folds every value into an accumulator and emits the accumulator.
    ///
    /// Each subscription starts from its own copy of `seed`. The seed itself
    /// is never emitted.
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
    /// let _ = (1..=4)
    ///     .publisher()
    ///     .scan(0, |total, n| total + n)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 3, 6, 10]);
    /// ```
    fn scan<A, F>(self, seed: A, accumulate: F) -> Scan<Self, A, F>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(&A, Self::Output) -> A + Send + Sync + 'static,
    {
        Scan {
            upstream: self,
            seed,
            accumulate: Arc::new(accumulate),
        }
    }
}

impl<P: Publisher> ScanExt for P {}

/// Publisher returned by [`ScanExt::scan`].
pub struct Scan<P, A, F> {
    upstream: P,
    seed: A,
    accumulate: Arc<F>,
}

impl<P, A, F> Publisher for Scan<P, A, F>
where
    P: Publisher,
    A: Clone + Send + Sync + 'static,
    F: Fn(&A, P::Output) -> A + Send + Sync + 'static,
{
    type Output = A;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = A, Failure = P::Failure>,
    {
        self.upstream.subscribe(ScanSubscriber {
            downstream: subscriber,
            accumulate: Arc::clone(&self.accumulate),
            accumulator: Mutex::new(self.seed.clone()),
            _marker: PhantomData,
        });
    }
}

struct ScanSubscriber<S: Subscriber, F, T> {
    downstream: S,
    accumulate: Arc<F>,
    accumulator: Mutex<S::Input>,
    _marker: PhantomData<fn(T)>,
}

impl<S, F, T> Subscriber for ScanSubscriber<S, F, T>
where
    S: Subscriber,
    S::Input: Clone + Send + 'static,
    F: Fn(&S::Input, T) -> S::Input + Send + Sync + 'static,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: T) -> Demand {
        let next = {
            let mut accumulator = self.accumulator.lock();
            *accumulator = (self.accumulate)(&*accumulator, input);
            accumulator.clone()
        };
        self.downstream.receive(next)
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
