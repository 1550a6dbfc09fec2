// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::relay::{Forward, Relay};
use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::mem;
use std::sync::Arc;

/// Extension trait providing the batching operators for publishers.
pub trait CollectExt: Publisher + Sized {
    /// Groups values into batches of `count`.
    ///
    /// A batch is emitted as soon as it is full. When the upstream finishes,
    /// a partially filled batch is emitted before the completion; a failure
    /// discards it. Each requested batch asks the upstream for `count`
    /// values.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
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
    /// let _ = (1..=7)
    ///     .publisher()
    ///     .collect(3)
    ///     .sink_value(move |batch| sink.lock().unwrap().push(batch));
    ///
    /// assert_eq!(
    ///     *seen.lock().unwrap(),
    ///     vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]
    /// );
    /// ```
    fn collect(self, count: usize) -> Collect<Self> {
        assert!(count >= 1, "collect: batch size must be at least 1");
        Collect {
            upstream: self,
            count: Some(count),
        }
    }

    /// Gathers every value into a single batch emitted on `Finished`.
    ///
    /// An empty upstream produces one empty batch.
    fn collect_all(self) -> Collect<Self> {
        Collect {
            upstream: self,
            count: None,
        }
    }
}

impl<P: Publisher> CollectExt for P {}

/// Publisher returned by [`CollectExt::collect`] and [`CollectExt::collect_all`].
pub struct Collect<P> {
    upstream: P,
    count: Option<usize>,
}

impl<P: Publisher> Publisher for Collect<P> {
    type Output = Vec<P::Output>;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Vec<P::Output>, Failure = P::Failure>,
    {
        let forward = match self.count {
            Some(count) => Forward::Scaled(count),
            None => Forward::Unlimited,
        };
        let relay = Relay::start(subscriber, forward);
        self.upstream.subscribe(CollectSubscriber {
            relay,
            count: self.count,
            batch: Mutex::new(Vec::new()),
        });
    }
}

struct CollectSubscriber<S: Subscriber, T> {
    relay: Arc<Relay<S>>,
    count: Option<usize>,
    batch: Mutex<Vec<T>>,
}

impl<S, T> Subscriber for CollectSubscriber<S, T>
where
    S: Subscriber<Input = Vec<T>>,
    S::Failure: Send + 'static,
    T: Send + 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.relay.attach(0, subscription);
    }

    fn receive(&self, input: T) -> Demand {
        let full = {
            let mut batch = self.batch.lock();
            batch.push(input);
            match self.count {
                Some(count) if batch.len() >= count => Some(mem::take(&mut *batch)),
                _ => None,
            }
        };
        if let Some(full) = full {
            self.relay.push(full);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        let rest = mem::take(&mut *self.batch.lock());
        self.relay.release(0);
        if completion.is_finished() && (!rest.is_empty() || self.count.is_none()) {
            self.relay.push(rest);
        }
        self.relay.complete(completion);
    }
}
