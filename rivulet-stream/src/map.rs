// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Extension trait providing the `map` operator for publishers.
pub trait MapExt: Publisher + Sized {
    /// Transforms every value with `transform`.
    ///
    /// One value in, one value out. Demand and completion pass through
    /// unchanged; a failure from upstream is forwarded as is.
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
    /// let _ = vec![1, 2, 3]
    ///     .publisher()
    ///     .map(|n| n * 10)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![10, 20, 30]);
    /// ```
    ///
    /// # See Also
    ///
    /// - [`TryMapExt::try_map`](crate::TryMapExt::try_map) - Transform that may fail
    /// - [`CompactMapExt::compact_map`](crate::CompactMapExt::compact_map) - Transform that may drop
    fn map<U, F>(self, transform: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        Map {
            upstream: self,
            transform: Arc::new(transform),
        }
    }
}

impl<P: Publisher> MapExt for P {}

/// Publisher returned by [`MapExt::map`].
pub struct Map<P, F> {
    upstream: P,
    transform: Arc<F>,
}

impl<P, F, U> Publisher for Map<P, F>
where
    P: Publisher,
    F: Fn(P::Output) -> U + Send + Sync + 'static,
    U: Send + 'static,
{
    type Output = U;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U, Failure = P::Failure>,
    {
        self.upstream.subscribe(MapSubscriber {
            downstream: subscriber,
            transform: Arc::clone(&self.transform),
            _marker: PhantomData,
        });
    }
}

struct MapSubscriber<S, F, T> {
    downstream: S,
    transform: Arc<F>,
    _marker: PhantomData<fn(T)>,
}

impl<S, F, T> Subscriber for MapSubscriber<S, F, T>
where
    S: Subscriber,
    F: Fn(T) -> S::Input + Send + Sync + 'static,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: T) -> Demand {
        self.downstream.receive((self.transform)(input))
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
