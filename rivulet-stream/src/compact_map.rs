// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Extension trait providing the `compact_map` operator for publishers.
pub trait CompactMapExt: Publisher + Sized {
    /// Transforms every value, dropping those for which `transform` returns
    /// `None`.
    ///
    /// A dropped value gives its unit of demand back to the upstream, so the
    /// downstream still receives as many values as it asked for.
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
    /// let _ = vec!["1", "two", "3"]
    ///     .publisher()
    ///     .compact_map(|s| s.parse::<i32>().ok())
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    /// ```
    fn compact_map<U, F>(self, transform: F) -> CompactMap<Self, F>
    where
        F: Fn(Self::Output) -> Option<U> + Send + Sync + 'static,
        U: Send + 'static,
    {
        CompactMap {
            upstream: self,
            transform: Arc::new(transform),
        }
    }
}

impl<P: Publisher> CompactMapExt for P {}

/// Publisher returned by [`CompactMapExt::compact_map`].
pub struct CompactMap<P, F> {
    upstream: P,
    transform: Arc<F>,
}

impl<P, F, U> Publisher for CompactMap<P, F>
where
    P: Publisher,
    F: Fn(P::Output) -> Option<U> + Send + Sync + 'static,
    U: Send + 'static,
{
    type Output = U;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U, Failure = P::Failure>,
    {
        self.upstream.subscribe(CompactMapSubscriber {
            downstream: subscriber,
            transform: Arc::clone(&self.transform),
            _marker: PhantomData,
        });
    }
}

struct CompactMapSubscriber<S, F, T> {
    downstream: S,
    transform: Arc<F>,
    _marker: PhantomData<fn(T)>,
}

impl<S, F, T> Subscriber for CompactMapSubscriber<S, F, T>
where
    S: Subscriber,
    F: Fn(T) -> Option<S::Input> + Send + Sync + 'static,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: T) -> Demand {
        match (self.transform)(input) {
            Some(value) => self.downstream.receive(value),
            None => Demand::max(1),
        }
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
