// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::Arc;

/// Extension trait providing the `filter` operator for publishers.
pub trait FilterExt: Publisher + Sized {
    /// Forwards only the values for which `predicate` returns `true`.
    ///
    /// Each rejected value is replaced by a request for one more from the
    /// upstream.
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
    /// let _ = (1..=6)
    ///     .publisher()
    ///     .filter(|n| n % 2 == 0)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![2, 4, 6]);
    /// ```
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        Filter {
            upstream: self,
            predicate: Arc::new(predicate),
        }
    }
}

impl<P: Publisher> FilterExt for P {}

/// Publisher returned by [`FilterExt::filter`].
pub struct Filter<P, F> {
    upstream: P,
    predicate: Arc<F>,
}

impl<P, F> Publisher for Filter<P, F>
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
        self.upstream.subscribe(FilterSubscriber {
            downstream: subscriber,
            predicate: Arc::clone(&self.predicate),
        });
    }
}

struct FilterSubscriber<S, F> {
    downstream: S,
    predicate: Arc<F>,
}

impl<S, F> Subscriber for FilterSubscriber<S, F>
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
        if (self.predicate)(&input) {
            self.downstream.receive(input)
        } else {
            Demand::max(1)
        }
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
