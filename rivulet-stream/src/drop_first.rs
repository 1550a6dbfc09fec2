// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Extension trait providing the `drop_first` operator for publishers.
pub trait DropFirstExt: Publisher + Sized {
    /// Skips the first `count` values.
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = (1..=5)
    ///     .publisher()
    ///     .drop_first(2)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![3, 4, 5]);
    /// ```
    fn drop_first(self, count: usize) -> DropFirst<Self> {
        DropFirst {
            upstream: self,
            count,
        }
    }
}

impl<P: Publisher> DropFirstExt for P {}

/// Publisher returned by [`DropFirstExt::drop_first`].
pub struct DropFirst<P> {
    upstream: P,
    count: usize,
}

impl<P: Publisher> Publisher for DropFirst<P> {
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        self.upstream.subscribe(DropFirstSubscriber {
            downstream: subscriber,
            remaining: AtomicUsize::new(self.count),
        });
    }
}

struct DropFirstSubscriber<S> {
    downstream: S,
    remaining: AtomicUsize,
}

impl<S: Subscriber> Subscriber for DropFirstSubscriber<S> {
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        let skipped = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok();
        if skipped {
            Demand::max(1)
        } else {
            self.downstream.receive(input)
        }
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
