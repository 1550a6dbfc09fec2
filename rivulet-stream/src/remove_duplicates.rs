// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::Arc;

/// Extension trait providing the `remove_duplicates` operators for publishers.
pub trait RemoveDuplicatesExt: Publisher + Sized {
    /// Drops values equal to the one emitted immediately before them.
    ///
    /// Only the previous emitted value is compared, not the whole history.
    /// The first value always passes.
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
    /// let _ = vec![1, 2, 2, 2, 3, 4, 5, 5, 6]
    ///     .publisher()
    ///     .remove_duplicates()
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    /// ```
    fn remove_duplicates(self) -> RemoveDuplicates<Self, fn(&Self::Output, &Self::Output) -> bool>
    where
        Self::Output: Clone + PartialEq,
    {
        let same: fn(&Self::Output, &Self::Output) -> bool = PartialEq::eq;
        self.remove_duplicates_by(same)
    }

    /// Like [`remove_duplicates`](Self::remove_duplicates), with `same`
    /// deciding whether two consecutive values are duplicates.
    fn remove_duplicates_by<F>(self, same: F) -> RemoveDuplicates<Self, F>
    where
        Self::Output: Clone,
        F: Fn(&Self::Output, &Self::Output) -> bool + Send + Sync + 'static,
    {
        RemoveDuplicates {
            upstream: self,
            same: Arc::new(same),
        }
    }
}

impl<P: Publisher> RemoveDuplicatesExt for P {}

/// Publisher returned by [`RemoveDuplicatesExt::remove_duplicates`].
pub struct RemoveDuplicates<P, F> {
    upstream: P,
    same: Arc<F>,
}

impl<P, F> Publisher for RemoveDuplicates<P, F>
where
    P: Publisher,
    P::Output: Clone,
    F: Fn(&P::Output, &P::Output) -> bool + Send + Sync + 'static,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        self.upstream.subscribe(RemoveDuplicatesSubscriber {
            downstream: subscriber,
            same: Arc::clone(&self.same),
            previous: Mutex::new(None),
        });
    }
}

struct RemoveDuplicatesSubscriber<S: Subscriber, F> {
    downstream: S,
    same: Arc<F>,
    previous: Mutex<Option<S::Input>>,
}

impl<S, F> Subscriber for RemoveDuplicatesSubscriber<S, F>
where
    S: Subscriber,
    S::Input: Clone + Send + 'static,
    F: Fn(&S::Input, &S::Input) -> bool + Send + Sync + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        {
            let mut previous = self.previous.lock();
            if let Some(last) = previous.as_ref() {
                if (self.same)(last, &input) {
                    return Demand::max(1);
                }
            }
            *previous = Some(input.clone());
        }
        self.downstream.receive(input)
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.previous.lock().take();
        self.downstream.receive_completion(completion);
    }
}
