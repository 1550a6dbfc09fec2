// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};

/// Extension trait providing the `replace_nil` operator for publishers of
/// optional values.
pub trait ReplaceNilExt<U>: Publisher<Output = Option<U>> + Sized {
    /// Substitutes `default` for every `None`, unwrapping the rest.
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = vec![Some(1), None, Some(3)]
    ///     .publisher()
    ///     .replace_nil(0)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 0, 3]);
    /// ```
    fn replace_nil(self, default: U) -> ReplaceNil<Self, U>
    where
        U: Clone + Send + Sync + 'static,
    {
        ReplaceNil {
            upstream: self,
            default,
        }
    }
}

impl<P, U> ReplaceNilExt<U> for P where P: Publisher<Output = Option<U>> {}

/// Publisher returned by [`ReplaceNilExt::replace_nil`].
pub struct ReplaceNil<P, U> {
    upstream: P,
    default: U,
}

impl<P, U> Publisher for ReplaceNil<P, U>
where
    P: Publisher<Output = Option<U>>,
    U: Clone + Send + Sync + 'static,
{
    type Output = U;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U, Failure = P::Failure>,
    {
        self.upstream.subscribe(ReplaceNilSubscriber {
            downstream: subscriber,
            default: self.default.clone(),
        });
    }
}

struct ReplaceNilSubscriber<S: Subscriber> {
    downstream: S,
    default: S::Input,
}

impl<S> Subscriber for ReplaceNilSubscriber<S>
where
    S: Subscriber,
    S::Input: Clone + Send + Sync + 'static,
{
    type Input = Option<S::Input>;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: Option<S::Input>) -> Demand {
        self.downstream
            .receive(input.unwrap_or_else(|| self.default.clone()))
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
