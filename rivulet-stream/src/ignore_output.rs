// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Never, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;

/// Extension trait providing the `ignore_output` operator for publishers.
pub trait IgnoreOutputExt: Publisher + Sized {
    /// Discards every value and forwards only the completion.
    ///
    /// The upstream is drained with unlimited demand.
    fn ignore_output(self) -> IgnoreOutput<Self> {
        IgnoreOutput { upstream: self }
    }
}

impl<P: Publisher> IgnoreOutputExt for P {}

/// Publisher returned by [`IgnoreOutputExt::ignore_output`].
pub struct IgnoreOutput<P> {
    upstream: P,
}

impl<P: Publisher> Publisher for IgnoreOutput<P> {
    type Output = Never;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Never, Failure = P::Failure>,
    {
        self.upstream.subscribe(IgnoreOutputSubscriber {
            downstream: subscriber,
            _marker: PhantomData,
        });
    }
}

struct IgnoreOutputSubscriber<S, T> {
    downstream: S,
    _marker: PhantomData<fn(T)>,
}

impl<S, T> Subscriber for IgnoreOutputSubscriber<S, T>
where
    S: Subscriber<Input = Never>,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream
            .receive_subscription(SubscriptionRef::clone(&subscription));
        subscription.request(Demand::Unlimited);
    }

    fn receive(&self, _input: T) -> Demand {
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}
