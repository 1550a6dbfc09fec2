// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Completion, Demand, SubscriptionRef};
use std::sync::Arc;

/// The sink side of the protocol.
///
/// A subscriber receives exactly one subscription, then zero or more values
/// (never more than it has demanded), then at most one completion.
///
/// All callbacks take `&self`: the publisher side owns the subscriber and may
/// share it between internal stages, so implementations keep their mutable
/// state behind a lock.
pub trait Subscriber: Send + Sync + 'static {
    /// Values accepted by this subscriber.
    type Input;
    /// Failure type accepted by this subscriber.
    type Failure;

    /// Called once, before any value, with the handle used to drive demand.
    fn receive_subscription(&self, subscription: SubscriptionRef);

    /// Receives one value and returns any additional demand.
    ///
    /// The returned demand is added to the outstanding total; return
    /// [`Demand::NONE`] to leave it unchanged.
    fn receive(&self, input: Self::Input) -> Demand;

    /// Receives the terminal signal.
    fn receive_completion(&self, completion: Completion<Self::Failure>);
}

/// Shared handle to a type-erased subscriber.
pub type AnySubscriber<T, E> = Arc<dyn Subscriber<Input = T, Failure = E>>;

impl<S> Subscriber for Arc<S>
where
    S: Subscriber + ?Sized,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        (**self).receive_subscription(subscription);
    }

    fn receive(&self, input: Self::Input) -> Demand {
        (**self).receive(input)
    }

    fn receive_completion(&self, completion: Completion<Self::Failure>) {
        (**self).receive_completion(completion);
    }
}
