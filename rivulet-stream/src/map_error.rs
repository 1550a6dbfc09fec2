// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Never, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Extension trait providing failure-type conversions for publishers.
pub trait MapErrorExt: Publisher + Sized {
    /// Converts the upstream failure with `transform`. Values are untouched.
    fn map_error<E, F>(self, transform: F) -> MapError<Self, F>
    where
        F: Fn(Self::Failure) -> E + Send + Sync + 'static,
        E: Send + 'static,
    {
        MapError {
            upstream: self,
            transform: Arc::new(transform),
        }
    }

    /// Re-types an infallible publisher so it can be combined with
    /// publishers failing with `E`.
    ///
    /// ```rust
    /// use rivulet_core::{Just, Publisher, RivuletError};
    /// use rivulet_stream::prelude::*;
    ///
    /// fn fallible<P: Publisher<Failure = RivuletError>>(_: P) {}
    ///
    /// fallible(Just::new(1).set_failure_type::<RivuletError>());
    /// ```
    fn set_failure_type<E>(self) -> SetFailureType<Self, E>
    where
        Self: Publisher<Failure = Never>,
        E: Send + 'static,
    {
        SetFailureType {
            upstream: self,
            _marker: PhantomData,
        }
    }
}

impl<P: Publisher> MapErrorExt for P {}

/// Publisher returned by [`MapErrorExt::map_error`].
pub struct MapError<P, F> {
    upstream: P,
    transform: Arc<F>,
}

impl<P, F, E> Publisher for MapError<P, F>
where
    P: Publisher,
    F: Fn(P::Failure) -> E + Send + Sync + 'static,
    E: Send + 'static,
{
    type Output = P::Output;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = E>,
    {
        self.upstream.subscribe(MapErrorSubscriber {
            downstream: subscriber,
            transform: Arc::clone(&self.transform),
            _marker: PhantomData,
        });
    }
}

struct MapErrorSubscriber<S, F, E0> {
    downstream: S,
    transform: Arc<F>,
    _marker: PhantomData<fn(E0)>,
}

impl<S, F, E0> Subscriber for MapErrorSubscriber<S, F, E0>
where
    S: Subscriber,
    F: Fn(E0) -> S::Failure + Send + Sync + 'static,
    E0: 'static,
{
    type Input = S::Input;
    type Failure = E0;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.downstream.receive(input)
    }

    fn receive_completion(&self, completion: Completion<E0>) {
        self.downstream
            .receive_completion(completion.map_failure(|error| (self.transform)(error)));
    }
}

/// Publisher returned by [`MapErrorExt::set_failure_type`].
pub struct SetFailureType<P, E> {
    upstream: P,
    _marker: PhantomData<fn() -> E>,
}

impl<P, E> Publisher for SetFailureType<P, E>
where
    P: Publisher<Failure = Never>,
    E: Send + 'static,
{
    type Output = P::Output;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = E>,
    {
        self.upstream.subscribe(SetFailureTypeSubscriber {
            downstream: subscriber,
        });
    }
}

struct SetFailureTypeSubscriber<S> {
    downstream: S,
}

impl<S: Subscriber> Subscriber for SetFailureTypeSubscriber<S> {
    type Input = S::Input;
    type Failure = Never;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.downstream.receive(input)
    }

    fn receive_completion(&self, completion: Completion<Never>) {
        self.downstream.receive_completion(completion.cast());
    }
}
