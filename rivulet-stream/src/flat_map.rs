// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use crate::relay::{Forward, Relay};
use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::Arc;

const OUTER: usize = 0;

/// Extension trait providing the `flat_map` operators for publishers.
pub trait FlatMapExt: Publisher + Sized {
    /// Maps every value to an inner publisher and merges the values of all
    /// active inner publishers.
    ///
    /// The output finishes once the upstream and every inner publisher have
    /// finished. The first failure from either side fails the output and
    /// cancels everything else. An inner publisher that ends, or whose own
    /// stages cancel their upstream, leaves its siblings running.
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
    /// let _ = vec![1, 2]
    ///     .publisher()
    ///     .flat_map(|n| vec![n * 10, n * 10 + 1].publisher())
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![10, 11, 20, 21]);
    /// ```
    ///
    /// # See Also
    ///
    /// - [`SwitchToLatestExt::switch_to_latest`](crate::SwitchToLatestExt::switch_to_latest) - Keep only the newest inner publisher
    fn flat_map<Q, F>(self, transform: F) -> FlatMap<Self, F>
    where
        F: Fn(Self::Output) -> Q + Send + Sync + 'static,
        Q: Publisher<Failure = Self::Failure>,
    {
        self.flat_map_with(Demand::Unlimited, transform)
    }

    /// Like [`flat_map`](Self::flat_map), with at most `max_publishers`
    /// inner publishers subscribed at once.
    ///
    /// The upstream is asked for `max_publishers` values up front and for
    /// one more each time an inner publisher finishes.
    fn flat_map_with<Q, F>(self, max_publishers: Demand, transform: F) -> FlatMap<Self, F>
    where
        F: Fn(Self::Output) -> Q + Send + Sync + 'static,
        Q: Publisher<Failure = Self::Failure>,
    {
        FlatMap {
            upstream: self,
            max_publishers,
            transform: Arc::new(transform),
        }
    }
}

impl<P: Publisher> FlatMapExt for P {}

/// Publisher returned by [`FlatMapExt::flat_map`].
pub struct FlatMap<P, F> {
    upstream: P,
    max_publishers: Demand,
    transform: Arc<F>,
}

impl<P, F, Q> Publisher for FlatMap<P, F>
where
    P: Publisher,
    F: Fn(P::Output) -> Q + Send + Sync + 'static,
    Q: Publisher<Failure = P::Failure>,
{
    type Output = Q::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Q::Output, Failure = P::Failure>,
    {
        let core = Arc::new(FlatMapCore {
            relay: Relay::start(subscriber, Forward::Unlimited),
            state: Mutex::new(FlatMapState {
                active: 0,
                next_index: OUTER,
                outer_done: false,
            }),
            max_publishers: self.max_publishers,
        });
        self.upstream.subscribe(OuterSubscriber {
            core,
            transform: Arc::clone(&self.transform),
            _marker: PhantomData,
        });
    }
}

struct FlatMapState {
    active: usize,
    next_index: usize,
    outer_done: bool,
}

struct FlatMapCore<S: Subscriber> {
    relay: Arc<Relay<S>>,
    state: Mutex<FlatMapState>,
    max_publishers: Demand,
}

impl<S> FlatMapCore<S>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    fn inner_finished(&self, index: usize) {
        self.relay.release(index);
        let done = {
            let mut state = self.state.lock();
            state.active = state.active.saturating_sub(1);
            state.outer_done && state.active == 0
        };
        if done {
            self.relay.complete(Completion::Finished);
        } else if !self.max_publishers.is_unlimited() {
            self.relay.request_upstream(OUTER, Demand::max(1));
        }
    }

    fn outer_finished(&self) {
        self.relay.release(OUTER);
        let done = {
            let mut state = self.state.lock();
            state.outer_done = true;
            state.active == 0
        };
        if done {
            self.relay.complete(Completion::Finished);
        }
    }
}

struct OuterSubscriber<S: Subscriber, F, T> {
    core: Arc<FlatMapCore<S>>,
    transform: Arc<F>,
    _marker: PhantomData<fn(T)>,
}

impl<S, F, T, Q> Subscriber for OuterSubscriber<S, F, T>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
    F: Fn(T) -> Q + Send + Sync + 'static,
    Q: Publisher<Output = S::Input, Failure = S::Failure>,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.core
            .relay
            .attach_requesting(OUTER, subscription, self.core.max_publishers);
    }

    fn receive(&self, input: T) -> Demand {
        if self.core.relay.is_closed() {
            return Demand::NONE;
        }
        let inner = (self.transform)(input);
        let index = {
            let mut state = self.core.state.lock();
            state.active += 1;
            state.next_index += 1;
            state.next_index
        };
        trace!("flat_map: subscribing inner publisher {}", index);
        inner.subscribe(InnerSubscriber {
            core: Arc::clone(&self.core),
            index,
        });
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        match completion {
            Completion::Finished => self.core.outer_finished(),
            failure => self.core.relay.complete(failure),
        }
    }
}

struct InnerSubscriber<S: Subscriber> {
    core: Arc<FlatMapCore<S>>,
    index: usize,
}

impl<S> Subscriber for InnerSubscriber<S>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.core
            .relay
            .attach_requesting(self.index, subscription, Demand::Unlimited);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.core.relay.push(input);
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        match completion {
            Completion::Finished => self.core.inner_finished(self.index),
            failure => self.core.relay.complete(failure),
        }
    }
}
