// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::debug;
use crate::upstream_slot::UpstreamSlot;
use parking_lot::Mutex;
use rivulet_core::{
    Completion, Demand, EmptySubscription, Publisher, Subscriber, SubscriptionRef,
};
use std::sync::Arc;

/// Extension trait providing the `prefix` operators for publishers.
pub trait PrefixExt: Publisher + Sized {
    /// Forwards at most `count` values, then cancels the upstream and
    /// finishes.
    ///
    /// With `count == 0` the upstream is never subscribed.
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
    /// let _ = (1..)
    ///     .publisher()
    ///     .prefix(3)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    /// ```
    fn prefix(self, count: usize) -> Prefix<Self> {
        Prefix {
            upstream: self,
            count,
        }
    }

    /// Forwards values while `predicate` holds. The first value failing it
    /// is not emitted; the upstream is cancelled and the output finishes.
    fn prefix_while<F>(self, predicate: F) -> PrefixWhile<Self, F>
    where
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        PrefixWhile {
            upstream: self,
            predicate: Arc::new(predicate),
        }
    }
}

impl<P: Publisher> PrefixExt for P {}

/// Publisher returned by [`PrefixExt::prefix`].
pub struct Prefix<P> {
    upstream: P,
    count: usize,
}

impl<P: Publisher> Publisher for Prefix<P> {
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        if self.count == 0 {
            subscriber.receive_subscription(EmptySubscription::shared());
            subscriber.receive_completion(Completion::Finished);
            return;
        }
        self.upstream.subscribe(PrefixSubscriber {
            downstream: subscriber,
            remaining: Mutex::new(self.count),
            upstream: UpstreamSlot::new(),
        });
    }
}

struct PrefixSubscriber<S> {
    downstream: S,
    remaining: Mutex<usize>,
    upstream: Arc<UpstreamSlot>,
}

impl<S: Subscriber> Subscriber for PrefixSubscriber<S> {
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        let handle = self.upstream.attach(subscription);
        self.downstream.receive_subscription(handle);
    }

    fn receive(&self, input: S::Input) -> Demand {
        if self.upstream.is_done() {
            return Demand::NONE;
        }
        let last = {
            let mut remaining = self.remaining.lock();
            *remaining = remaining.saturating_sub(1);
            *remaining == 0
        };
        let demand = self.downstream.receive(input);
        if last {
            if self.upstream.terminate() {
                debug!("prefix: count reached, finishing");
                self.downstream.receive_completion(Completion::Finished);
            }
            return Demand::NONE;
        }
        demand
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        if self.upstream.finish() {
            self.downstream.receive_completion(completion);
        }
    }
}

/// Publisher returned by [`PrefixExt::prefix_while`].
pub struct PrefixWhile<P, F> {
    upstream: P,
    predicate: Arc<F>,
}

impl<P, F> Publisher for PrefixWhile<P, F>
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
        self.upstream.subscribe(PrefixWhileSubscriber {
            downstream: subscriber,
            predicate: Arc::clone(&self.predicate),
            upstream: UpstreamSlot::new(),
        });
    }
}

struct PrefixWhileSubscriber<S, F> {
    downstream: S,
    predicate: Arc<F>,
    upstream: Arc<UpstreamSlot>,
}

impl<S, F> Subscriber for PrefixWhileSubscriber<S, F>
where
    S: Subscriber,
    F: Fn(&S::Input) -> bool + Send + Sync + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        let handle = self.upstream.attach(subscription);
        self.downstream.receive_subscription(handle);
    }

    fn receive(&self, input: S::Input) -> Demand {
        if self.upstream.is_done() {
            return Demand::NONE;
        }
        if (self.predicate)(&input) {
            return self.downstream.receive(input);
        }
        if self.upstream.terminate() {
            debug!("prefix_while: predicate failed, finishing");
            self.downstream.receive_completion(Completion::Finished);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        if self.upstream.finish() {
            self.downstream.receive_completion(completion);
        }
    }
}
