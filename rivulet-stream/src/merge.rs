// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::relay::{Forward, Relay};
use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::Arc;

/// Extension trait providing the `merge` operators for publishers.
pub trait MergeExt: Publisher + Sized {
    /// Interleaves the values of `self` and `other` in arrival order.
    ///
    /// The output finishes once both upstreams have finished and fails as
    /// soon as either fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{PassthroughSubject, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let left = PassthroughSubject::<i32>::new();
    /// let right = PassthroughSubject::<i32>::new();
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _handle = left
    ///     .clone()
    ///     .merge(right.clone())
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// left.send(1).unwrap();
    /// right.send(2).unwrap();
    /// left.send(3).unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    /// ```
    fn merge<B>(self, other: B) -> Merge<Self, B>
    where
        B: Publisher<Output = Self::Output, Failure = Self::Failure>,
    {
        Merge {
            first: self,
            second: other,
        }
    }
}

impl<P: Publisher> MergeExt for P {}

/// Interleaves the values of every publisher in `upstreams`.
///
/// An empty list finishes immediately.
pub fn merge_all<P: Publisher>(upstreams: Vec<P>) -> MergeAll<P> {
    MergeAll { upstreams }
}

/// Publisher returned by [`MergeExt::merge`].
pub struct Merge<A, B> {
    first: A,
    second: B,
}

/// Publisher returned by [`merge_all`].
pub struct MergeAll<P> {
    upstreams: Vec<P>,
}

impl<A, B> Publisher for Merge<A, B>
where
    A: Publisher,
    B: Publisher<Output = A::Output, Failure = A::Failure>,
{
    type Output = A::Output;
    type Failure = A::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = A::Output, Failure = A::Failure>,
    {
        let core = MergeCore::start(subscriber, 2);
        self.first.subscribe(MergeLane {
            core: Arc::clone(&core),
            index: 0,
        });
        self.second.subscribe(MergeLane { core, index: 1 });
    }
}

impl<P: Publisher> Publisher for MergeAll<P> {
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        let core = MergeCore::start(subscriber, self.upstreams.len());
        if self.upstreams.is_empty() {
            core.relay.complete(Completion::Finished);
            return;
        }
        for (index, upstream) in self.upstreams.iter().enumerate() {
            upstream.subscribe(MergeLane {
                core: Arc::clone(&core),
                index,
            });
        }
    }
}

struct MergeCore<S: Subscriber> {
    relay: Arc<Relay<S>>,
    remaining: Mutex<usize>,
}

impl<S> MergeCore<S>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    fn start(downstream: S, lanes: usize) -> Arc<Self> {
        Arc::new(Self {
            relay: Relay::start(downstream, Forward::Scaled(1)),
            remaining: Mutex::new(lanes),
        })
    }
}

struct MergeLane<S: Subscriber> {
    core: Arc<MergeCore<S>>,
    index: usize,
}

impl<S> Subscriber for MergeLane<S>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.core.relay.attach(self.index, subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.core.relay.push(input);
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.core.relay.release(self.index);
        match completion {
            Completion::Finished => {
                let done = {
                    let mut remaining = self.core.remaining.lock();
                    *remaining = remaining.saturating_sub(1);
                    *remaining == 0
                };
                if done {
                    self.core.relay.complete(Completion::Finished);
                }
            }
            failure => self.core.relay.complete(failure),
        }
    }
}
