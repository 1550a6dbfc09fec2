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

/// Extension trait providing the `switch_to_latest` operator for publishers
/// of publishers.
pub trait SwitchToLatestExt: Publisher + Sized {
    /// Subscribes to every inner publisher as it arrives, cancelling the
    /// previous one first.
    ///
    /// Only the most recent inner publisher is ever forwarded. The output
    /// finishes once the upstream and the current inner publisher have both
    /// finished.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{AnyPublisher, EraseExt, Never, PassthroughSubject, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let first = PassthroughSubject::<&str>::new();
    /// let second = PassthroughSubject::<&str>::new();
    /// let outer = PassthroughSubject::<AnyPublisher<&str, Never>>::new();
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _handle = outer
    ///     .clone()
    ///     .switch_to_latest()
    ///     .sink_value(move |s| sink.lock().unwrap().push(s));
    ///
    /// outer.send(first.clone().erase()).unwrap();
    /// first.send("a").unwrap();
    /// outer.send(second.clone().erase()).unwrap();
    /// first.send("stale").unwrap();
    /// second.send("b").unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    /// ```
    fn switch_to_latest(self) -> SwitchToLatest<Self>
    where
        Self::Output: Publisher<Failure = Self::Failure>,
    {
        SwitchToLatest { upstream: self }
    }
}

impl<P: Publisher> SwitchToLatestExt for P {}

/// Publisher returned by [`SwitchToLatestExt::switch_to_latest`].
pub struct SwitchToLatest<P> {
    upstream: P,
}

impl<P, Q> Publisher for SwitchToLatest<P>
where
    P: Publisher<Output = Q>,
    Q: Publisher<Failure = P::Failure> + Send + 'static,
{
    type Output = Q::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Q::Output, Failure = P::Failure>,
    {
        let core = Arc::new(SwitchCore {
            relay: Relay::start(subscriber, Forward::Unlimited),
            state: Mutex::new(SwitchState {
                generation: OUTER,
                inner_active: false,
                outer_done: false,
            }),
        });
        self.upstream.subscribe(OuterSubscriber {
            core,
            _marker: PhantomData,
        });
    }
}

struct SwitchState {
    generation: usize,
    inner_active: bool,
    outer_done: bool,
}

struct SwitchCore<S: Subscriber> {
    relay: Arc<Relay<S>>,
    state: Mutex<SwitchState>,
}

impl<S: Subscriber> SwitchCore<S> {
    fn is_current(&self, generation: usize) -> bool {
        self.state.lock().generation == generation
    }
}

struct OuterSubscriber<S: Subscriber, Q> {
    core: Arc<SwitchCore<S>>,
    _marker: PhantomData<fn(Q)>,
}

impl<S, Q> Subscriber for OuterSubscriber<S, Q>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
    Q: Publisher<Output = S::Input, Failure = S::Failure> + 'static,
{
    type Input = Q;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.core.relay.attach(OUTER, subscription);
    }

    fn receive(&self, inner: Q) -> Demand {
        if self.core.relay.is_closed() {
            return Demand::NONE;
        }
        let (previous, generation) = {
            let mut state = self.core.state.lock();
            let previous = state.generation;
            state.generation += 1;
            state.inner_active = true;
            (previous, state.generation)
        };
        if previous != OUTER {
            trace!("switch_to_latest: cancelling inner publisher {}", previous);
            self.core.relay.cancel_upstream(previous);
        }
        inner.subscribe(InnerSubscriber {
            core: Arc::clone(&self.core),
            generation,
        });
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.core.relay.release(OUTER);
        match completion {
            Completion::Finished => {
                let done = {
                    let mut state = self.core.state.lock();
                    state.outer_done = true;
                    !state.inner_active
                };
                if done {
                    self.core.relay.complete(Completion::Finished);
                }
            }
            failure => self.core.relay.complete(failure),
        }
    }
}

struct InnerSubscriber<S: Subscriber> {
    core: Arc<SwitchCore<S>>,
    generation: usize,
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
        if !self.core.is_current(self.generation) {
            subscription.cancel();
            return;
        }
        self.core
            .relay
            .attach_requesting(self.generation, subscription, Demand::Unlimited);
        // A newer inner publisher may have arrived while this one attached.
        if !self.core.is_current(self.generation) {
            self.core.relay.cancel_upstream(self.generation);
        }
    }

    fn receive(&self, input: S::Input) -> Demand {
        if self.core.is_current(self.generation) {
            self.core.relay.push(input);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.core.relay.release(self.generation);
        let done = {
            let mut state = self.core.state.lock();
            if state.generation != self.generation {
                return;
            }
            state.inner_active = false;
            state.outer_done
        };
        match completion {
            Completion::Finished if done => self.core.relay.complete(Completion::Finished),
            Completion::Finished => {}
            failure => self.core.relay.complete(failure),
        }
    }
}
