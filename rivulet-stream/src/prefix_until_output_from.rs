// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::relay::{Forward, Relay};
use crate::trigger::{Gate, TriggerSubscriber, MAIN};
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::Arc;

/// Extension trait providing the `prefix_until_output_from` operator.
pub trait PrefixUntilOutputFromExt: Publisher + Sized {
    /// Forwards values until `trigger` emits its first value, then cancels
    /// the upstream and finishes.
    ///
    /// The trigger may have any output and failure type. Its completion,
    /// without a value, does not affect the output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{PassthroughSubject, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let values = PassthroughSubject::<i32>::new();
    /// let stop = PassthroughSubject::<()>::new();
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _handle = values
    ///     .clone()
    ///     .prefix_until_output_from(stop.clone())
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// values.send(1).unwrap();
    /// stop.send(()).unwrap();
    /// values.send(2).unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1]);
    /// ```
    fn prefix_until_output_from<G>(self, trigger: G) -> PrefixUntilOutputFrom<Self, G>
    where
        G: Publisher,
    {
        PrefixUntilOutputFrom {
            upstream: self,
            trigger,
        }
    }
}

impl<P: Publisher> PrefixUntilOutputFromExt for P {}

/// Publisher returned by [`PrefixUntilOutputFromExt::prefix_until_output_from`].
pub struct PrefixUntilOutputFrom<P, G> {
    upstream: P,
    trigger: G,
}

impl<P, G> Publisher for PrefixUntilOutputFrom<P, G>
where
    P: Publisher,
    G: Publisher,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        let relay = Relay::start(subscriber, Forward::Scaled(1));
        self.trigger.subscribe(TriggerSubscriber::<S, G::Output, G::Failure>::new(
            Arc::clone(&relay),
            Gate::Close,
        ));
        if relay.is_closed() {
            return;
        }
        self.upstream.subscribe(MainSubscriber { relay });
    }
}

struct MainSubscriber<S: Subscriber> {
    relay: Arc<Relay<S>>,
}

impl<S> Subscriber for MainSubscriber<S>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.relay.attach(MAIN, subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.relay.push(input);
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.relay.release(MAIN);
        self.relay.complete(completion);
    }
}
