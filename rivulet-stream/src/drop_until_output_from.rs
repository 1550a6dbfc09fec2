// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::relay::{Forward, Relay};
use crate::trigger::{Gate, TriggerSubscriber, MAIN};
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Extension trait providing the `drop_until_output_from` operator.
pub trait DropUntilOutputFromExt: Publisher + Sized {
    /// Skips values until `trigger` emits its first value.
    ///
    /// If the trigger completes without emitting, every value is skipped and
    /// only the upstream's completion is forwarded.
    fn drop_until_output_from<G>(self, trigger: G) -> DropUntilOutputFrom<Self, G>
    where
        G: Publisher,
    {
        DropUntilOutputFrom {
            upstream: self,
            trigger,
        }
    }
}

impl<P: Publisher> DropUntilOutputFromExt for P {}

/// Publisher returned by [`DropUntilOutputFromExt::drop_until_output_from`].
pub struct DropUntilOutputFrom<P, G> {
    upstream: P,
    trigger: G,
}

impl<P, G> Publisher for DropUntilOutputFrom<P, G>
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
        let open = Arc::new(AtomicBool::new(false));
        self.trigger.subscribe(TriggerSubscriber::<S, G::Output, G::Failure>::new(
            Arc::clone(&relay),
            Gate::Open(Arc::clone(&open)),
        ));
        self.upstream.subscribe(MainSubscriber { relay, open });
    }
}

struct MainSubscriber<S: Subscriber> {
    relay: Arc<Relay<S>>,
    open: Arc<AtomicBool>,
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
        if self.open.load(Ordering::Acquire) {
            self.relay.push(input);
            Demand::NONE
        } else {
            Demand::max(1)
        }
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.relay.release(MAIN);
        self.relay.complete(completion);
    }
}
