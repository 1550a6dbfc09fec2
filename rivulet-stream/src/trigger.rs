// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::debug;
use crate::relay::Relay;
use rivulet_core::{Completion, Demand, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) const MAIN: usize = 0;
pub(crate) const TRIGGER: usize = 1;

/// What the first trigger value does to the stage.
pub(crate) enum Gate {
    /// Finish the output.
    Close,
    /// Start forwarding main values.
    Open(Arc<AtomicBool>),
}

/// Subscriber for the companion publisher of the `..._until_output_from`
/// operators.
///
/// Only the first value counts. The trigger's own completion, successful or
/// not, leaves the main stream alone.
pub(crate) struct TriggerSubscriber<S: Subscriber, T, E> {
    relay: Arc<Relay<S>>,
    gate: Gate,
    _marker: PhantomData<fn(T, E)>,
}

impl<S: Subscriber, T, E> TriggerSubscriber<S, T, E> {
    pub(crate) fn new(relay: Arc<Relay<S>>, gate: Gate) -> Self {
        Self {
            relay,
            gate,
            _marker: PhantomData,
        }
    }
}

impl<S, T, E> Subscriber for TriggerSubscriber<S, T, E>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
    T: 'static,
    E: 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.relay
            .attach_requesting(TRIGGER, subscription, Demand::max(1));
    }

    fn receive(&self, _input: T) -> Demand {
        match &self.gate {
            Gate::Close => {
                debug!("trigger fired, finishing output");
                self.relay.complete(Completion::Finished);
            }
            Gate::Open(open) => {
                debug!("trigger fired, forwarding from now on");
                open.store(true, Ordering::Release);
                self.relay.cancel_upstream(TRIGGER);
            }
        }
        Demand::NONE
    }

    fn receive_completion(&self, _completion: Completion<E>) {
        self.relay.release(TRIGGER);
    }
}
