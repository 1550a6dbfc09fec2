// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{
    Completion, Demand, DemandBuffer, Subscriber, Subscription, SubscriptionRef,
    UpstreamSubscriptions,
};
use std::sync::Arc;

/// How downstream demand reaches the upstreams of a buffered stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Forward {
    /// Upstreams are opened with unlimited demand up front.
    Unlimited,
    /// Every downstream request is forwarded, multiplied by the factor.
    Scaled(usize),
}

/// Serialized downstream delivery plus the upstream subscriptions feeding it.
///
/// Handed to the downstream as its subscription: requests feed the buffer
/// and, depending on [`Forward`], the upstreams; cancellation stops both.
pub(crate) struct Relay<S: Subscriber> {
    buffer: DemandBuffer<Downstream<S>>,
    upstreams: Arc<UpstreamSubscriptions>,
    forward: Forward,
}

// Demand returned by the downstream after a value has to reach the upstreams
// as well, not only the buffer.
struct Downstream<S> {
    inner: S,
    upstreams: Arc<UpstreamSubscriptions>,
    forward: Forward,
}

impl<S: Subscriber> Subscriber for Downstream<S> {
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.inner.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        let additional = self.inner.receive(input);
        if let Forward::Scaled(factor) = self.forward {
            if additional.has_capacity() {
                self.upstreams.request_all(additional.saturating_mul(factor));
            }
        }
        additional
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.inner.receive_completion(completion);
    }
}

impl<S: Subscriber> Relay<S>
where
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    /// Creates the relay and hands it to `downstream` as its subscription.
    pub(crate) fn start(downstream: S, forward: Forward) -> Arc<Self> {
        let upstreams = Arc::new(UpstreamSubscriptions::new());
        let relay = Arc::new(Self {
            buffer: DemandBuffer::new(Downstream {
                inner: downstream,
                upstreams: Arc::clone(&upstreams),
                forward,
            }),
            upstreams,
            forward,
        });
        relay
            .buffer
            .subscriber()
            .receive_subscription(Arc::clone(&relay) as SubscriptionRef);
        relay
    }

    /// Registers the upstream subscription for lane `index`.
    pub(crate) fn attach(&self, index: usize, subscription: SubscriptionRef) {
        if !self.upstreams.set(index, subscription) {
            return;
        }
        match self.forward {
            Forward::Unlimited => self.upstreams.request(index, Demand::Unlimited),
            Forward::Scaled(factor) => {
                let outstanding = self.buffer.demand();
                if outstanding.has_capacity() {
                    self.upstreams.request(index, outstanding.saturating_mul(factor));
                }
            }
        }
    }

    /// Registers the upstream subscription for lane `index` and asks it for
    /// `demand`, whatever the forwarding mode.
    pub(crate) fn attach_requesting(
        &self,
        index: usize,
        subscription: SubscriptionRef,
        demand: Demand,
    ) {
        if self.upstreams.set(index, subscription) && demand.has_capacity() {
            self.upstreams.request(index, demand);
        }
    }

    /// Queues a value for the downstream. Returns `false` once the relay
    /// is closed.
    pub(crate) fn push(&self, value: S::Input) -> bool {
        self.buffer.push(value)
    }

    /// Delivers the terminal signal and releases every upstream.
    pub(crate) fn complete(&self, completion: Completion<S::Failure>) {
        self.upstreams.cancel_all();
        self.buffer.complete(completion);
    }

    /// Asks lane `index` for `demand` more values.
    pub(crate) fn request_upstream(&self, index: usize, demand: Demand) {
        self.upstreams.request(index, demand);
    }

    /// Forgets lane `index` after it delivered its terminal signal.
    pub(crate) fn release(&self, index: usize) {
        self.upstreams.release(index);
    }

    /// Cancels lane `index` only.
    pub(crate) fn cancel_upstream(&self, index: usize) {
        self.upstreams.cancel(index);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.buffer.is_closed()
    }
}

impl<S: Subscriber> Subscription for Relay<S>
where
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    fn request(&self, demand: Demand) {
        self.buffer.request(demand);
        if demand.is_none() || self.buffer.is_closed() {
            return;
        }
        if let Forward::Scaled(factor) = self.forward {
            self.upstreams.request_all(demand.saturating_mul(factor));
        }
    }

    fn cancel(&self) {
        self.buffer.cancel();
        self.upstreams.cancel_all();
    }
}
