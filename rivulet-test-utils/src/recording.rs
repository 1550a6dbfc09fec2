// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A subscriber that records everything it receives.

use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Subscriber, SubscriptionRef};
use std::collections::VecDeque;
use std::sync::Arc;

/// One signal observed by a [`RecordingSubscriber`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T, E> {
    Subscribed,
    Value(T),
    Completion(Completion<E>),
}

/// Records subscription, values and completion, driving demand from a script.
///
/// On subscription it requests `initial` demand. After each value it returns
/// the next entry of the demand script, or `per_value` once the script is
/// exhausted. The subscription is kept so tests can request or cancel later.
///
/// ```
/// use rivulet_core::{Demand, IntoPublisher, Publisher};
/// use rivulet_test_utils::RecordingSubscriber;
/// use std::sync::Arc;
///
/// let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));
/// (1..=5).publisher().subscribe(Arc::clone(&recorder));
/// assert_eq!(recorder.values(), vec![1, 2]);
///
/// recorder.request(Demand::max(1));
/// assert_eq!(recorder.values(), vec![1, 2, 3]);
/// ```
pub struct RecordingSubscriber<T, E = rivulet_error::Never> {
    initial: Demand,
    per_value: Demand,
    script: Mutex<VecDeque<Demand>>,
    events: Mutex<Vec<Event<T, E>>>,
    subscription: Mutex<Option<SubscriptionRef>>,
    cancel_after: Option<usize>,
}

impl<T, E> RecordingSubscriber<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Requests `initial` on subscription and nothing more per value.
    pub fn with_demand(initial: Demand) -> Arc<Self> {
        Self::scripted(initial, Vec::new(), Demand::NONE)
    }

    /// Requests unlimited demand on subscription.
    pub fn unlimited() -> Arc<Self> {
        Self::with_demand(Demand::Unlimited)
    }

    /// Requests `initial`, then returns `per_value` after every value.
    pub fn with_demand_per_value(initial: Demand, per_value: Demand) -> Arc<Self> {
        Self::scripted(initial, Vec::new(), per_value)
    }

    /// Requests `initial`, then returns the script entries one per value,
    /// falling back to `per_value`.
    pub fn scripted(initial: Demand, script: Vec<Demand>, per_value: Demand) -> Arc<Self> {
        Arc::new(Self {
            initial,
            per_value,
            script: Mutex::new(script.into()),
            events: Mutex::new(Vec::new()),
            subscription: Mutex::new(None),
            cancel_after: None,
        })
    }

    /// Requests unlimited demand and cancels its own subscription from inside
    /// the callback that delivers the `count`-th value. With `count == 0` it
    /// cancels as soon as the subscription arrives.
    pub fn cancelling_after(count: usize) -> Arc<Self> {
        Arc::new(Self {
            initial: Demand::Unlimited,
            per_value: Demand::NONE,
            script: Mutex::new(VecDeque::new()),
            events: Mutex::new(Vec::new()),
            subscription: Mutex::new(None),
            cancel_after: Some(count),
        })
    }

    /// Every event so far, in order.
    pub fn events(&self) -> Vec<Event<T, E>> {
        self.events.lock().clone()
    }

    /// The values received so far.
    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Value(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// The completions received so far; a correct publisher sends at most one.
    pub fn completions(&self) -> Vec<Completion<E>> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Completion(completion) => Some(completion.clone()),
                _ => None,
            })
            .collect()
    }

    /// The first completion, if any.
    pub fn completion(&self) -> Option<Completion<E>> {
        self.completions().into_iter().next()
    }

    /// Returns `true` once a completion arrived.
    pub fn is_completed(&self) -> bool {
        self.events
            .lock()
            .iter()
            .any(|event| matches!(event, Event::Completion(_)))
    }

    /// Number of subscriptions received.
    pub fn subscription_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::Subscribed))
            .count()
    }

    /// Requests more demand through the stored subscription.
    pub fn request(&self, demand: Demand) {
        let subscription = self.subscription.lock().clone();
        if let Some(subscription) = subscription {
            subscription.request(demand);
        }
    }

    /// Cancels the stored subscription.
    pub fn cancel(&self) {
        let subscription = self.subscription.lock().clone();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

impl<T, E> Subscriber for RecordingSubscriber<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        *self.subscription.lock() = Some(Arc::clone(&subscription));
        self.events.lock().push(Event::Subscribed);
        if self.cancel_after == Some(0) {
            subscription.cancel();
            return;
        }
        subscription.request(self.initial);
    }

    fn receive(&self, input: T) -> Demand {
        let received = {
            let mut events = self.events.lock();
            events.push(Event::Value(input));
            events
                .iter()
                .filter(|event| matches!(event, Event::Value(_)))
                .count()
        };
        if self.cancel_after == Some(received) {
            self.cancel();
            return Demand::NONE;
        }
        self.script.lock().pop_front().unwrap_or(self.per_value)
    }

    fn receive_completion(&self, completion: Completion<E>) {
        self.events.lock().push(Event::Completion(completion));
    }
}
