// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, Publisher, Subscriber, Subscription, SubscriptionRef};
use std::sync::Arc;

type Tap = Arc<dyn Fn() + Send + Sync>;
type ValueTap<T> = Arc<dyn Fn(&T) + Send + Sync>;
type CompletionTap<E> = Arc<dyn Fn(&Completion<E>) + Send + Sync>;
type DemandTap = Arc<dyn Fn(Demand) + Send + Sync>;

/// Side-effect callbacks for [`HandleEventsExt::handle_events`].
///
/// Every callback is optional and runs before the signal is passed on.
pub struct EventHandlers<T, E> {
    on_subscription: Option<Tap>,
    on_output: Option<ValueTap<T>>,
    on_completion: Option<CompletionTap<E>>,
    on_cancel: Option<Tap>,
    on_request: Option<DemandTap>,
}

impl<T, E> Default for EventHandlers<T, E> {
    fn default() -> Self {
        Self {
            on_subscription: None,
            on_output: None,
            on_completion: None,
            on_cancel: None,
            on_request: None,
        }
    }
}

impl<T, E> Clone for EventHandlers<T, E> {
    fn clone(&self) -> Self {
        Self {
            on_subscription: self.on_subscription.clone(),
            on_output: self.on_output.clone(),
            on_completion: self.on_completion.clone(),
            on_cancel: self.on_cancel.clone(),
            on_request: self.on_request.clone(),
        }
    }
}

impl<T, E> EventHandlers<T, E> {
    /// No callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs when the upstream hands out its subscription.
    #[must_use]
    pub fn on_subscription(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_subscription = Some(Arc::new(f));
        self
    }

    /// Runs for every value.
    #[must_use]
    pub fn on_output(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_output = Some(Arc::new(f));
        self
    }

    /// Runs for the completion.
    #[must_use]
    pub fn on_completion(mut self, f: impl Fn(&Completion<E>) + Send + Sync + 'static) -> Self {
        self.on_completion = Some(Arc::new(f));
        self
    }

    /// Runs when the downstream cancels.
    #[must_use]
    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }

    /// Runs for every demand request from the downstream.
    #[must_use]
    pub fn on_request(mut self, f: impl Fn(Demand) + Send + Sync + 'static) -> Self {
        self.on_request = Some(Arc::new(f));
        self
    }
}

/// Extension trait providing the `handle_events` operator for publishers.
pub trait HandleEventsExt: Publisher + Sized {
    /// Observes every protocol signal without changing the stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// let (outputs, completions) = (Arc::clone(&log), Arc::clone(&log));
    /// let _ = vec![1, 2]
    ///     .publisher()
    ///     .handle_events(
    ///         EventHandlers::new()
    ///             .on_output(move |n| outputs.lock().unwrap().push(format!("value {n}")))
    ///             .on_completion(move |_| completions.lock().unwrap().push("done".to_string())),
    ///     )
    ///     .sink_value(|_| {});
    ///
    /// assert_eq!(*log.lock().unwrap(), vec!["value 1", "value 2", "done"]);
    /// ```
    fn handle_events(
        self,
        handlers: EventHandlers<Self::Output, Self::Failure>,
    ) -> HandleEvents<Self> {
        HandleEvents {
            upstream: self,
            handlers,
        }
    }
}

impl<P: Publisher> HandleEventsExt for P {}

/// Publisher returned by [`HandleEventsExt::handle_events`].
pub struct HandleEvents<P: Publisher> {
    upstream: P,
    handlers: EventHandlers<P::Output, P::Failure>,
}

impl<P: Publisher> Publisher for HandleEvents<P> {
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        self.upstream.subscribe(HandleEventsSubscriber {
            downstream: subscriber,
            handlers: self.handlers.clone(),
        });
    }
}

struct HandleEventsSubscriber<S: Subscriber> {
    downstream: S,
    handlers: EventHandlers<S::Input, S::Failure>,
}

impl<S> Subscriber for HandleEventsSubscriber<S>
where
    S: Subscriber,
    S::Input: 'static,
    S::Failure: 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        if let Some(tap) = &self.handlers.on_subscription {
            tap();
        }
        let tapped = Arc::new(TappedSubscription {
            upstream: subscription,
            on_cancel: self.handlers.on_cancel.clone(),
            on_request: self.handlers.on_request.clone(),
        });
        self.downstream.receive_subscription(tapped);
    }

    fn receive(&self, input: S::Input) -> Demand {
        if let Some(tap) = &self.handlers.on_output {
            tap(&input);
        }
        self.downstream.receive(input)
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        if let Some(tap) = &self.handlers.on_completion {
            tap(&completion);
        }
        self.downstream.receive_completion(completion);
    }
}

struct TappedSubscription {
    upstream: SubscriptionRef,
    on_cancel: Option<Tap>,
    on_request: Option<DemandTap>,
}

impl Subscription for TappedSubscription {
    fn request(&self, demand: Demand) {
        if let Some(tap) = &self.on_request {
            tap(demand);
        }
        self.upstream.request(demand);
    }

    fn cancel(&self) {
        if let Some(tap) = &self.on_cancel {
            tap();
        }
        self.upstream.cancel();
    }
}
