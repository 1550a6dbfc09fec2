// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Closure-based terminal subscriber.

use crate::logging::debug;
use crate::{
    AnyCancellable, Cancellable, Completion, Demand, Publisher, Subscriber, SubscriptionRef,
};
use parking_lot::Mutex;
use rivulet_error::Never;
use std::marker::PhantomData;
use std::sync::Arc;

type ValueHandler<T> = Box<dyn Fn(T) + Send + Sync>;
type CompletionHandler<E> = Box<dyn FnOnce(Completion<E>) + Send>;

struct SinkState<E> {
    subscription: Option<SubscriptionRef>,
    receive_completion: Option<CompletionHandler<E>>,
    done: bool,
}

/// A subscriber that requests unlimited demand and forwards every signal to
/// a pair of closures.
///
/// The subscription is released as soon as the terminal signal arrives or the
/// sink is cancelled.
pub struct Sink<T, E> {
    receive_value: ValueHandler<T>,
    state: Mutex<SinkState<E>>,
    _marker: PhantomData<fn(T)>,
}

impl<T, E> Sink<T, E> {
    /// Creates a sink from a completion and a value closure.
    pub fn new<C, V>(receive_completion: C, receive_value: V) -> Self
    where
        C: FnOnce(Completion<E>) + Send + 'static,
        V: Fn(T) + Send + Sync + 'static,
    {
        Self {
            receive_value: Box::new(receive_value),
            state: Mutex::new(SinkState {
                subscription: None,
                receive_completion: Some(Box::new(receive_completion)),
                done: false,
            }),
            _marker: PhantomData,
        }
    }
}

impl<T, E> Subscriber for Sink<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut state = self.state.lock();
            if !state.done && state.subscription.is_none() {
                state.subscription = Some(Arc::clone(&subscription));
                drop(state);
                subscription.request(Demand::Unlimited);
                return;
            }
        }
        debug!("sink: rejecting extra or late subscription");
        subscription.cancel();
    }

    fn receive(&self, input: T) -> Demand {
        if !self.state.lock().done {
            (self.receive_value)(input);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let handler = {
            let mut state = self.state.lock();
            if state.done {
                return;
            }
            state.done = true;
            state.subscription = None;
            state.receive_completion.take()
        };
        if let Some(handler) = handler {
            handler(completion);
        }
    }
}

impl<T, E> Cancellable for Sink<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn cancel(&self) {
        let subscription = {
            let mut state = self.state.lock();
            state.done = true;
            state.receive_completion = None;
            state.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

/// Extension trait attaching closure sinks to any publisher.
pub trait SinkExt: Publisher {
    /// Subscribes with unlimited demand, routing values and the completion
    /// into the given closures.
    ///
    /// # Examples
    ///
    /// ```
    /// use rivulet_core::{Completion, Just, SinkExt};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// let just = Just::new("Hello World!");
    ///
    /// // Just replays its value to every subscriber.
    /// for _ in 0..2 {
    ///     let values = Arc::clone(&log);
    ///     let completions = Arc::clone(&log);
    ///     let _ = just.sink(
    ///         move |completion| completions.lock().unwrap().push(format!("{completion:?}")),
    ///         move |value| values.lock().unwrap().push(value.to_string()),
    ///     );
    /// }
    ///
    /// assert_eq!(
    ///     *log.lock().unwrap(),
    ///     vec!["Hello World!", "Finished", "Hello World!", "Finished"]
    /// );
    /// ```
    fn sink<C, V>(&self, receive_completion: C, receive_value: V) -> AnyCancellable
    where
        C: FnOnce(Completion<Self::Failure>) + Send + 'static,
        V: Fn(Self::Output) + Send + Sync + 'static,
    {
        let sink = Arc::new(Sink::new(receive_completion, receive_value));
        self.subscribe(Arc::clone(&sink));
        AnyCancellable::from_cancellable(sink)
    }

    /// Subscribes an infallible publisher with a value closure only.
    fn sink_value<V>(&self, receive_value: V) -> AnyCancellable
    where
        Self: Publisher<Failure = Never>,
        V: Fn(Self::Output) + Send + Sync + 'static,
    {
        self.sink(|_| {}, receive_value)
    }
}

impl<P: Publisher + ?Sized> SinkExt for P {}
