// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Completion, Demand, EmptySubscription, Publisher, Subscriber, Subscription};
use rivulet_error::Never;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A publisher that never emits a value.
///
/// By default it finishes as soon as it is subscribed; [`Empty::never`] builds
/// one that stays silent forever.
pub struct Empty<T, E = Never> {
    complete_immediately: bool,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> Empty<T, E> {
    /// An empty publisher that finishes immediately.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            complete_immediately: true,
            _marker: PhantomData,
        }
    }

    /// An empty publisher that never completes.
    #[must_use]
    pub const fn never() -> Self {
        Self {
            complete_immediately: false,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if subscribers receive `Finished` right away.
    pub const fn completes_immediately(&self) -> bool {
        self.complete_immediately
    }
}

impl<T, E> Default for Empty<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Empty<T, E> {
    fn clone(&self) -> Self {
        Self {
            complete_immediately: self.complete_immediately,
            _marker: PhantomData,
        }
    }
}

impl<T, E> fmt::Debug for Empty<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Empty")
            .field("complete_immediately", &self.complete_immediately)
            .finish()
    }
}

impl<T, E> Publisher for Empty<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        if !self.complete_immediately {
            subscriber.receive_subscription(EmptySubscription::shared());
            return;
        }
        if ImmediateSubscription::hand_to(&subscriber) {
            subscriber.receive_completion(Completion::Finished);
        }
    }
}

/// A publisher that immediately terminates with a failure.
pub struct Fail<T, E> {
    error: E,
    _marker: PhantomData<fn() -> T>,
}

impl<T, E> Fail<T, E> {
    /// Creates a publisher failing with `error`.
    pub const fn new(error: E) -> Self {
        Self {
            error,
            _marker: PhantomData,
        }
    }
}

impl<T, E: Clone> Clone for Fail<T, E> {
    fn clone(&self) -> Self {
        Self::new(self.error.clone())
    }
}

impl<T, E: fmt::Debug> fmt::Debug for Fail<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fail").field(&self.error).finish()
    }
}

impl<T, E> Publisher for Fail<T, E>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        if ImmediateSubscription::hand_to(&subscriber) {
            subscriber.receive_completion(Completion::Failure(self.error.clone()));
        }
    }
}

// Lets a subscriber cancel from `receive_subscription` before the
// immediate terminal signal.
#[derive(Default)]
struct ImmediateSubscription {
    cancelled: AtomicBool,
}

impl ImmediateSubscription {
    /// Returns `true` if the subscriber is still attached afterwards.
    fn hand_to<S: Subscriber>(subscriber: &S) -> bool {
        let subscription = Arc::new(Self::default());
        subscriber.receive_subscription(Arc::clone(&subscription) as _);
        !subscription.cancelled.load(Ordering::Acquire)
    }
}

impl Subscription for ImmediateSubscription {
    fn request(&self, _demand: Demand) {}

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
