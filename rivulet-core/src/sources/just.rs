// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Completion, Demand, Publisher, Subscriber, Subscription};
use parking_lot::Mutex;
use rivulet_error::Never;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Emits a single value to each subscriber, then finishes.
///
/// Every subscriber receives its own clone of the value once it requests
/// demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Just<T> {
    value: T,
}

impl<T> Just<T> {
    /// Creates a publisher of `value`.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// The value this publisher emits.
    pub const fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Publisher for Just<T>
where
    T: Clone + Send + 'static,
{
    type Output = T;
    type Failure = Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = Never>,
    {
        let subscription = Arc::new(JustSubscription {
            subscriber,
            value: Mutex::new(Some(self.value.clone())),
            cancelled: AtomicBool::new(false),
        });
        subscription
            .subscriber
            .receive_subscription(Arc::clone(&subscription) as _);
    }
}

struct JustSubscription<S, T> {
    subscriber: S,
    value: Mutex<Option<T>>,
    cancelled: AtomicBool,
}

impl<S, T> Subscription for JustSubscription<S, T>
where
    S: Subscriber<Input = T, Failure = Never>,
    T: Send + 'static,
{
    fn request(&self, demand: Demand) {
        if demand.is_none() {
            return;
        }
        let value = self.value.lock().take();
        if let Some(value) = value {
            self.subscriber.receive(value);
            // The subscriber may cancel from inside `receive`.
            if !self.cancelled.load(Ordering::Acquire) {
                self.subscriber.receive_completion(Completion::Finished);
            }
        }
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.value.lock().take();
    }
}
