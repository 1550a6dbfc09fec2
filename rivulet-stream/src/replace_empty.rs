// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::relay::{Forward, Relay};
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Extension trait providing the `replace_empty` operator for publishers.
pub trait ReplaceEmptyExt: Publisher + Sized {
    /// Emits `default` if the upstream finishes without emitting anything.
    ///
    /// A non-empty or failing upstream passes through untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{Empty, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = Empty::<i32>::new()
    ///     .replace_empty(-1)
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![-1]);
    /// ```
    fn replace_empty(self, default: Self::Output) -> ReplaceEmpty<Self>
    where
        Self::Output: Clone + Sync,
    {
        ReplaceEmpty {
            upstream: self,
            default,
        }
    }
}

impl<P: Publisher> ReplaceEmptyExt for P {}

/// Publisher returned by [`ReplaceEmptyExt::replace_empty`].
pub struct ReplaceEmpty<P: Publisher> {
    upstream: P,
    default: P::Output,
}

impl<P> Publisher for ReplaceEmpty<P>
where
    P: Publisher,
    P::Output: Clone + Sync,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        let relay = Relay::start(subscriber, Forward::Scaled(1));
        self.upstream.subscribe(ReplaceEmptySubscriber {
            relay,
            default: self.default.clone(),
            emitted: AtomicBool::new(false),
        });
    }
}

struct ReplaceEmptySubscriber<S: Subscriber> {
    relay: Arc<Relay<S>>,
    default: S::Input,
    emitted: AtomicBool,
}

impl<S> Subscriber for ReplaceEmptySubscriber<S>
where
    S: Subscriber,
    S::Input: Clone + Send + Sync + 'static,
    S::Failure: Send + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.relay.attach(0, subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.emitted.store(true, Ordering::Release);
        self.relay.push(input);
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.relay.release(0);
        if completion.is_finished() && !self.emitted.load(Ordering::Acquire) {
            self.relay.push(self.default.clone());
        }
        self.relay.complete(completion);
    }
}
