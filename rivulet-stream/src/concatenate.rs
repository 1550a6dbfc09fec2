// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use crate::serial::Serial;
use rivulet_core::{Completion, Demand, Publisher, Sequence, Subscriber, SubscriptionRef};
use std::sync::Arc;

/// Extension trait providing the `append` operators for publishers.
pub trait AppendExt: Publisher + Sized {
    /// Emits every value of `self`, then every value of `next`.
    ///
    /// `next` is subscribed only once `self` finished, and only pulls as
    /// much as the downstream still wants. A failure of `self` ends the
    /// output without subscribing `next`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = vec![1, 2]
    ///     .publisher()
    ///     .append(vec![3].publisher())
    ///     .append_values(vec![4, 5])
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    /// ```
    fn append<Q>(self, next: Q) -> Concatenate<Self, Q>
    where
        Q: Publisher<Output = Self::Output, Failure = Self::Failure> + Send + Sync + 'static,
    {
        Concatenate::new(self, next)
    }

    /// Emits every value of `self`, then the items of `values`.
    fn append_values<I>(self, values: I) -> Concatenate<Self, Sequence<I, Self::Failure>>
    where
        I: IntoIterator<Item = Self::Output> + Clone + Send + Sync + 'static,
        I::IntoIter: Send + 'static,
    {
        Concatenate::new(self, Sequence::new(values))
    }
}

impl<P: Publisher> AppendExt for P {}

/// Extension trait providing the `prepend` operators for publishers.
pub trait PrependExt: Publisher + Sized + Send + Sync + 'static {
    /// Emits every value of `first`, then every value of `self`.
    ///
    /// `self` is subscribed only once `first` finished.
    fn prepend<Q>(self, first: Q) -> Concatenate<Q, Self>
    where
        Q: Publisher<Output = Self::Output, Failure = Self::Failure>,
    {
        Concatenate::new(first, self)
    }

    /// Emits the items of `values`, then every value of `self`.
    ///
    /// Items are produced only against downstream demand, so nothing is
    /// emitted before the first request.
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _ = vec![3, 4]
    ///     .publisher()
    ///     .prepend_values(vec![1, 2])
    ///     .sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    /// ```
    fn prepend_values<I>(self, values: I) -> Concatenate<Sequence<I, Self::Failure>, Self>
    where
        I: IntoIterator<Item = Self::Output> + Clone,
        I::IntoIter: Send + 'static,
    {
        Concatenate::new(Sequence::new(values), self)
    }
}

impl<P> PrependExt for P where P: Publisher + Send + Sync + 'static {}

/// Publisher returned by the [`AppendExt`] and [`PrependExt`] operators.
pub struct Concatenate<A, B> {
    first: A,
    second: Arc<B>,
}

impl<A, B> Concatenate<A, B> {
    fn new(first: A, second: B) -> Self {
        Self {
            first,
            second: Arc::new(second),
        }
    }
}

impl<A, B> Publisher for Concatenate<A, B>
where
    A: Publisher,
    B: Publisher<Output = A::Output, Failure = A::Failure> + Send + Sync + 'static,
{
    type Output = A::Output;
    type Failure = A::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = A::Output, Failure = A::Failure>,
    {
        self.first.subscribe(Segment {
            serial: Serial::start(subscriber),
            next: Some(Arc::clone(&self.second)),
        });
    }
}

struct Segment<S, B> {
    serial: Arc<Serial<S>>,
    // `None` for the second segment.
    next: Option<Arc<B>>,
}

impl<S, B> Subscriber for Segment<S, B>
where
    S: Subscriber,
    B: Publisher<Output = S::Input, Failure = S::Failure> + Send + Sync + 'static,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.serial.attach(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.serial.deliver(input)
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        match (completion, &self.next) {
            (Completion::Finished, Some(next)) => {
                if !self.serial.detach() {
                    return;
                }
                trace!("concatenate: first segment finished, subscribing next");
                next.subscribe(Segment::<S, B> {
                    serial: Arc::clone(&self.serial),
                    next: None,
                });
            }
            (completion, _) => self.serial.finish(completion),
        }
    }
}
