// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::debug;
use crate::upstream_slot::UpstreamSlot;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Extension trait providing the `try_map` operator for publishers.
pub trait TryMapExt: Publisher + Sized {
    /// Transforms every value with a fallible `transform`.
    ///
    /// The first `Err` becomes the stream's failure: the upstream is
    /// cancelled and nothing else is delivered. The output failure type `E`
    /// must be reachable from the upstream one through `Into`, which covers
    /// the identity and infallible upstreams with `RivuletError`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{Completion, IntoPublisher, RivuletError, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let (values, completions) = (Arc::clone(&seen), Arc::clone(&seen));
    /// let _ = vec!["1", "2", "x", "4"]
    ///     .publisher()
    ///     .try_map(|s| {
    ///         s.parse::<i32>()
    ///             .map_err(|_| RivuletError::stream_error(format!("bad input {s}")))
    ///     })
    ///     .sink(
    ///         move |c| completions.lock().unwrap().push(format!("{c:?}")),
    ///         move |v| values.lock().unwrap().push(v.to_string()),
    ///     );
    ///
    /// let seen = seen.lock().unwrap();
    /// assert_eq!(seen[..2], ["1", "2"]);
    /// assert!(seen[2].starts_with("Failure"));
    /// assert_eq!(seen.len(), 3);
    /// ```
    fn try_map<U, E, F>(self, transform: F) -> TryMap<Self, F, E>
    where
        F: Fn(Self::Output) -> Result<U, E> + Send + Sync + 'static,
        U: Send + 'static,
        E: Send + 'static,
        Self::Failure: Into<E>,
    {
        TryMap {
            upstream: self,
            transform: Arc::new(transform),
            _marker: PhantomData,
        }
    }
}

impl<P: Publisher> TryMapExt for P {}

/// Publisher returned by [`TryMapExt::try_map`].
pub struct TryMap<P, F, E> {
    upstream: P,
    transform: Arc<F>,
    _marker: PhantomData<fn() -> E>,
}

impl<P, F, U, E> Publisher for TryMap<P, F, E>
where
    P: Publisher,
    P::Failure: Into<E>,
    F: Fn(P::Output) -> Result<U, E> + Send + Sync + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    type Output = U;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U, Failure = E>,
    {
        self.upstream.subscribe(TryMapSubscriber {
            downstream: subscriber,
            transform: Arc::clone(&self.transform),
            upstream: UpstreamSlot::new(),
            _marker: PhantomData,
        });
    }
}

struct TryMapSubscriber<S, F, T, E0> {
    downstream: S,
    transform: Arc<F>,
    upstream: Arc<UpstreamSlot>,
    _marker: PhantomData<fn(T, E0)>,
}

impl<S, F, T, E0> Subscriber for TryMapSubscriber<S, F, T, E0>
where
    S: Subscriber,
    F: Fn(T) -> Result<S::Input, S::Failure> + Send + Sync + 'static,
    E0: Into<S::Failure> + 'static,
    T: 'static,
{
    type Input = T;
    type Failure = E0;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        let handle = self.upstream.attach(subscription);
        self.downstream.receive_subscription(handle);
    }

    fn receive(&self, input: T) -> Demand {
        if self.upstream.is_done() {
            return Demand::NONE;
        }
        match (self.transform)(input) {
            Ok(value) => self.downstream.receive(value),
            Err(error) => {
                if self.upstream.terminate() {
                    debug!("try_map: transform failed, terminating stream");
                    self.downstream.receive_completion(Completion::Failure(error));
                }
                Demand::NONE
            }
        }
    }

    fn receive_completion(&self, completion: Completion<E0>) {
        if self.upstream.finish() {
            self.downstream
                .receive_completion(completion.map_failure(Into::into));
        }
    }
}
