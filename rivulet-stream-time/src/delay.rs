// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Delay operator for scheduled delivery.

use crate::logging::trace;
use core::pin::pin;
use core::time::Duration;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::future::{self, Either};
use futures::StreamExt;
use rivulet_core::{
    Completion, Demand, DemandBuffer, Publisher, Subscriber, Subscription, SubscriptionRef,
    UpstreamSubscriptions,
};
use rivulet_runtime::{CancellationToken, Runtime, Timer};
use std::sync::Arc;

type Instant<R> = <<R as Runtime>::Timer as Timer>::Instant;

fn until<T: Timer>(due: T::Instant, now: T::Instant) -> Duration {
    due - now
}

/// Extension trait providing the `delay` operator for publishers.
pub trait DelayExt: Publisher + Sized {
    /// Shifts every value and the completion `duration` later in time.
    ///
    /// Relative order is preserved: each signal is stamped on arrival and
    /// released by a single worker task on `runtime` once its due time has
    /// passed. Demand flows straight through, so the upstream is never asked
    /// for more than the downstream requested.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use rivulet_core::{IntoPublisher, SinkExt};
    /// use rivulet_runtime::TokioRuntime;
    /// use rivulet_stream_time::prelude::*;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let _handle = vec![1, 2, 3]
    ///     .publisher()
    ///     .delay(Duration::from_millis(100), TokioRuntime)
    ///     .sink_value(|n| println!("{n}"));
    /// tokio::time::sleep(Duration::from_millis(150)).await;
    /// # }
    /// ```
    fn delay<R: Runtime>(self, duration: Duration, runtime: R) -> Delay<Self, R> {
        Delay {
            upstream: self,
            duration,
            runtime,
        }
    }
}

impl<P: Publisher> DelayExt for P {}

/// Publisher returned by [`DelayExt::delay`].
#[derive(Debug, Clone)]
pub struct Delay<P, R> {
    upstream: P,
    duration: Duration,
    runtime: R,
}

impl<P, R> Publisher for Delay<P, R>
where
    P: Publisher,
    R: Runtime,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = P::Output, Failure = P::Failure>,
    {
        let upstreams = Arc::new(UpstreamSubscriptions::new());
        let token = CancellationToken::new();
        let shared = Arc::new(DelayShared {
            buffer: DemandBuffer::new(Downstream {
                inner: subscriber,
                upstreams: Arc::clone(&upstreams),
            }),
            upstreams,
            token: token.clone(),
        });
        shared
            .buffer
            .subscriber()
            .receive_subscription(Arc::clone(&shared) as SubscriptionRef);

        let (sender, mut receiver) =
            mpsc::unbounded::<Scheduled<Instant<R>, P::Output, P::Failure>>();
        let timer = self.runtime.timer();
        let worker_timer = timer.clone();
        let delivery = Arc::clone(&shared);
        self.runtime.spawn(async move {
            let release = async {
                while let Some(Scheduled { due, signal }) = receiver.next().await {
                    let now = worker_timer.now();
                    if due > now {
                        worker_timer.sleep_future(until::<R::Timer>(due, now)).await;
                    }
                    match signal {
                        Signal::Value(value) => {
                            delivery.buffer.push(value);
                        }
                        Signal::Completion(completion) => {
                            delivery.buffer.complete(completion);
                            break;
                        }
                    }
                }
            };
            let cancelled = token.cancelled();
            if let Either::Right(_) = future::select(pin!(release), pin!(cancelled)).await {
                trace!("delay: worker stopped by cancellation");
            }
        });

        self.upstream.subscribe(DelaySubscriber {
            shared,
            sender,
            timer,
            duration: self.duration,
        });
    }
}

struct Scheduled<I, T, E> {
    due: I,
    signal: Signal<T, E>,
}

enum Signal<T, E> {
    Value(T),
    Completion(Completion<E>),
}

// Demand the downstream hands back after a value goes to the upstream too.
struct Downstream<S> {
    inner: S,
    upstreams: Arc<UpstreamSubscriptions>,
}

impl<S: Subscriber> Subscriber for Downstream<S> {
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.inner.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        let additional = self.inner.receive(input);
        if additional.has_capacity() {
            self.upstreams.request(0, additional);
        }
        additional
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.inner.receive_completion(completion);
    }
}

struct DelayShared<S: Subscriber> {
    buffer: DemandBuffer<Downstream<S>>,
    upstreams: Arc<UpstreamSubscriptions>,
    token: CancellationToken,
}

impl<S: Subscriber> Subscription for DelayShared<S>
where
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    fn request(&self, demand: Demand) {
        if demand.is_none() || self.buffer.is_closed() {
            return;
        }
        self.buffer.request(demand);
        self.upstreams.request(0, demand);
    }

    fn cancel(&self) {
        self.buffer.cancel();
        self.upstreams.cancel_all();
        self.token.cancel();
    }
}

struct DelaySubscriber<S: Subscriber, Tm: Timer> {
    shared: Arc<DelayShared<S>>,
    sender: UnboundedSender<Scheduled<Tm::Instant, S::Input, S::Failure>>,
    timer: Tm,
    duration: Duration,
}

impl<S: Subscriber, Tm: Timer> DelaySubscriber<S, Tm> {
    fn schedule(&self, signal: Signal<S::Input, S::Failure>) {
        let due = self.timer.now() + self.duration;
        // The worker is gone once the subscription was cancelled.
        let _ = self.sender.unbounded_send(Scheduled { due, signal });
    }
}

impl<S, Tm> Subscriber for DelaySubscriber<S, Tm>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
    Tm: Timer,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        if !self.shared.upstreams.set(0, subscription) {
            return;
        }
        let outstanding = self.shared.buffer.demand();
        if outstanding.has_capacity() {
            self.shared.upstreams.request(0, outstanding);
        }
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.schedule(Signal::Value(input));
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.shared.upstreams.release(0);
        self.schedule(Signal::Completion(completion));
    }
}
