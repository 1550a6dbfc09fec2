// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A connectable periodic source.

use crate::logging::{debug, trace};
use core::pin::pin;
use core::time::Duration;
use parking_lot::Mutex;
use rivulet_core::{AnyCancellable, PassthroughSubject, Publisher, Subscriber};
use rivulet_runtime::{CancellationToken, Runtime, Timer};
use std::sync::Arc;

type Instant<R> = <<R as Runtime>::Timer as Timer>::Instant;

/// Emits the current instant every `interval`, once connected.
///
/// The publisher is hot: subscribers share one clock and only see ticks
/// fired while they are attached and have demand. Nothing ticks until
/// [`connect`](Self::connect) is called; [`autoconnect`](Self::autoconnect)
/// connects on the first subscription instead.
///
/// # Example
///
/// ```rust,no_run
/// use rivulet_core::SinkExt;
/// use rivulet_runtime::TokioRuntime;
/// use rivulet_stream_time::TimerPublisher;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let ticks = TimerPublisher::new(Duration::from_millis(10), TokioRuntime);
/// let _listener = ticks.sink_value(|instant| println!("tick at {instant:?}"));
/// let connection = ticks.connect();
///
/// tokio::time::sleep(Duration::from_millis(35)).await;
/// connection.cancel();
/// # }
/// ```
pub struct TimerPublisher<R: Runtime> {
    interval: Duration,
    runtime: R,
    subject: PassthroughSubject<Instant<R>>,
    connection: Arc<Mutex<Option<AnyCancellable>>>,
}

impl<R: Runtime> TimerPublisher<R> {
    /// A timer ticking every `interval` on `runtime`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(interval: Duration, runtime: R) -> Self {
        assert!(!interval.is_zero(), "timer: interval must be non-zero");
        Self {
            interval,
            runtime,
            subject: PassthroughSubject::new(),
            connection: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts ticking and returns the handle that stops it.
    ///
    /// Connecting an already connected timer returns the running
    /// connection. Once cancelled the timer can be connected again.
    pub fn connect(&self) -> AnyCancellable {
        let mut connection = self.connection.lock();
        if let Some(running) = connection.as_ref().filter(|c| !c.is_cancelled()) {
            return running.clone();
        }

        let token = CancellationToken::new();
        let timer = self.runtime.timer();
        let subject = self.subject.clone();
        let interval = self.interval;
        let stop = token.clone();
        self.runtime.spawn(async move {
            let ticks = async {
                loop {
                    timer.sleep_future(interval).await;
                    trace!("timer: tick");
                    if subject.send(timer.now()).is_err() {
                        break;
                    }
                }
            };
            let cancelled = stop.cancelled();
            futures::future::select(pin!(ticks), pin!(cancelled)).await;
        });
        debug!("timer: connected with interval {:?}", interval);

        let handle = AnyCancellable::new(move || {
            token.cancel();
        });
        *connection = Some(handle.clone());
        handle
    }

    /// Returns `true` while a connection is running.
    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .as_ref()
            .is_some_and(|c| !c.is_cancelled())
    }

    /// A publisher that connects this timer when first subscribed.
    pub fn autoconnect(self) -> Autoconnect<R> {
        Autoconnect {
            timer: Arc::new(self),
        }
    }
}

impl<R: Runtime> Clone for TimerPublisher<R> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            runtime: self.runtime.clone(),
            subject: self.subject.clone(),
            connection: Arc::clone(&self.connection),
        }
    }
}

impl<R: Runtime> Publisher for TimerPublisher<R> {
    type Output = Instant<R>;
    type Failure = rivulet_core::Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        self.subject.subscribe(subscriber);
    }
}

/// Publisher returned by [`TimerPublisher::autoconnect`].
///
/// The first subscription starts the clock; it keeps running for later
/// subscribers until [`disconnect`](Self::disconnect) is called.
pub struct Autoconnect<R: Runtime> {
    timer: Arc<TimerPublisher<R>>,
}

impl<R: Runtime> Autoconnect<R> {
    /// Stops the shared clock. The next subscription restarts it.
    pub fn disconnect(&self) {
        let connection = self.timer.connection.lock().take();
        if let Some(connection) = connection {
            connection.cancel();
        }
    }
}

impl<R: Runtime> Clone for Autoconnect<R> {
    fn clone(&self) -> Self {
        Self {
            timer: Arc::clone(&self.timer),
        }
    }
}

impl<R: Runtime> Publisher for Autoconnect<R> {
    type Output = Instant<R>;
    type Failure = rivulet_core::Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        self.timer.subscribe(subscriber);
        // Reuses the running connection; the timer keeps the handle.
        let _ = self.timer.connect();
    }
}
