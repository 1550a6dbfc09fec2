// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Feeding external async sources into a hot publisher.

use crate::logging::{debug, trace};
use core::pin::pin;
use futures::future::{self, Either};
use futures::{Stream, StreamExt};
use rivulet_core::{
    AnyCancellable, Completion, Never, PassthroughSubject, Publisher, Subscriber,
};
use rivulet_runtime::{CancellationToken, Runtime};

/// A hot publisher fed by a task pumping an external stream.
///
/// Subscribers only see items that arrive while they are attached and have
/// demand. The end of the stream finishes the publisher; [`try_bridge`]
/// additionally turns an `Err` item into a failure.
pub struct Bridge<T, E = Never> {
    subject: PassthroughSubject<T, E>,
    pump: AnyCancellable,
}

impl<T, E> Bridge<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Stops pumping. Subscribers stay attached but receive nothing more.
    pub fn stop(&self) {
        self.pump.cancel();
    }

    /// Returns `true` while the pump runs and the publisher is not completed.
    pub fn is_running(&self) -> bool {
        !self.pump.is_cancelled() && !self.subject.is_completed()
    }
}

impl<T, E> Clone for Bridge<T, E> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            pump: self.pump.clone(),
        }
    }
}

impl<T, E> Publisher for Bridge<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        self.subject.subscribe(subscriber);
    }
}

/// Forwards every item of `stream` as a value, then finishes.
///
/// # Example
///
/// ```rust,no_run
/// use rivulet_core::SinkExt;
/// use rivulet_exec::bridge;
/// use rivulet_runtime::TokioRuntime;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<u32>();
/// let events = bridge(&TokioRuntime, tokio_stream::wrappers::UnboundedReceiverStream::new(rx));
/// let _handle = events.sink_value(|n| println!("{n}"));
/// tx.send(1).ok();
/// # }
/// ```
pub fn bridge<R, St>(runtime: &R, stream: St) -> Bridge<St::Item>
where
    R: Runtime,
    St: Stream + Send + 'static,
    St::Item: Clone + Send + 'static,
{
    pump(runtime, stream.map(Ok::<_, Never>))
}

/// Forwards `Ok` items as values; the first `Err` fails the publisher.
pub fn try_bridge<R, St, T, E>(runtime: &R, stream: St) -> Bridge<T, E>
where
    R: Runtime,
    St: Stream<Item = Result<T, E>> + Send + 'static,
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pump(runtime, stream)
}

/// An unbounded channel whose receiving end is bridged on `runtime`.
///
/// The publisher finishes once every sender is dropped or the channel is
/// closed.
pub fn event_channel<R, T>(runtime: &R) -> (async_channel::Sender<T>, Bridge<T>)
where
    R: Runtime,
    T: Clone + Send + 'static,
{
    let (sender, receiver) = async_channel::unbounded();
    (sender, bridge(runtime, receiver))
}

fn pump<R, St, T, E>(runtime: &R, stream: St) -> Bridge<T, E>
where
    R: Runtime,
    St: Stream<Item = Result<T, E>> + Send + 'static,
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let subject = PassthroughSubject::new();
    let token = CancellationToken::new();
    let feed = subject.clone();
    let stop = token.clone();

    runtime.spawn(async move {
        let forward = async {
            let mut stream = pin!(stream);
            while let Some(item) = stream.next().await {
                match item {
                    Ok(value) => {
                        if feed.send(value).is_err() {
                            return;
                        }
                    }
                    Err(error) => {
                        debug!("bridge: source failed");
                        let _ = feed.send_completion(Completion::Failure(error));
                        return;
                    }
                }
            }
            trace!("bridge: source ended");
            let _ = feed.finish();
        };
        let cancelled = stop.cancelled();
        if let Either::Right(_) = future::select(pin!(forward), pin!(cancelled)).await {
            trace!("bridge: pump stopped");
        }
    });

    Bridge {
        subject,
        pump: AnyCancellable::new(move || {
            token.cancel();
        }),
    }
}
