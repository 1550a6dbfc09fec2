// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consuming a publisher as an async stream.

use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use parking_lot::Mutex;
use pin_project::{pin_project, pinned_drop};
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::Arc;

type Slot = Arc<Mutex<Option<SubscriptionRef>>>;

/// Extension trait turning any publisher into a `futures::Stream`.
pub trait ValuesExt: Publisher + Sized {
    /// Subscribes now and yields each value as `Ok`, a failure as a final `Err`.
    ///
    /// The stream requests one value at a time: the next value is requested
    /// only after the previous one was handed out. Dropping the stream
    /// cancels the subscription.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::StreamExt;
    /// use rivulet_core::IntoPublisher;
    /// use rivulet_exec::ValuesExt;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let items: Vec<_> = vec![1, 2, 3].publisher().values().collect().await;
    /// assert_eq!(items, vec![Ok(1), Ok(2), Ok(3)]);
    /// # }
    /// ```
    fn values(self) -> Values<Self::Output, Self::Failure>
    where
        Self::Output: Send + 'static,
        Self::Failure: Send + 'static,
    {
        let (sender, receiver) = async_channel::unbounded();
        let subscription: Slot = Arc::new(Mutex::new(None));
        self.subscribe(ValuesSubscriber {
            sender: Mutex::new(Some(sender)),
            subscription: Arc::clone(&subscription),
        });
        Values {
            receiver,
            subscription,
        }
    }
}

impl<P: Publisher> ValuesExt for P {}

/// Stream returned by [`ValuesExt::values`].
#[pin_project(PinnedDrop)]
pub struct Values<T, E> {
    #[pin]
    receiver: async_channel::Receiver<Result<T, E>>,
    subscription: Slot,
}

impl<T, E> Stream for Values<T, E> {
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let polled = this.receiver.poll_next(cx);
        if let Poll::Ready(Some(Ok(_))) = &polled {
            let subscription = this.subscription.lock().clone();
            if let Some(subscription) = subscription {
                subscription.request(Demand::max(1));
            }
        }
        polled
    }
}

#[pinned_drop]
impl<T, E> PinnedDrop for Values<T, E> {
    fn drop(self: Pin<&mut Self>) {
        let subscription = self.project().subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

struct ValuesSubscriber<T, E> {
    sender: Mutex<Option<async_channel::Sender<Result<T, E>>>>,
    subscription: Slot,
}

impl<T, E> ValuesSubscriber<T, E> {
    fn forward(&self, item: Result<T, E>) {
        if let Some(sender) = self.sender.lock().as_ref() {
            // A dropped stream has already cancelled the subscription.
            let _ = sender.try_send(item);
        }
    }
}

impl<T, E> Subscriber for ValuesSubscriber<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        *self.subscription.lock() = Some(Arc::clone(&subscription));
        subscription.request(Demand::max(1));
    }

    fn receive(&self, input: T) -> Demand {
        self.forward(Ok(input));
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        if let Completion::Failure(error) = completion {
            self.forward(Err(error));
        }
        self.sender.lock().take();
        self.subscription.lock().take();
    }
}
