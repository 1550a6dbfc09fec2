// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Completion, Demand, Publisher, Subscriber, Subscription};
use parking_lot::Mutex;
use rivulet_error::Never;
use std::fmt;
use std::iter::Peekable;
use std::marker::PhantomData;
use std::sync::Arc;

/// Emits the items of an iterable, one per unit of demand, then finishes.
///
/// Each subscription iterates its own clone of the source. The stream finishes
/// as soon as the last item has been delivered, without waiting for further
/// demand; an empty source finishes right after the subscription is handed out.
pub struct Sequence<I, E = Never> {
    items: I,
    _marker: PhantomData<fn() -> E>,
}

impl<I, E> Sequence<I, E> {
    /// Creates a publisher over `items`.
    pub const fn new(items: I) -> Self {
        Self {
            items,
            _marker: PhantomData,
        }
    }
}

impl<I: Clone, E> Clone for Sequence<I, E> {
    fn clone(&self) -> Self {
        Self::new(self.items.clone())
    }
}

impl<I: fmt::Debug, E> fmt::Debug for Sequence<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sequence").field(&self.items).finish()
    }
}

impl<I, E> Publisher for Sequence<I, E>
where
    I: IntoIterator + Clone,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
    E: Send + 'static,
{
    type Output = I::Item;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = I::Item, Failure = E>,
    {
        let subscription = Arc::new(SequenceSubscription {
            subscriber,
            state: Mutex::new(SequenceState {
                items: Some(self.items.clone().into_iter().peekable()),
                demand: Demand::NONE,
                draining: false,
            }),
        });
        subscription
            .subscriber
            .receive_subscription(Arc::clone(&subscription) as _);
        subscription.drain();
    }
}

/// Converts any cloneable iterable into a [`Sequence`] publisher.
///
/// ```
/// use rivulet_core::{IntoPublisher, SinkExt};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let _ = (1..=3).publisher().sink_value(move |v| sink.lock().unwrap().push(v));
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub trait IntoPublisher: IntoIterator + Clone + Sized {
    /// An infallible publisher over this iterable.
    fn publisher(self) -> Sequence<Self> {
        Sequence::new(self)
    }

    /// A publisher over this iterable with an explicit failure type.
    fn publisher_with_failure<E>(self) -> Sequence<Self, E> {
        Sequence::new(self)
    }
}

impl<I> IntoPublisher for I where I: IntoIterator + Clone {}

struct SequenceState<I: Iterator> {
    items: Option<Peekable<I>>,
    demand: Demand,
    draining: bool,
}

enum Step<T> {
    Deliver(T),
    Finish,
    Idle,
}

struct SequenceSubscription<S, I: Iterator> {
    subscriber: S,
    state: Mutex<SequenceState<I>>,
}

impl<S, I> SequenceSubscription<S, I>
where
    S: Subscriber<Input = I::Item>,
    I: Iterator,
{
    fn drain(&self) {
        {
            let mut state = self.state.lock();
            if state.draining || state.items.is_none() {
                return;
            }
            state.draining = true;
        }

        loop {
            let step = {
                let mut guard = self.state.lock();
                let state = &mut *guard;
                let step = match state.items.as_mut() {
                    None => Step::Idle,
                    Some(items) => {
                        if items.peek().is_none() {
                            Step::Finish
                        } else if state.demand.take_one() {
                            items.next().map_or(Step::Idle, Step::Deliver)
                        } else {
                            Step::Idle
                        }
                    }
                };
                match step {
                    Step::Deliver(_) => {}
                    Step::Finish => {
                        state.items = None;
                        state.draining = false;
                    }
                    Step::Idle => state.draining = false,
                }
                step
            };

            match step {
                Step::Deliver(item) => {
                    let additional = self.subscriber.receive(item);
                    self.state.lock().demand += additional;
                }
                Step::Finish => {
                    self.subscriber.receive_completion(Completion::Finished);
                    return;
                }
                Step::Idle => return,
            }
        }
    }
}

impl<S, I> Subscription for SequenceSubscription<S, I>
where
    S: Subscriber<Input = I::Item>,
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    fn request(&self, demand: Demand) {
        if demand.is_none() {
            return;
        }
        {
            let mut state = self.state.lock();
            if state.items.is_none() {
                return;
            }
            state.demand += demand;
        }
        self.drain();
    }

    fn cancel(&self) {
        self.state.lock().items = None;
    }
}
