// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use crate::relay::{Forward, Relay};
use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::collections::VecDeque;
use std::sync::Arc;

/// Extension trait providing the `zip` operators for publishers.
///
/// Zipped publishers must share one failure type; use
/// [`MapErrorExt`](crate::MapErrorExt) to align them.
pub trait ZipExt: Publisher + Sized {
    /// Pairs values from `self` and `other` in lockstep.
    ///
    /// Each upstream has its own queue. A tuple is emitted once every queue
    /// holds a value, taking the oldest value of each. The output finishes
    /// when an upstream has finished and its queue is empty; unpaired values
    /// of the other upstreams are discarded. Each requested tuple asks every
    /// upstream for one value.
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
    /// let _ = vec![1, 2, 3]
    ///     .publisher()
    ///     .zip(vec!["a", "b"].publisher())
    ///     .sink_value(move |pair| sink.lock().unwrap().push(pair));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![(1, "a"), (2, "b")]);
    /// ```
    fn zip<B>(self, other: B) -> Zip<Self, B>
    where
        B: Publisher<Failure = Self::Failure>,
    {
        Zip {
            upstreams: (self, other),
        }
    }

    /// Three-way [`zip`](Self::zip).
    fn zip3<B, C>(self, b: B, c: C) -> Zip3<Self, B, C>
    where
        B: Publisher<Failure = Self::Failure>,
        C: Publisher<Failure = Self::Failure>,
    {
        Zip3 {
            upstreams: (self, b, c),
        }
    }

    /// Four-way [`zip`](Self::zip).
    fn zip4<B, C, D>(self, b: B, c: C, d: D) -> Zip4<Self, B, C, D>
    where
        B: Publisher<Failure = Self::Failure>,
        C: Publisher<Failure = Self::Failure>,
        D: Publisher<Failure = Self::Failure>,
    {
        Zip4 {
            upstreams: (self, b, c, d),
        }
    }
}

impl<P: Publisher> ZipExt for P {}

struct ZipState<Q> {
    queues: Q,
    finished: Vec<bool>,
}

struct ZipCore<S: Subscriber, Q> {
    relay: Arc<Relay<S>>,
    state: Mutex<ZipState<Q>>,
    // Pops one value from every queue if none is empty.
    pop: fn(&mut Q) -> Option<S::Input>,
    // True once a finished upstream has nothing left to pair.
    exhausted: fn(&Q, &[bool]) -> bool,
}

impl<S, Q> ZipCore<S, Q>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    fn drain(&self) {
        let (ready, exhausted) = {
            let mut state = self.state.lock();
            let mut ready = Vec::new();
            while let Some(tuple) = (self.pop)(&mut state.queues) {
                ready.push(tuple);
            }
            let exhausted = (self.exhausted)(&state.queues, &state.finished);
            (ready, exhausted)
        };
        for tuple in ready {
            self.relay.push(tuple);
        }
        if exhausted {
            trace!("zip: upstream exhausted, finishing");
            self.relay.complete(Completion::Finished);
        }
    }
}

struct ZipLane<S: Subscriber, Q, T> {
    core: Arc<ZipCore<S, Q>>,
    index: usize,
    enqueue: fn(&mut Q, T),
}

impl<S, Q, T> Subscriber for ZipLane<S, Q, T>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
    Q: Send + 'static,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.core.relay.attach(self.index, subscription);
    }

    fn receive(&self, input: T) -> Demand {
        (self.enqueue)(&mut self.core.state.lock().queues, input);
        self.core.drain();
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.core.relay.release(self.index);
        match completion {
            Completion::Finished => {
                if let Some(flag) = self.core.state.lock().finished.get_mut(self.index) {
                    *flag = true;
                }
                self.core.drain();
            }
            failure => self.core.relay.complete(failure),
        }
    }
}

fn lane<S: Subscriber, Q, T>(
    core: &Arc<ZipCore<S, Q>>,
    index: usize,
    enqueue: fn(&mut Q, T),
) -> ZipLane<S, Q, T> {
    ZipLane {
        core: Arc::clone(core),
        index,
        enqueue,
    }
}

macro_rules! define_zip {
    ($(#[$meta:meta])* $name:ident, $count:expr, $($P:ident $idx:tt),+) => {
        $(#[$meta])*
        pub struct $name<$($P),+> {
            upstreams: ($($P,)+),
        }

        impl<E, $($P),+> Publisher for $name<$($P),+>
        where
            E: Send + 'static,
            $($P: Publisher<Failure = E>,)+
        {
            type Output = ($($P::Output,)+);
            type Failure = E;

            fn subscribe<S>(&self, subscriber: S)
            where
                S: Subscriber<Input = Self::Output, Failure = E>,
            {
                let core = Arc::new(ZipCore {
                    relay: Relay::start(subscriber, Forward::Scaled(1)),
                    state: Mutex::new(ZipState {
                        queues: ($(VecDeque::<$P::Output>::new(),)+),
                        finished: vec![false; $count],
                    }),
                    pop: |queues: &mut ($(VecDeque<$P::Output>,)+)| {
                        if $(queues.$idx.is_empty())||+ {
                            return None;
                        }
                        Some(($(queues.$idx.pop_front()?,)+))
                    },
                    exhausted: |queues: &($(VecDeque<$P::Output>,)+), finished: &[bool]| {
                        $((finished[$idx] && queues.$idx.is_empty()))||+
                    },
                });
                $(
                    self.upstreams.$idx.subscribe(lane(&core, $idx, |queues, value| {
                        queues.$idx.push_back(value);
                    }));
                )+
            }
        }
    };
}

define_zip!(
    /// Publisher returned by [`ZipExt::zip`].
    Zip, 2, A 0, B 1
);
define_zip!(
    /// Publisher returned by [`ZipExt::zip3`].
    Zip3, 3, A 0, B 1, C 2
);
define_zip!(
    /// Publisher returned by [`ZipExt::zip4`].
    Zip4, 4, A 0, B 1, C 2, D 3
);
