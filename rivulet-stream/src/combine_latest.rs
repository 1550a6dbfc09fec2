// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::relay::{Forward, Relay};
use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use std::sync::Arc;

/// Extension trait providing the `combine_latest` operators for publishers.
///
/// Combined publishers must share one failure type and have cloneable
/// outputs.
pub trait CombineLatestExt: Publisher + Sized {
    /// Emits the latest value of every upstream each time any of them
    /// emits, once all of them have emitted at least once.
    ///
    /// The output finishes when every upstream has finished, or as soon as
    /// an upstream finishes without ever emitting. The first failure fails
    /// the output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{PassthroughSubject, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let numbers = PassthroughSubject::<i32>::new();
    /// let letters = PassthroughSubject::<char>::new();
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _handle = numbers
    ///     .clone()
    ///     .combine_latest(letters.clone())
    ///     .sink_value(move |pair| sink.lock().unwrap().push(pair));
    ///
    /// numbers.send(1).unwrap();
    /// numbers.send(2).unwrap();
    /// letters.send('a').unwrap();
    /// numbers.send(3).unwrap();
    /// letters.send('b').unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![(2, 'a'), (3, 'a'), (3, 'b')]);
    /// ```
    fn combine_latest<B>(self, other: B) -> CombineLatest<Self, B>
    where
        B: Publisher<Failure = Self::Failure>,
    {
        CombineLatest {
            upstreams: (self, other),
        }
    }

    /// Three-way [`combine_latest`](Self::combine_latest).
    fn combine_latest3<B, C>(self, b: B, c: C) -> CombineLatest3<Self, B, C>
    where
        B: Publisher<Failure = Self::Failure>,
        C: Publisher<Failure = Self::Failure>,
    {
        CombineLatest3 {
            upstreams: (self, b, c),
        }
    }

    /// Four-way [`combine_latest`](Self::combine_latest).
    fn combine_latest4<B, C, D>(self, b: B, c: C, d: D) -> CombineLatest4<Self, B, C, D>
    where
        B: Publisher<Failure = Self::Failure>,
        C: Publisher<Failure = Self::Failure>,
        D: Publisher<Failure = Self::Failure>,
    {
        CombineLatest4 {
            upstreams: (self, b, c, d),
        }
    }
}

impl<P: Publisher> CombineLatestExt for P {}

struct CombineState<L> {
    latest: L,
    seen: Vec<bool>,
    finished: Vec<bool>,
}

struct CombineCore<S: Subscriber, L> {
    relay: Arc<Relay<S>>,
    state: Mutex<CombineState<L>>,
    // Clones the latest tuple once every slot is filled.
    snapshot: fn(&L) -> Option<S::Input>,
}

struct CombineLane<S: Subscriber, L, T> {
    core: Arc<CombineCore<S, L>>,
    index: usize,
    store: fn(&mut L, T),
}

impl<S, L, T> Subscriber for CombineLane<S, L, T>
where
    S: Subscriber,
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
    L: Send + 'static,
    T: 'static,
{
    type Input = T;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.core.relay.attach(self.index, subscription);
    }

    fn receive(&self, input: T) -> Demand {
        let tuple = {
            let mut state = self.core.state.lock();
            (self.store)(&mut state.latest, input);
            if let Some(seen) = state.seen.get_mut(self.index) {
                *seen = true;
            }
            (self.core.snapshot)(&state.latest)
        };
        if let Some(tuple) = tuple {
            self.core.relay.push(tuple);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.core.relay.release(self.index);
        match completion {
            Completion::Finished => {
                let done = {
                    let mut state = self.core.state.lock();
                    if let Some(flag) = state.finished.get_mut(self.index) {
                        *flag = true;
                    }
                    let silent = !state.seen.get(self.index).copied().unwrap_or(false);
                    silent || state.finished.iter().all(|finished| *finished)
                };
                if done {
                    self.core.relay.complete(Completion::Finished);
                }
            }
            failure => self.core.relay.complete(failure),
        }
    }
}

fn lane<S: Subscriber, L, T>(
    core: &Arc<CombineCore<S, L>>,
    index: usize,
    store: fn(&mut L, T),
) -> CombineLane<S, L, T> {
    CombineLane {
        core: Arc::clone(core),
        index,
        store,
    }
}

macro_rules! define_combine_latest {
    ($(#[$meta:meta])* $name:ident, $count:expr, $($P:ident $idx:tt),+) => {
        $(#[$meta])*
        pub struct $name<$($P),+> {
            upstreams: ($($P,)+),
        }

        impl<E, $($P),+> Publisher for $name<$($P),+>
        where
            E: Send + 'static,
            $($P: Publisher<Failure = E>, $P::Output: Clone,)+
        {
            type Output = ($($P::Output,)+);
            type Failure = E;

            fn subscribe<S>(&self, subscriber: S)
            where
                S: Subscriber<Input = Self::Output, Failure = E>,
            {
                let core = Arc::new(CombineCore {
                    relay: Relay::start(subscriber, Forward::Unlimited),
                    state: Mutex::new(CombineState {
                        latest: ($(Option::<$P::Output>::None,)+),
                        seen: vec![false; $count],
                        finished: vec![false; $count],
                    }),
                    snapshot: |latest: &($(Option<$P::Output>,)+)| {
                        Some(($(latest.$idx.clone()?,)+))
                    },
                });
                $(
                    self.upstreams.$idx.subscribe(lane(&core, $idx, |latest, value| {
                        latest.$idx = Some(value);
                    }));
                )+
            }
        }
    };
}

define_combine_latest!(
    /// Publisher returned by [`CombineLatestExt::combine_latest`].
    CombineLatest, 2, A 0, B 1
);
define_combine_latest!(
    /// Publisher returned by [`CombineLatestExt::combine_latest3`].
    CombineLatest3, 3, A 0, B 1, C 2
);
define_combine_latest!(
    /// Publisher returned by [`CombineLatestExt::combine_latest4`].
    CombineLatest4, 4, A 0, B 1, C 2, D 3
);
