// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, Subscriber, Subscription, SubscriptionRef};
use std::sync::Arc;

struct SerialState {
    demand: Demand,
    current: Option<SubscriptionRef>,
    cancelled: bool,
    done: bool,
}

/// A downstream fed by one upstream subscription after another.
///
/// Outstanding demand carries over from one upstream to the next. Handed
/// to the downstream as its subscription.
pub(crate) struct Serial<S> {
    downstream: S,
    state: Mutex<SerialState>,
}

impl<S: Subscriber> Serial<S> {
    /// Creates the stage and hands it to `downstream`.
    pub(crate) fn start(downstream: S) -> Arc<Self> {
        let serial = Arc::new(Self {
            downstream,
            state: Mutex::new(SerialState {
                demand: Demand::NONE,
                current: None,
                cancelled: false,
                done: false,
            }),
        });
        serial
            .downstream
            .receive_subscription(Arc::clone(&serial) as SubscriptionRef);
        serial
    }

    /// Makes `subscription` the current upstream and asks it for the
    /// outstanding demand.
    pub(crate) fn attach(&self, subscription: SubscriptionRef) {
        let outstanding = {
            let mut state = self.state.lock();
            if state.cancelled || state.done {
                None
            } else {
                state.current = Some(SubscriptionRef::clone(&subscription));
                Some(state.demand)
            }
        };
        match outstanding {
            None => subscription.cancel(),
            Some(demand) if demand.has_capacity() => subscription.request(demand),
            Some(_) => {}
        }
    }

    /// Forwards one value against the outstanding demand.
    pub(crate) fn deliver(&self, value: S::Input) -> Demand {
        {
            let mut state = self.state.lock();
            if state.cancelled || state.done || !state.demand.take_one() {
                return Demand::NONE;
            }
        }
        let additional = self.downstream.receive(value);
        self.state.lock().demand += additional;
        additional
    }

    /// Forgets the current upstream after it ended. Returns `false` if the
    /// stage is already cancelled or finished.
    pub(crate) fn detach(&self) -> bool {
        let mut state = self.state.lock();
        state.current = None;
        !(state.cancelled || state.done)
    }

    /// Delivers the terminal signal, at most once.
    pub(crate) fn finish(&self, completion: Completion<S::Failure>) {
        {
            let mut state = self.state.lock();
            if state.cancelled || state.done {
                return;
            }
            state.done = true;
            state.current = None;
        }
        self.downstream.receive_completion(completion);
    }
}

impl<S: Subscriber> Subscription for Serial<S> {
    fn request(&self, demand: Demand) {
        let current = {
            let mut state = self.state.lock();
            if state.cancelled || state.done {
                return;
            }
            state.demand += demand;
            state.current.clone()
        };
        if let Some(current) = current {
            current.request(demand);
        }
    }

    fn cancel(&self) {
        let current = {
            let mut state = self.state.lock();
            state.cancelled = true;
            state.current.take()
        };
        if let Some(current) = current {
            current.cancel();
        }
    }
}
