// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Serialized, demand-aware delivery to a single subscriber.
//!
//! Operators that receive values from several places (multiple upstreams,
//! timers, other threads) push them into a [`DemandBuffer`]. The buffer owns
//! the downstream subscriber and guarantees:
//!
//! - values are delivered in push order and only against outstanding demand;
//! - callbacks into the subscriber are never concurrent and never nested,
//!   whichever thread pushes (a push made while another delivery is in
//!   progress is picked up by the delivering thread);
//! - the completion is delivered once, after every buffered value for
//!   `Finished`, immediately (dropping buffered values) for a failure;
//! - after cancellation nothing is delivered and the queue is released.

use crate::{Completion, Demand, Subscriber, Subscription};
use parking_lot::Mutex;
use std::collections::VecDeque;

struct BufferState<T, E> {
    queue: VecDeque<T>,
    demand: Demand,
    completion: Option<Completion<E>>,
    draining: bool,
    terminated: bool,
}

enum Step<T, E> {
    Deliver(T),
    Complete(Completion<E>),
    Idle,
}

impl<T, E> BufferState<T, E> {
    fn next_step(&mut self) -> Step<T, E> {
        if self.terminated {
            self.draining = false;
            self.queue.clear();
            return Step::Idle;
        }

        if matches!(self.completion, Some(Completion::Failure(_))) {
            if let Some(completion) = self.completion.take() {
                self.terminated = true;
                self.queue.clear();
                return Step::Complete(completion);
            }
        }

        if !self.queue.is_empty() && self.demand.take_one() {
            if let Some(value) = self.queue.pop_front() {
                return Step::Deliver(value);
            }
        }

        if self.queue.is_empty() {
            if let Some(completion) = self.completion.take() {
                self.terminated = true;
                return Step::Complete(completion);
            }
        }

        self.draining = false;
        Step::Idle
    }
}

/// Demand-aware outbound queue owning the downstream subscriber.
pub struct DemandBuffer<S: Subscriber> {
    subscriber: S,
    state: Mutex<BufferState<S::Input, S::Failure>>,
}

impl<S: Subscriber> DemandBuffer<S> {
    /// Creates an empty buffer with no demand.
    pub fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            state: Mutex::new(BufferState {
                queue: VecDeque::new(),
                demand: Demand::NONE,
                completion: None,
                draining: false,
                terminated: false,
            }),
        }
    }

    /// The downstream subscriber.
    ///
    /// Only use it for `receive_subscription`; values and completions must go
    /// through the buffer.
    pub fn subscriber(&self) -> &S {
        &self.subscriber
    }

    /// Queues `value` for delivery.
    ///
    /// Returns `false` (dropping the value) once a completion was recorded or
    /// the buffer was cancelled.
    pub fn push(&self, value: S::Input) -> bool {
        {
            let mut state = self.state.lock();
            if state.terminated || state.completion.is_some() {
                return false;
            }
            state.queue.push_back(value);
        }
        self.drain();
        true
    }

    /// Records the terminal signal. Only the first completion counts.
    pub fn complete(&self, completion: Completion<S::Failure>) {
        {
            let mut state = self.state.lock();
            if state.terminated || state.completion.is_some() {
                return;
            }
            if completion.is_failure() {
                state.queue.clear();
            }
            state.completion = Some(completion);
        }
        self.drain();
    }

    /// Adds downstream demand and delivers whatever it unlocks.
    pub fn request(&self, demand: Demand) {
        {
            let mut state = self.state.lock();
            if state.terminated {
                return;
            }
            state.demand += demand;
        }
        self.drain();
    }

    /// Stops delivery permanently and releases buffered values.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.terminated = true;
        state.completion = None;
        state.queue.clear();
    }

    /// Returns `true` once no further value can be accepted.
    pub fn is_closed(&self) -> bool {
        let state = self.state.lock();
        state.terminated || state.completion.is_some()
    }

    /// Number of values waiting for demand.
    pub fn buffered(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Outstanding downstream demand not yet used by a delivery.
    pub fn demand(&self) -> Demand {
        self.state.lock().demand
    }

    fn drain(&self) {
        {
            let mut state = self.state.lock();
            if state.draining || state.terminated {
                return;
            }
            state.draining = true;
        }

        loop {
            let step = self.state.lock().next_step();
            match step {
                Step::Deliver(value) => {
                    let additional = self.subscriber.receive(value);
                    self.state.lock().demand += additional;
                }
                Step::Complete(completion) => {
                    self.subscriber.receive_completion(completion);
                    return;
                }
                Step::Idle => return,
            }
        }
    }
}

/// A buffer is itself a valid subscription for its subscriber: requests add
/// demand, cancellation stops delivery.
impl<S: Subscriber> Subscription for DemandBuffer<S>
where
    S::Input: Send + 'static,
    S::Failure: Send + 'static,
{
    fn request(&self, demand: Demand) {
        DemandBuffer::request(self, demand);
    }

    fn cancel(&self) {
        DemandBuffer::cancel(self);
    }
}
