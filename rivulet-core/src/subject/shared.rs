// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::{debug, trace, warn};
use crate::{
    AnySubscriber, Completion, Demand, EmptySubscription, Subscription, SubscriptionRef,
    UpstreamSubscriptions,
};
use parking_lot::{Mutex, ReentrantMutex};
use rivulet_error::SubjectError;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Weak};

/// What a subject keeps around for subscribers that attach later.
pub(crate) trait Replay<T>: Send + 'static {
    const REPLAYS: bool;

    fn record(&mut self, value: &T);

    fn latest(&self) -> Option<T>;
}

/// Passthrough retention: nothing.
pub(crate) struct NoReplay;

impl<T> Replay<T> for NoReplay {
    const REPLAYS: bool = false;

    fn record(&mut self, _value: &T) {}

    fn latest(&self) -> Option<T> {
        None
    }
}

/// Current-value retention: the last value sent, or the seed.
pub(crate) struct Latest<T>(pub(crate) T);

impl<T: Clone + Send + 'static> Replay<T> for Latest<T> {
    const REPLAYS: bool = true;

    fn record(&mut self, value: &T) {
        self.0 = value.clone();
    }

    fn latest(&self) -> Option<T> {
        Some(self.0.clone())
    }
}

struct Slot<T, E> {
    subscriber: AnySubscriber<T, E>,
    demand: Demand,
    replay_pending: bool,
    // Sequence number of the last value this slot has seen or skipped.
    seen: u64,
}

enum Signal<T, E> {
    Value(u64, T),
    Completion(Completion<E>),
}

struct SubjectState<T, E, R> {
    next_id: u64,
    sent: u64,
    slots: BTreeMap<u64, Slot<T, E>>,
    completion: Option<Completion<E>>,
    retained: R,
    delivering: bool,
    pending: VecDeque<Signal<T, E>>,
}

/// Shared state behind every subject flavour.
///
/// `serial` serializes sends, completions, demand-triggered replays and
/// detaches across threads while letting the delivering thread re-enter.
/// Nested sends made from inside a delivery are queued and delivered by the
/// outer call once it has finished, so no subscriber callback ever nests.
pub(crate) struct SubjectCore<T, E, R> {
    serial: ReentrantMutex<()>,
    state: Mutex<SubjectState<T, E, R>>,
    upstreams: UpstreamSubscriptions,
}

impl<T, E, R> SubjectCore<T, E, R>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    R: Replay<T>,
{
    pub(crate) fn new(retained: R) -> Self {
        Self {
            serial: ReentrantMutex::new(()),
            state: Mutex::new(SubjectState {
                next_id: 0,
                sent: 0,
                slots: BTreeMap::new(),
                completion: None,
                retained,
                delivering: false,
                pending: VecDeque::new(),
            }),
            upstreams: UpstreamSubscriptions::new(),
        }
    }

    pub(crate) fn attach(self: &Arc<Self>, subscriber: AnySubscriber<T, E>) {
        let _serial = self.serial.lock();
        let id = {
            let mut state = self.state.lock();
            if let Some(completion) = state.completion.clone() {
                drop(state);
                trace!("subject: late subscriber receives the recorded completion");
                subscriber.receive_subscription(EmptySubscription::shared());
                subscriber.receive_completion(completion);
                return;
            }
            let id = state.next_id;
            state.next_id += 1;
            let seen = state.sent;
            state.slots.insert(
                id,
                Slot {
                    subscriber: Arc::clone(&subscriber),
                    demand: Demand::NONE,
                    replay_pending: R::REPLAYS,
                    seen,
                },
            );
            debug!("subject: subscriber {} attached", id);
            id
        };
        subscriber.receive_subscription(Arc::new(SubjectSubscription {
            core: Arc::downgrade(self),
            id,
        }));
    }

    pub(crate) fn send(&self, value: T) -> Result<(), SubjectError> {
        let _serial = self.serial.lock();
        let sequence = {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                warn!("subject: send after completion ignored");
                return Err(SubjectError::Completed);
            }
            state.retained.record(&value);
            state.sent += 1;
            let sequence = state.sent;
            if state.delivering {
                state.pending.push_back(Signal::Value(sequence, value));
                return Ok(());
            }
            state.delivering = true;
            sequence
        };
        self.deliver(Signal::Value(sequence, value));
        self.drain_pending();
        Ok(())
    }

    pub(crate) fn send_completion(&self, completion: Completion<E>) -> Result<(), SubjectError> {
        let _serial = self.serial.lock();
        {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                warn!("subject: second completion ignored");
                return Err(SubjectError::Completed);
            }
            state.completion = Some(completion.clone());
            if state.delivering {
                state.pending.push_back(Signal::Completion(completion));
                return Ok(());
            }
            state.delivering = true;
        }
        self.deliver(Signal::Completion(completion));
        self.drain_pending();
        Ok(())
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state.lock().completion.is_some()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.state.lock().slots.len()
    }

    pub(crate) fn retained<O>(&self, read: impl FnOnce(&R) -> O) -> O {
        read(&self.state.lock().retained)
    }

    /// Registers an upstream this subject subscribed to and opens it fully.
    pub(crate) fn add_upstream(&self, subscription: SubscriptionRef) {
        if self.is_completed() {
            subscription.cancel();
            return;
        }
        if self.upstreams.push(Arc::clone(&subscription)).is_some() {
            subscription.request(Demand::Unlimited);
        }
    }

    fn request(&self, id: u64, demand: Demand) {
        if demand.is_none() {
            return;
        }
        let _serial = self.serial.lock();
        let replay = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let Some(slot) = state.slots.get_mut(&id) else {
                return;
            };
            slot.demand += demand;
            if slot.replay_pending && slot.demand.take_one() {
                slot.replay_pending = false;
                // Queued sends up to the replayed value are already covered.
                slot.seen = state.sent;
                state
                    .retained
                    .latest()
                    .map(|value| (value, Arc::clone(&slot.subscriber)))
            } else {
                None
            }
        };
        if let Some((value, subscriber)) = replay {
            trace!("subject: replaying current value to subscriber {}", id);
            let additional = subscriber.receive(value);
            self.add_demand(id, additional);
        }
    }

    fn detach(&self, id: u64) {
        let _serial = self.serial.lock();
        if self.state.lock().slots.remove(&id).is_some() {
            debug!("subject: subscriber {} detached", id);
        }
    }

    fn add_demand(&self, id: u64, demand: Demand) {
        if demand.is_none() {
            return;
        }
        if let Some(slot) = self.state.lock().slots.get_mut(&id) {
            slot.demand += demand;
        }
    }

    fn drain_pending(&self) {
        loop {
            let next = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some(signal) => signal,
                    None => {
                        state.delivering = false;
                        return;
                    }
                }
            };
            self.deliver(next);
        }
    }

    fn deliver(&self, signal: Signal<T, E>) {
        match signal {
            Signal::Value(sequence, value) => {
                let targets: Vec<_> = self
                    .state
                    .lock()
                    .slots
                    .iter_mut()
                    .filter(|(_, slot)| !slot.replay_pending && slot.seen < sequence)
                    .filter_map(|(id, slot)| {
                        slot.demand
                            .take_one()
                            .then(|| (*id, Arc::clone(&slot.subscriber)))
                    })
                    .collect();

                for (id, subscriber) in targets {
                    // A subscriber cancelled by an earlier callback of this send.
                    if !self.state.lock().slots.contains_key(&id) {
                        continue;
                    }
                    let additional = subscriber.receive(value.clone());
                    self.add_demand(id, additional);
                }
            }
            Signal::Completion(completion) => {
                let slots = std::mem::take(&mut self.state.lock().slots);
                self.upstreams.cancel_all();
                debug!("subject: completing {} subscribers", slots.len());
                for slot in slots.into_values() {
                    slot.subscriber.receive_completion(completion.clone());
                }
            }
        }
    }
}

struct SubjectSubscription<T, E, R> {
    core: Weak<SubjectCore<T, E, R>>,
    id: u64,
}

impl<T, E, R> Subscription for SubjectSubscription<T, E, R>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    R: Replay<T>,
{
    fn request(&self, demand: Demand) {
        if let Some(core) = self.core.upgrade() {
            core.request(self.id, demand);
        }
    }

    fn cancel(&self) {
        if let Some(core) = self.core.upgrade() {
            core.detach(self.id);
        }
    }
}
