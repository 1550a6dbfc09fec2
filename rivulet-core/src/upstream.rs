// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Demand, SubscriptionRef};
use parking_lot::Mutex;
use std::collections::HashMap;

struct Slots {
    subscriptions: HashMap<usize, SubscriptionRef>,
    next_index: usize,
    cancelled: bool,
}

/// Indexed set of upstream subscriptions held by a multi-input stage.
///
/// Subscriptions arriving after [`cancel_all`](Self::cancel_all) are cancelled
/// on arrival. Subscription methods are always invoked outside the internal
/// lock, so upstreams may call back into the owning stage.
pub struct UpstreamSubscriptions {
    slots: Mutex<Slots>,
}

impl Default for UpstreamSubscriptions {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamSubscriptions {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                subscriptions: HashMap::new(),
                next_index: 0,
                cancelled: false,
            }),
        }
    }

    /// Stores `subscription` under `index`, replacing and cancelling any
    /// previous one.
    ///
    /// Returns `false` if the set was already cancelled, in which case
    /// `subscription` has been cancelled.
    pub fn set(&self, index: usize, subscription: SubscriptionRef) -> bool {
        let replaced = {
            let mut slots = self.slots.lock();
            if slots.cancelled {
                None
            } else {
                slots.next_index = slots.next_index.max(index + 1);
                Some(slots.subscriptions.insert(index, subscription.clone()))
            }
        };
        match replaced {
            None => {
                subscription.cancel();
                false
            }
            Some(previous) => {
                if let Some(previous) = previous {
                    previous.cancel();
                }
                true
            }
        }
    }

    /// Stores `subscription` under a fresh index and returns it.
    pub fn push(&self, subscription: SubscriptionRef) -> Option<usize> {
        let index = {
            let mut slots = self.slots.lock();
            if slots.cancelled {
                None
            } else {
                let index = slots.next_index;
                slots.next_index += 1;
                slots.subscriptions.insert(index, subscription.clone());
                Some(index)
            }
        };
        if index.is_none() {
            subscription.cancel();
        }
        index
    }

    /// Requests `demand` from the subscription stored under `index`.
    pub fn request(&self, index: usize, demand: Demand) {
        let subscription = self.slots.lock().subscriptions.get(&index).cloned();
        if let Some(subscription) = subscription {
            subscription.request(demand);
        }
    }

    /// Requests `demand` from every stored subscription.
    pub fn request_all(&self, demand: Demand) {
        let subscriptions: Vec<_> = self.slots.lock().subscriptions.values().cloned().collect();
        for subscription in subscriptions {
            subscription.request(demand);
        }
    }

    /// Cancels and forgets the subscription stored under `index`.
    pub fn cancel(&self, index: usize) {
        let subscription = self.slots.lock().subscriptions.remove(&index);
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    /// Forgets the subscription stored under `index` without cancelling it.
    ///
    /// Used once that upstream has delivered its terminal signal.
    pub fn release(&self, index: usize) {
        self.slots.lock().subscriptions.remove(&index);
    }

    /// Cancels every stored subscription and every later arrival.
    pub fn cancel_all(&self) {
        let subscriptions: Vec<_> = {
            let mut slots = self.slots.lock();
            slots.cancelled = true;
            slots.subscriptions.drain().map(|(_, s)| s).collect()
        };
        for subscription in subscriptions {
            subscription.cancel();
        }
    }

    /// Returns `true` once [`cancel_all`](Self::cancel_all) was called.
    pub fn is_cancelled(&self) -> bool {
        self.slots.lock().cancelled
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.slots.lock().subscriptions.len()
    }

    /// Returns `true` if no subscription is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
