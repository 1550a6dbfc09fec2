// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rivulet_core::{Demand, Subscription, SubscriptionRef};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The single upstream subscription of a stage that may end its stream early.
pub(crate) struct UpstreamSlot {
    subscription: Mutex<Option<SubscriptionRef>>,
    done: AtomicBool,
}

impl UpstreamSlot {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            subscription: Mutex::new(None),
            done: AtomicBool::new(false),
        })
    }

    /// Stores the upstream subscription and returns the handle to pass
    /// downstream. Cancelling that handle ends the stage, so no terminal
    /// signal follows a downstream cancel.
    pub(crate) fn attach(self: &Arc<Self>, subscription: SubscriptionRef) -> SubscriptionRef {
        if self.is_done() {
            subscription.cancel();
        } else {
            *self.subscription.lock() = Some(SubscriptionRef::clone(&subscription));
        }
        Arc::new(DownstreamHandle {
            slot: Arc::clone(self),
            upstream: subscription,
        })
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Marks the stage as ended by its upstream. Returns `false` if it
    /// already was.
    pub(crate) fn finish(&self) -> bool {
        let first = !self.done.swap(true, Ordering::AcqRel);
        self.subscription.lock().take();
        first
    }

    /// Ends the stage from inside and cancels the upstream. Returns `false`
    /// if it already had ended.
    pub(crate) fn terminate(&self) -> bool {
        let first = !self.done.swap(true, Ordering::AcqRel);
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        first
    }
}

struct DownstreamHandle {
    slot: Arc<UpstreamSlot>,
    upstream: SubscriptionRef,
}

impl Subscription for DownstreamHandle {
    fn request(&self, demand: Demand) {
        if !self.slot.is_done() {
            self.upstream.request(demand);
        }
    }

    fn cancel(&self) {
        self.slot.terminate();
        self.upstream.cancel();
    }
}
