// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Demand;
use std::sync::Arc;

/// The control handle a publisher hands to a subscriber.
///
/// Demand and cancellation travel through it from consumer to producer.
/// Implementations must tolerate calls from inside the subscriber's own
/// callbacks (re-entrancy) and from other threads.
///
/// # Contract
///
/// - `request` adds to the outstanding demand. Requesting [`Demand::NONE`] is a no-op.
/// - `cancel` stops all further delivery and releases per-subscription state.
///   It is idempotent, and after it every `request` is silently ignored.
/// - Cancelling after the terminal signal was delivered is a no-op.
pub trait Subscription: Send + Sync + 'static {
    /// Authorizes up to `demand` further value deliveries.
    fn request(&self, demand: Demand);

    /// Stops delivery permanently.
    fn cancel(&self);
}

/// Shared handle to a type-erased subscription.
pub type SubscriptionRef = Arc<dyn Subscription>;

/// A subscription with nothing behind it.
///
/// Handed out by publishers that terminate during `subscribe`, so that the
/// subscription callback still precedes the terminal signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySubscription;

impl EmptySubscription {
    /// A shared empty subscription.
    #[must_use]
    pub fn shared() -> SubscriptionRef {
        Arc::new(EmptySubscription)
    }
}

impl Subscription for EmptySubscription {
    fn request(&self, _demand: Demand) {}

    fn cancel(&self) {}
}
