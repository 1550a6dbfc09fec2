// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellation handles and the owning registry.
//!
//! Dropping an [`AnyCancellable`] does **not** cancel it. A handle must either
//! be cancelled explicitly or moved into a [`Cancellables`] registry, whose
//! destruction cancels every member exactly once.
//!
//! ```
//! use rivulet_core::{Cancellables, PassthroughSubject, SinkExt};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let subject = PassthroughSubject::<u32>::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! {
//!     let mut bag = Cancellables::new();
//!     let counter = Arc::clone(&seen);
//!     subject
//!         .sink_value(move |_| {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!         })
//!         .store(&mut bag);
//!
//!     subject.send(1).unwrap();
//! } // bag dropped: subscription cancelled
//!
//! subject.send(2).unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

use crate::SubscriptionRef;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Anything that can be cancelled.
pub trait Cancellable: Send + Sync {
    /// Cancels the activity. Must be idempotent.
    fn cancel(&self);
}

type CancelAction = Box<dyn FnOnce() + Send>;

struct CancelOnce {
    cancelled: AtomicBool,
    action: Mutex<Option<CancelAction>>,
}

/// A type-erased, clonable cancellation handle.
///
/// All clones share one underlying action, which runs at most once no matter
/// how many clones are cancelled.
#[derive(Clone)]
#[must_use = "dropping an AnyCancellable does not cancel it; call `cancel` or `store` it"]
pub struct AnyCancellable {
    inner: Arc<CancelOnce>,
}

impl AnyCancellable {
    /// Wraps an arbitrary cancellation action.
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            inner: Arc::new(CancelOnce {
                cancelled: AtomicBool::new(false),
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// A handle that cancels `subscription`.
    pub fn from_subscription(subscription: SubscriptionRef) -> Self {
        Self::new(move || subscription.cancel())
    }

    /// A handle that cancels a shared cancellable.
    pub fn from_cancellable<C>(cancellable: Arc<C>) -> Self
    where
        C: Cancellable + ?Sized + 'static,
    {
        Self::new(move || cancellable.cancel())
    }

    /// Runs the cancellation action unless it already ran.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let action = self.inner.action.lock().take();
        if let Some(action) = action {
            action();
        }
    }

    /// Returns `true` once `cancel` was called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Moves this handle into `registry`.
    pub fn store(self, registry: &mut Cancellables) {
        registry.insert(self);
    }
}

impl Cancellable for AnyCancellable {
    fn cancel(&self) {
        AnyCancellable::cancel(self);
    }
}

impl fmt::Debug for AnyCancellable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyCancellable")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Owning registry of cancellation handles.
///
/// Clearing or dropping the registry cancels every handle it holds.
#[derive(Debug, Default)]
pub struct Cancellables {
    handles: Vec<AnyCancellable>,
}

impl Cancellables {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `handle`.
    pub fn insert(&mut self, handle: AnyCancellable) {
        self.handles.push(handle);
    }

    /// Cancels and removes every handle.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.cancel();
        }
    }

    /// Number of handles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the registry holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Extend<AnyCancellable> for Cancellables {
    fn extend<I: IntoIterator<Item = AnyCancellable>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}

impl Drop for Cancellables {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
