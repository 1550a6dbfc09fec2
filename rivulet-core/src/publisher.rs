// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{AnySubscriber, Subscriber};
use std::fmt;
use std::sync::Arc;

/// The source side of the protocol.
///
/// `subscribe` must synchronously hand the subscriber a subscription (through
/// [`Subscriber::receive_subscription`]) before delivering anything. Values are
/// then delivered only against outstanding demand, followed by at most one
/// completion.
///
/// Publishers are reusable descriptions: every call to `subscribe` starts an
/// independent subscription with its own state.
pub trait Publisher {
    /// Values produced by this publisher.
    type Output: Send + 'static;
    /// Failure produced by this publisher; [`Never`](rivulet_error::Never) for infallible ones.
    type Failure: Send + 'static;

    /// Attaches `subscriber` to this publisher.
    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>;
}

impl<P> Publisher for Arc<P>
where
    P: Publisher + ?Sized,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        (**self).subscribe(subscriber);
    }
}

// Object-safe view of a publisher, exposing nothing but `subscribe`.
trait DynPublisher<T, E>: Send + Sync {
    fn subscribe_dyn(&self, subscriber: AnySubscriber<T, E>);
}

impl<P> DynPublisher<P::Output, P::Failure> for P
where
    P: Publisher + Send + Sync,
{
    fn subscribe_dyn(&self, subscriber: AnySubscriber<P::Output, P::Failure>) {
        self.subscribe(subscriber);
    }
}

/// A type-erased publisher.
///
/// Hides the concrete type of a pipeline behind a uniform, cheaply cloneable
/// handle so that pipelines can be stored in fields or returned from functions.
///
/// ```
/// use rivulet_core::{AnyPublisher, EraseExt, IntoPublisher, Just, Never};
///
/// fn greeting(formal: bool) -> AnyPublisher<&'static str, Never> {
///     if formal {
///         Just::new("Good day").erase()
///     } else {
///         vec!["hey", "there"].publisher().erase()
///     }
/// }
///
/// let _ = greeting(true);
/// ```
pub struct AnyPublisher<T, E> {
    inner: Arc<dyn DynPublisher<T, E>>,
}

impl<T, E> AnyPublisher<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wraps `publisher`.
    pub fn new<P>(publisher: P) -> Self
    where
        P: Publisher<Output = T, Failure = E> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(publisher),
        }
    }
}

impl<T, E> Clone for AnyPublisher<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for AnyPublisher<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyPublisher").finish_non_exhaustive()
    }
}

impl<T, E> Publisher for AnyPublisher<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        self.inner.subscribe_dyn(Arc::new(subscriber));
    }
}

/// Extension trait providing type erasure for any publisher.
pub trait EraseExt: Publisher + Send + Sync + Sized + 'static {
    /// Erases the concrete pipeline type.
    fn erase(self) -> AnyPublisher<Self::Output, Self::Failure> {
        AnyPublisher::new(self)
    }
}

impl<P> EraseExt for P where P: Publisher + Send + Sync + 'static {}
