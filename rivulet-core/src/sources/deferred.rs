// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Publisher, Subscriber};

/// Builds a fresh publisher for every subscriber.
///
/// The factory runs at subscription time, so each subscriber observes the
/// state of the world when it attached.
#[derive(Clone)]
pub struct Deferred<F> {
    factory: F,
}

impl<F> Deferred<F> {
    /// Creates a deferred publisher from `factory`.
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F, P> Publisher for Deferred<F>
where
    F: Fn() -> P,
    P: Publisher,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        (self.factory)().subscribe(subscriber);
    }
}
